/// Resource name for CPU shares (scalar, fractional cores).
pub const CPUS: &str = "cpus";

/// Resource name for memory (scalar, megabytes).
pub const MEM: &str = "mem";

/// Resource name for the port ranges of an agent.
pub const PORTS: &str = "ports";
