//! Process-wide logging setup for tender binaries.
//!
//! Library crates only emit `tracing` events; installing a subscriber is left to the binary.

mod logger;
pub use logger::*;
