pub mod error;
pub use error::{ConfigError, CoreError};

pub mod driver;
pub use driver::{DriverError, DriverStatus, LaunchAck, SchedulerDriver};

pub mod planner;
pub use planner::{
    Decision, DeclineReason, FirstFitPlanner, OfferTally, Reservation, ResourcePlanner,
};

pub mod builder;
pub use builder::{TaskBuilder, TaskTemplate};

mod state;
pub use state::TaskRegistry;

pub mod metrics;
pub use metrics::{MetricsBackend, MetricsHandle, NoopMetrics, OfferOutcome};

pub mod scheduler;
pub use scheduler::{OfferScheduler, SchedulerPolicy, StatusAction};

pub mod session;
pub use session::{SchedulerEvent, Session, SessionError};

pub mod config;
pub use config::{Credential, FrameworkConfig};

#[cfg(test)]
mod testing;
