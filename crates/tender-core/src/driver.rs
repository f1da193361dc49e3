//! Seam between the scheduler and whatever talks to the resource manager.
//!
//! The scheduler never speaks the wire protocol itself; it only issues the calls below and
//! treats any error as fatal for the session.

use async_trait::async_trait;
use thiserror::Error;

use tender_model::{Filters, OfferId, TaskDescriptor, TaskId};

/// Lifecycle of the driver's registration with the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverStatus {
    NotStarted,
    Running,
    Aborted,
    Stopped,
}

impl DriverStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DriverStatus::NotStarted => "not_started",
            DriverStatus::Running => "running",
            DriverStatus::Aborted => "aborted",
            DriverStatus::Stopped => "stopped",
        }
    }
}

/// Reply to a launch submission.
///
/// Only `DriverStatus::Running` counts as a confirmed launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchAck {
    pub status: DriverStatus,
}

impl LaunchAck {
    pub fn confirmed(&self) -> bool {
        self.status == DriverStatus::Running
    }
}

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("resource manager unreachable: {0}")]
    Unreachable(String),
    #[error("call rejected by resource manager: {0}")]
    Rejected(String),
    #[error("driver is not running (status: {})", .0.as_str())]
    NotRunning(DriverStatus),
}

/// Outbound calls the scheduler makes on the manager session.
#[async_trait]
pub trait SchedulerDriver: Send + Sync {
    /// Return an offer unused, asking the manager to hold it back for `filters.refuse_seconds`.
    async fn decline_offer(&self, offer_id: &OfferId, filters: Filters) -> Result<(), DriverError>;

    /// Launch `tasks` on the given offers. Resources not claimed by the tasks go back to the manager.
    async fn launch_tasks(
        &self,
        offer_ids: &[OfferId],
        tasks: Vec<TaskDescriptor>,
        filters: Filters,
    ) -> Result<LaunchAck, DriverError>;

    /// Ask the manager to resend the latest status of `tasks`.
    async fn reconcile_tasks(&self, tasks: &[TaskId]) -> Result<(), DriverError>;

    /// End the registration with the manager.
    async fn abort(&self) -> Result<DriverStatus, DriverError>;
}
