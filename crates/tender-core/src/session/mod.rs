//! Callback dispatch for one registration with the resource manager.
//!
//! Whatever owns the connection pushes [`SchedulerEvent`]s into a channel; [`Session::run`]
//! consumes them one at a time, so offer and status handling never interleave. A session-ending
//! condition cancels the token instead of exiting the process.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tender_model::{Offer, OfferId, StatusReport};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::{
    driver::{DriverError, DriverStatus, SchedulerDriver},
    error::CoreError,
    scheduler::{OfferScheduler, StatusAction},
};

/// Inbound callback from the resource manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SchedulerEvent {
    Registered { framework_id: String, master: String },
    Reregistered { master: String },
    Disconnected,
    Offers { offers: Vec<Offer> },
    OfferRescinded { offer_id: OfferId },
    Status { report: StatusReport },
    /// Unrecoverable error reported by the manager; ends the session.
    Error { message: String },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("scheduler failed: {0}")]
    Scheduler(#[from] CoreError),
    #[error("resource manager reported an error: {0}")]
    Manager(String),
}

impl SessionError {
    /// Driver status the failed session ended in.
    ///
    /// A driver that had already left `Running` reports where it stopped; every other failure
    /// leaves the session aborted.
    pub fn status(&self) -> DriverStatus {
        match self {
            SessionError::Scheduler(CoreError::Driver(DriverError::NotRunning(status))) => *status,
            SessionError::Scheduler(_) | SessionError::Manager(_) => DriverStatus::Aborted,
        }
    }
}

enum Flow {
    Continue,
    Stop(DriverStatus),
}

pub struct Session {
    scheduler: Arc<OfferScheduler>,
    driver: Arc<dyn SchedulerDriver>,
}

impl Session {
    pub fn new(scheduler: Arc<OfferScheduler>, driver: Arc<dyn SchedulerDriver>) -> Self {
        Self { scheduler, driver }
    }

    pub fn scheduler(&self) -> &Arc<OfferScheduler> {
        &self.scheduler
    }

    /// Dispatch events until the stream ends, the token is cancelled, or the session aborts.
    ///
    /// Returns `Stopped` for a clean end and `Aborted` after a task fault. Scheduler and
    /// manager errors are returned as [`SessionError`]. In both abnormal cases `cancel` is
    /// triggered so sibling tasks (HTTP API, event readers) shut down too.
    pub async fn run(
        &self,
        mut events: mpsc::Receiver<SchedulerEvent>,
        cancel: CancellationToken,
    ) -> Result<DriverStatus, SessionError> {
        info!("scheduler session started");

        loop {
            let event = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("session cancelled");
                    return Ok(DriverStatus::Stopped);
                }
                event = events.recv() => match event {
                    Some(event) => event,
                    None => {
                        info!("event stream closed; stopping session");
                        return Ok(DriverStatus::Stopped);
                    }
                },
            };

            match self.dispatch(event).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Stop(status)) => {
                    warn!(status = status.as_str(), "session aborted");
                    cancel.cancel();
                    return Ok(status);
                }
                Err(e) => {
                    error!(error = %e, "session failed");
                    cancel.cancel();
                    return Err(e);
                }
            }
        }
    }

    async fn dispatch(&self, event: SchedulerEvent) -> Result<Flow, SessionError> {
        let driver = self.driver.as_ref();

        match event {
            SchedulerEvent::Registered {
                framework_id,
                master,
            } => info!(%framework_id, %master, "framework registered"),
            SchedulerEvent::Reregistered { master } => info!(%master, "framework re-registered"),
            SchedulerEvent::Disconnected => warn!("disconnected from resource manager"),
            SchedulerEvent::OfferRescinded { offer_id } => {
                debug!(offer = %offer_id, "offer rescinded")
            }
            SchedulerEvent::Offers { offers } => {
                self.scheduler
                    .resource_offers(driver, offers)
                    .await?;
            }
            SchedulerEvent::Status { report } => {
                if let StatusAction::Abort(_) =
                    self.scheduler.status_update(driver, report).await?
                {
                    return Ok(Flow::Stop(DriverStatus::Aborted));
                }
            }
            SchedulerEvent::Error { message } => return Err(SessionError::Manager(message)),
        }
        Ok(Flow::Continue)
    }
}
