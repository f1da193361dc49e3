use std::sync::Mutex;

use async_trait::async_trait;
use tender_model::{Filters, OfferId, TaskDescriptor, TaskId};

use crate::driver::{DriverError, DriverStatus, LaunchAck, SchedulerDriver};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Decline(OfferId, f64),
    Launch(Vec<OfferId>),
    Reconcile(Vec<TaskId>),
    Abort,
}

/// Driver double that records every call in order.
pub struct RecordingDriver {
    calls: Mutex<Vec<Call>>,
    launches: Mutex<Vec<(Vec<OfferId>, Vec<TaskDescriptor>, Filters)>>,
    launch_status: DriverStatus,
    fail_launch: bool,
    yield_on_launch: bool,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            launches: Mutex::new(Vec::new()),
            launch_status: DriverStatus::Running,
            fail_launch: false,
            yield_on_launch: false,
        }
    }

    pub fn with_launch_status(mut self, status: DriverStatus) -> Self {
        self.launch_status = status;
        self
    }

    pub fn failing_launch(mut self) -> Self {
        self.fail_launch = true;
        self
    }

    /// Hand control back to the runtime inside every launch, as a real network call would.
    pub fn yielding_launch(mut self) -> Self {
        self.yield_on_launch = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn launches(&self) -> Vec<(Vec<OfferId>, Vec<TaskDescriptor>, Filters)> {
        self.launches.lock().unwrap().clone()
    }
}

#[async_trait]
impl SchedulerDriver for RecordingDriver {
    async fn decline_offer(&self, offer_id: &OfferId, filters: Filters) -> Result<(), DriverError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Decline(offer_id.clone(), filters.refuse_seconds));
        Ok(())
    }

    async fn launch_tasks(
        &self,
        offer_ids: &[OfferId],
        tasks: Vec<TaskDescriptor>,
        filters: Filters,
    ) -> Result<LaunchAck, DriverError> {
        self.calls.lock().unwrap().push(Call::Launch(offer_ids.to_vec()));
        if self.yield_on_launch {
            tokio::task::yield_now().await;
        }
        if self.fail_launch {
            return Err(DriverError::Unreachable("connection refused".into()));
        }
        self.launches
            .lock()
            .unwrap()
            .push((offer_ids.to_vec(), tasks, filters));
        Ok(LaunchAck {
            status: self.launch_status,
        })
    }

    async fn reconcile_tasks(&self, tasks: &[TaskId]) -> Result<(), DriverError> {
        self.calls.lock().unwrap().push(Call::Reconcile(tasks.to_vec()));
        Ok(())
    }

    async fn abort(&self) -> Result<DriverStatus, DriverError> {
        self.calls.lock().unwrap().push(Call::Abort);
        Ok(DriverStatus::Aborted)
    }
}
