//! Driver that replays recorded manager traffic.
//!
//! Inbound events are read as JSON lines (one [`SchedulerEvent`] per line) and outbound calls
//! are logged. This lets the scheduler run end to end without a live resource manager.

use std::{path::Path, sync::Mutex};

use anyhow::Context;
use async_trait::async_trait;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use tender_core::{DriverError, DriverStatus, FrameworkConfig, LaunchAck, SchedulerDriver, SchedulerEvent};
use tender_model::{
    CPUS, ContainerSpec, Filters, MEM, OfferId, PORTS, TaskDescriptor, TaskId,
};

pub struct ReplayDriver {
    master: String,
    framework: String,
    status: Mutex<DriverStatus>,
}

impl ReplayDriver {
    pub fn new(config: &FrameworkConfig) -> Self {
        Self {
            master: config.master.clone(),
            framework: config.name.clone(),
            status: Mutex::new(DriverStatus::NotStarted),
        }
    }

    pub fn start(&self) -> Result<DriverStatus, DriverError> {
        let mut status = self.lock();
        if *status != DriverStatus::NotStarted {
            return Err(DriverError::NotRunning(*status));
        }
        *status = DriverStatus::Running;
        info!(master = %self.master, framework = %self.framework, "driver started");
        Ok(*status)
    }

    pub fn status(&self) -> DriverStatus {
        *self.lock()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DriverStatus> {
        self.status
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn ensure_running(&self) -> Result<(), DriverError> {
        match self.status() {
            DriverStatus::Running => Ok(()),
            other => Err(DriverError::NotRunning(other)),
        }
    }
}

#[async_trait]
impl SchedulerDriver for ReplayDriver {
    async fn decline_offer(&self, offer_id: &OfferId, filters: Filters) -> Result<(), DriverError> {
        self.ensure_running()?;
        info!(offer = %offer_id, refuse_seconds = filters.refuse_seconds, "decline offer");
        Ok(())
    }

    async fn launch_tasks(
        &self,
        offer_ids: &[OfferId],
        tasks: Vec<TaskDescriptor>,
        filters: Filters,
    ) -> Result<LaunchAck, DriverError> {
        self.ensure_running()?;
        if offer_ids.is_empty() || tasks.is_empty() {
            return Err(DriverError::Rejected(format!(
                "launch needs offers and tasks (got {} offers, {} tasks)",
                offer_ids.len(),
                tasks.len()
            )));
        }
        for task in &tasks {
            info!(
                task = %task.id,
                name = %task.name,
                host = %task.hostname,
                cpus = task.scalar(CPUS),
                mem = task.scalar(MEM),
                port = ?task.ranges(PORTS).and_then(|r| r.first()).map(|r| r.begin),
                command = %task.command.value,
                image = task.container.as_ref().map(ContainerSpec::image).unwrap_or("-"),
                offers = ?offer_ids,
                refuse_seconds = filters.refuse_seconds,
                "launch task"
            );
        }
        Ok(LaunchAck {
            status: self.status(),
        })
    }

    async fn reconcile_tasks(&self, tasks: &[TaskId]) -> Result<(), DriverError> {
        self.ensure_running()?;
        info!(tasks = ?tasks, "reconcile tasks");
        Ok(())
    }

    async fn abort(&self) -> Result<DriverStatus, DriverError> {
        let mut status = self.lock();
        *status = DriverStatus::Aborted;
        warn!(master = %self.master, "driver aborted");
        Ok(*status)
    }
}

pub type EventSource = Box<dyn AsyncBufRead + Unpin + Send>;

/// Open the replay source: a file path, or `-` for stdin.
pub async fn open(path: &Path) -> anyhow::Result<EventSource> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(BufReader::new(tokio::io::stdin())));
    }
    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("opening event file {}", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

/// Forward parsed events into the session until the source ends or `cancel` fires.
///
/// Blank lines and lines starting with `#` are skipped; malformed lines are logged and skipped.
pub async fn feed(
    source: EventSource,
    tx: mpsc::Sender<SchedulerEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<usize> {
    let mut lines = source.lines();
    let mut lineno = 0usize;
    let mut sent = 0usize;

    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.next_line() => line.context("reading events")?,
        };
        let Some(line) = line else { break };
        lineno += 1;

        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let event: SchedulerEvent = match serde_json::from_str(line) {
            Ok(event) => event,
            Err(e) => {
                warn!(line = lineno, error = %e, "skipping malformed event");
                continue;
            }
        };
        if tx.send(event).await.is_err() {
            debug!("session is gone; stop reading events");
            break;
        }
        sent += 1;
    }
    Ok(sent)
}
