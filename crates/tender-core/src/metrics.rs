//! Counters the scheduler reports while handling callbacks.
//!
//! The core only depends on [`MetricsBackend`]; `tender-prometheus` provides a real backend.

use std::sync::Arc;

use tender_model::TaskState;

use crate::planner::DeclineReason;

/// How an offer left the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferOutcome {
    /// A task was launched on it.
    Launched,
    /// Declined because launch capacity is used up.
    Busy,
    /// Declined by the planner.
    Declined(DeclineReason),
}

impl OfferOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            OfferOutcome::Launched => "launched",
            OfferOutcome::Busy => "busy",
            OfferOutcome::Declined(reason) => reason.as_str(),
        }
    }
}

pub trait MetricsBackend: Send + Sync {
    fn record_offer(&self, outcome: OfferOutcome);
    fn record_launch(&self);
    fn record_status(&self, state: TaskState);
    /// `op` names the driver call that failed (`"decline"`, `"launch"`, ...).
    fn record_driver_error(&self, op: &'static str);
}

pub type MetricsHandle = Arc<dyn MetricsBackend>;

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl MetricsBackend for NoopMetrics {
    fn record_offer(&self, _outcome: OfferOutcome) {}
    fn record_launch(&self) {}
    fn record_status(&self, _state: TaskState) {}
    fn record_driver_error(&self, _op: &'static str) {}
}

/// Shared no-op handle, the default for a new scheduler.
pub fn noop() -> MetricsHandle {
    Arc::new(NoopMetrics)
}
