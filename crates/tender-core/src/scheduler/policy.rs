use std::time::Duration;

/// Launch capacity and refusal intervals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulerPolicy {
    /// Number of tasks the scheduler launches over its lifetime.
    pub max_tasks: usize,
    /// Refusal when declining because capacity is used up; short, so offers come back soon.
    pub busy_refusal: Duration,
    /// Refusal when an offer fails the resource check.
    pub decline_refusal: Duration,
    /// Refusal for the unused remainder of an offer a task was launched on.
    pub launch_refusal: Duration,
}

impl Default for SchedulerPolicy {
    fn default() -> Self {
        Self {
            max_tasks: 1,
            busy_refusal: Duration::from_secs(1),
            decline_refusal: Duration::from_secs(10),
            launch_refusal: Duration::from_secs(10),
        }
    }
}
