use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a launched task, as reported by the resource manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    /// Launch accepted by the manager, not yet on the agent.
    #[serde(alias = "TASK_STAGING")]
    Staging,
    /// Agent is starting the task.
    #[serde(alias = "TASK_STARTING")]
    Starting,
    /// Task is executing.
    #[serde(alias = "TASK_RUNNING")]
    Running,
    /// Task completed successfully.
    #[serde(alias = "TASK_FINISHED")]
    Finished,
    /// Task exited with an error.
    #[serde(alias = "TASK_FAILED")]
    Failed,
    /// Task was killed.
    #[serde(alias = "TASK_KILLED")]
    Killed,
    /// Task was lost together with its agent.
    #[serde(alias = "TASK_LOST")]
    Lost,
    /// Task description was invalid and it never ran.
    #[serde(alias = "TASK_ERROR")]
    Error,
    /// Any state this build does not know about.
    #[serde(other)]
    Unknown,
}

impl TaskState {
    /// States that end the whole scheduling session.
    pub fn is_fault(&self) -> bool {
        matches!(self, TaskState::Lost | TaskState::Killed | TaskState::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Staging => "staging",
            TaskState::Starting => "starting",
            TaskState::Running => "running",
            TaskState::Finished => "finished",
            TaskState::Failed => "failed",
            TaskState::Killed => "killed",
            TaskState::Lost => "lost",
            TaskState::Error => "error",
            TaskState::Unknown => "unknown",
        }
    }

    /// Parse the lowercase name returned by [`TaskState::as_str`].
    pub fn parse(s: &str) -> Option<Self> {
        let state = match s.trim().to_ascii_lowercase().as_str() {
            "staging" => TaskState::Staging,
            "starting" => TaskState::Starting,
            "running" => TaskState::Running,
            "finished" => TaskState::Finished,
            "failed" => TaskState::Failed,
            "killed" => TaskState::Killed,
            "lost" => TaskState::Lost,
            "error" => TaskState::Error,
            _ => return None,
        };
        Some(state)
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
