use serde::{Deserialize, Serialize};
use std::time::SystemTime;

use crate::{Hostname, OfferId, TaskId, TaskState};

/// What the scheduler remembers about a task it launched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: TaskId,
    /// Offer the task was launched against.
    pub offer_id: OfferId,
    pub hostname: Hostname,
    /// Last state reported for the task (starts as `Staging`).
    pub state: TaskState,
    /// Whether the manager confirmed the launch.
    ///
    /// Unacknowledged tasks still hold their launch capacity until reconciled.
    pub acknowledged: bool,
    #[serde(with = "time_serde")]
    pub created_at: SystemTime,
    #[serde(with = "time_serde")]
    pub updated_at: SystemTime,
    /// Last message attached to a status update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TaskRecord {
    pub fn staging(id: TaskId, offer_id: OfferId, hostname: Hostname, acknowledged: bool) -> Self {
        let now = SystemTime::now();
        Self {
            id,
            offer_id,
            hostname,
            state: TaskState::Staging,
            acknowledged,
            created_at: now,
            updated_at: now,
            message: None,
        }
    }
}

mod time_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::{SystemTime, UNIX_EPOCH};

    pub fn serialize<S>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let since_epoch = time
            .duration_since(UNIX_EPOCH)
            .map_err(serde::ser::Error::custom)?;
        since_epoch.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SystemTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(UNIX_EPOCH + std::time::Duration::from_secs(secs))
    }
}
