use serde::{Deserialize, Serialize};

/// Filters attached to a decline or launch call.
///
/// `refuse_seconds` asks the manager not to re-offer the declined (or unused) resources
/// to this framework for that long.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    pub refuse_seconds: f64,
}

impl Filters {
    pub fn refuse(refuse_seconds: f64) -> Self {
        Self { refuse_seconds }
    }
}
