use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Minimum resources a single task needs from an offer.
///
/// Set once when the scheduler is built and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceRequirement {
    /// CPU shares (fractional cores).
    pub cpus: f64,
    /// Memory in megabytes.
    pub mem: f64,
}

impl ResourceRequirement {
    pub fn new(cpus: f64, mem: f64) -> Result<Self, ModelError> {
        check("cpus", cpus)?;
        check("mem", mem)?;
        Ok(Self { cpus, mem })
    }
}

impl Default for ResourceRequirement {
    fn default() -> Self {
        Self {
            cpus: 0.5,
            mem: 128.0,
        }
    }
}

fn check(field: &'static str, value: f64) -> Result<(), ModelError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ModelError::InvalidRequirement { field, value })
    }
}
