use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Inclusive range of integer values, e.g. a port range. `begin <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRange")]
pub struct ValueRange {
    pub begin: u64,
    pub end: u64,
}

#[derive(Deserialize)]
struct RawRange {
    begin: u64,
    end: u64,
}

impl TryFrom<RawRange> for ValueRange {
    type Error = ModelError;

    fn try_from(raw: RawRange) -> Result<Self, Self::Error> {
        ValueRange::new(raw.begin, raw.end)
    }
}

impl ValueRange {
    pub fn new(begin: u64, end: u64) -> Result<Self, ModelError> {
        if begin > end {
            return Err(ModelError::InvalidRange { begin, end });
        }
        Ok(Self { begin, end })
    }

    /// A range covering exactly one value.
    pub fn single(value: u64) -> Self {
        Self {
            begin: value,
            end: value,
        }
    }
}

/// Value carried by a single resource entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceValue {
    Scalar(f64),
    Ranges(Vec<ValueRange>),
}

/// One named resource entry of an offer or a task.
///
/// An offer may carry several entries with the same name; scalar entries are additive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    pub value: ResourceValue,
}

impl Resource {
    pub fn scalar(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value: ResourceValue::Scalar(value),
        }
    }

    pub fn ranges(name: impl Into<String>, ranges: Vec<ValueRange>) -> Self {
        Self {
            name: name.into(),
            value: ResourceValue::Ranges(ranges),
        }
    }

    /// Scalar value, or `None` when this entry carries ranges.
    pub fn as_scalar(&self) -> Option<f64> {
        match self.value {
            ResourceValue::Scalar(v) => Some(v),
            ResourceValue::Ranges(_) => None,
        }
    }

    /// Range list, or `None` when this entry is a scalar.
    pub fn as_ranges(&self) -> Option<&[ValueRange]> {
        match &self.value {
            ResourceValue::Ranges(r) => Some(r),
            ResourceValue::Scalar(_) => None,
        }
    }
}
