use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("invalid requirement: {field} must be a finite non-negative number, got {value}")]
    InvalidRequirement { field: &'static str, value: f64 },
    #[error("invalid range: begin {begin} is greater than end {end}")]
    InvalidRange { begin: u64, end: u64 },
}
