use thiserror::Error;

use crate::driver::DriverError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("driver call failed: {0}")]
    Driver(#[from] DriverError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("master address is empty")]
    EmptyMaster,
    #[error("master address must be <host:port>, got {0:?}")]
    InvalidMaster(String),
    #[error("framework name is empty")]
    EmptyName,
    #[error("credential principal is empty")]
    EmptyPrincipal,
    #[error("authentication provider is empty while a credential is set")]
    EmptyAuthProvider,
    #[error("task command is empty")]
    EmptyCommand,
    #[error("container image is empty")]
    EmptyImage,
    #[error("max_tasks must be at least 1")]
    ZeroCapacity,
    #[error(transparent)]
    Requirement(#[from] tender_model::ModelError),
}
