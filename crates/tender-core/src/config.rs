use std::fmt;

use tender_model::ResourceRequirement;

use crate::{
    builder::TaskTemplate,
    error::ConfigError,
    scheduler::{OfferScheduler, SchedulerPolicy},
};

/// Principal and secret used to authenticate with the manager.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub principal: String,
    pub secret: String,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("principal", &self.principal)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Everything needed to register the framework and build its scheduler.
///
/// Only `requirement`, `template` and `policy` reach the scheduler; the rest is passed through
/// to the driver untouched.
#[derive(Debug, Clone)]
pub struct FrameworkConfig {
    /// Manager address, `<host:port>`.
    pub master: String,
    pub name: String,
    /// User tasks run as; empty lets the manager pick.
    pub user: String,
    pub role: String,
    pub credential: Option<Credential>,
    pub auth_provider: String,
    pub requirement: ResourceRequirement,
    pub template: TaskTemplate,
    pub policy: SchedulerPolicy,
}

impl Default for FrameworkConfig {
    fn default() -> Self {
        Self {
            master: "127.0.0.1:5050".to_string(),
            name: "tender".to_string(),
            user: String::new(),
            role: "*".to_string(),
            credential: None,
            auth_provider: "SASL".to_string(),
            requirement: ResourceRequirement::default(),
            template: TaskTemplate::default(),
            policy: SchedulerPolicy::default(),
        }
    }
}

impl FrameworkConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let master = self.master.trim();
        if master.is_empty() {
            return Err(ConfigError::EmptyMaster);
        }
        match master.rsplit_once(':') {
            Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok() => {}
            _ => return Err(ConfigError::InvalidMaster(self.master.clone())),
        }

        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }

        if let Some(cred) = &self.credential {
            if cred.principal.trim().is_empty() {
                return Err(ConfigError::EmptyPrincipal);
            }
            if self.auth_provider.trim().is_empty() {
                return Err(ConfigError::EmptyAuthProvider);
            }
        }

        ResourceRequirement::new(self.requirement.cpus, self.requirement.mem)?;

        if self.template.command.trim().is_empty() {
            return Err(ConfigError::EmptyCommand);
        }
        if matches!(&self.template.image, Some(image) if image.trim().is_empty()) {
            return Err(ConfigError::EmptyImage);
        }
        if self.policy.max_tasks == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }

    /// Validate and build the scheduler described by this config.
    pub fn build_scheduler(&self) -> Result<OfferScheduler, ConfigError> {
        self.validate()?;
        Ok(OfferScheduler::new(self.requirement, self.template.clone()).with_policy(self.policy))
    }
}
