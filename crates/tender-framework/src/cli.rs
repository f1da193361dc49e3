use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;
use tender_core::{Credential, FrameworkConfig, SchedulerPolicy, TaskTemplate};
use tender_model::{CommandUri, ResourceRequirement};
use tender_observe::{LoggerConfig, LoggerFormat};

/// Framework scheduler: accepts one suitable resource offer and runs a task on it.
#[derive(Debug, Parser)]
#[command(name = "tender", version)]
pub struct Cli {
    /// Resource manager address <ip:port>.
    #[arg(long, default_value = "127.0.0.1:5050")]
    pub master: String,

    /// Framework name shown by the manager.
    #[arg(long, default_value = "tender")]
    pub name: String,

    /// User tasks run as (empty lets the manager decide).
    #[arg(long, default_value = "")]
    pub user: String,

    #[arg(long, default_value = "*")]
    pub role: String,

    /// CPU shares one task needs.
    #[arg(long, default_value_t = 0.5)]
    pub cpus: f64,

    /// Memory (MB) one task needs.
    #[arg(long, default_value_t = 128.0)]
    pub mem: f64,

    /// Number of tasks to launch over the life of the framework.
    #[arg(long, default_value_t = 1)]
    pub max_tasks: usize,

    /// Command the task runs.
    #[arg(long, default_value = "sleep 600")]
    pub command: String,

    /// Docker image for the task.
    #[arg(long, default_value = "ubuntu:latest")]
    pub image: String,

    /// Run the command without a container.
    #[arg(long)]
    pub no_container: bool,

    /// URI fetched (and made executable) into the sandbox; repeatable.
    #[arg(long = "uri")]
    pub uris: Vec<String>,

    /// Opaque payload sent along with the task.
    #[arg(long, default_value = "Hello from tender")]
    pub data: String,

    #[arg(long, requires = "secret")]
    pub principal: Option<String>,

    #[arg(long, requires = "principal", env = "TENDER_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    #[arg(long, default_value = "SASL")]
    pub auth_provider: String,

    /// File of JSON-lines manager events to replay, `-` for stdin.
    #[arg(long, default_value = "-")]
    pub events: PathBuf,

    /// Serve the task API and /metrics on this address.
    #[arg(long)]
    pub http: Option<SocketAddr>,

    /// Log filter directive.
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Log output: text | json | journald.
    #[arg(long, default_value = "text")]
    pub log_format: LoggerFormat,
}

impl Cli {
    pub fn logger_config(&self) -> LoggerConfig {
        LoggerConfig::default()
            .with_level(self.log_level.clone())
            .with_format(self.log_format)
    }

    pub fn framework_config(&self) -> anyhow::Result<FrameworkConfig> {
        let requirement = ResourceRequirement::new(self.cpus, self.mem)?;

        let credential = match (&self.principal, &self.secret) {
            (Some(principal), Some(secret)) => Some(Credential {
                principal: principal.clone(),
                secret: secret.clone(),
            }),
            _ => None,
        };

        let template = TaskTemplate {
            command: self.command.clone(),
            image: (!self.no_container).then(|| self.image.clone()),
            uris: self
                .uris
                .iter()
                .map(|value| CommandUri {
                    value: value.clone(),
                    executable: true,
                })
                .collect(),
            data: self.data.clone().into_bytes(),
            ..Default::default()
        };

        let config = FrameworkConfig {
            master: self.master.clone(),
            name: self.name.clone(),
            user: self.user.clone(),
            role: self.role.clone(),
            credential,
            auth_provider: self.auth_provider.clone(),
            requirement,
            template,
            policy: SchedulerPolicy {
                max_tasks: self.max_tasks,
                ..Default::default()
            },
        };
        config.validate()?;
        Ok(config)
    }
}
