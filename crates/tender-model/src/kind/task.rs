use serde::{Deserialize, Serialize};

use crate::{AgentId, Hostname, Resource, TaskId};

/// A file the agent fetches into the sandbox before starting the command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandUri {
    pub value: String,
    /// Mark the fetched file executable.
    #[serde(default)]
    pub executable: bool,
}

/// Shell command run for the task.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandSpec {
    /// Command line, e.g. `"sleep 600"`.
    pub value: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub uris: Vec<CommandUri>,
}

/// Container the command runs in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContainerSpec {
    /// Docker image reference (e.g. `"ubuntu:latest"`).
    Docker { image: String },
}

impl ContainerSpec {
    pub fn image(&self) -> &str {
        match self {
            ContainerSpec::Docker { image } => image,
        }
    }
}

/// Unit of work bound to one accepted offer.
///
/// Resources hold what the task reserves, not everything the offer contained.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDescriptor {
    pub id: TaskId,
    pub name: String,
    pub agent_id: AgentId,
    pub hostname: Hostname,
    pub resources: Vec<Resource>,
    pub command: CommandSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<ContainerSpec>,
    /// Opaque payload handed to the executor.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<u8>,
}

impl TaskDescriptor {
    /// Value of the first scalar resource named `name`.
    pub fn scalar(&self, name: &str) -> Option<f64> {
        self.resources
            .iter()
            .filter(|r| r.name == name)
            .find_map(Resource::as_scalar)
    }

    /// Ranges of the first range resource named `name`.
    pub fn ranges(&self, name: &str) -> Option<&[crate::ValueRange]> {
        self.resources
            .iter()
            .filter(|r| r.name == name)
            .find_map(Resource::as_ranges)
    }
}
