use tender_model::{CommandSpec, CommandUri, ContainerSpec, Offer, TaskDescriptor, TaskId};
use tracing::{instrument, trace};

use crate::planner::Reservation;

/// Fixed parts of every task the scheduler launches.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskTemplate {
    /// Prepended to the task id to form the display name.
    pub name_prefix: String,
    pub command: String,
    /// Docker image; `None` runs the command directly on the agent.
    pub image: Option<String>,
    pub uris: Vec<CommandUri>,
    pub data: Vec<u8>,
}

impl Default for TaskTemplate {
    fn default() -> Self {
        Self {
            name_prefix: "tender-task-".to_string(),
            command: "sleep 600".to_string(),
            image: Some("ubuntu:latest".to_string()),
            uris: Vec::new(),
            data: b"Hello from tender".to_vec(),
        }
    }
}

/// Turns accepted offers into task descriptors.
#[derive(Debug, Clone, Default)]
pub struct TaskBuilder {
    template: TaskTemplate,
}

impl TaskBuilder {
    pub fn new(template: TaskTemplate) -> Self {
        Self { template }
    }

    #[instrument(level = "trace", skip_all, fields(offer = %offer.id, host = %offer.hostname))]
    pub fn build(&self, offer: &Offer, reservation: &Reservation) -> TaskDescriptor {
        let id = TaskId::random();
        let name = format!("{}{}", self.template.name_prefix, id);

        let task = TaskDescriptor {
            name,
            agent_id: offer.agent_id.clone(),
            hostname: offer.hostname.clone(),
            resources: reservation.resources(),
            command: CommandSpec {
                value: self.template.command.clone(),
                uris: self.template.uris.clone(),
            },
            container: self
                .template
                .image
                .as_ref()
                .map(|image| ContainerSpec::Docker { image: image.clone() }),
            data: self.template.data.clone(),
            id,
        };
        trace!(task = %task.id, "task descriptor built");
        task
    }
}
