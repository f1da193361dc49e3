use serde::{Deserialize, Serialize};

use crate::{AgentId, Hostname, OfferId, Resource};

/// A bundle of resources on one agent, pushed by the resource manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: OfferId,
    pub agent_id: AgentId,
    pub hostname: Hostname,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

impl Offer {
    pub fn new(id: impl Into<OfferId>, agent_id: impl Into<AgentId>, hostname: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            agent_id: agent_id.into(),
            hostname: hostname.into(),
            resources: Vec::new(),
        }
    }

    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resources.push(resource);
        self
    }
}
