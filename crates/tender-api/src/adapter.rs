use async_trait::async_trait;
use tender_core::TaskRegistry;
use tender_model::{TaskId, TaskPage, TaskQuery, TaskRecord};

use crate::error::ApiError;
use crate::handler::ApiHandler;

/// [`ApiHandler`] backed by a shared [`TaskRegistry`].
pub struct RegistryAdapter {
    registry: TaskRegistry,
}

impl RegistryAdapter {
    pub fn new(registry: TaskRegistry) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl ApiHandler for RegistryAdapter {
    async fn get_task(&self, id: &TaskId) -> Result<Option<TaskRecord>, ApiError> {
        Ok(self.registry.get(id))
    }

    async fn query_tasks(&self, query: TaskQuery) -> Result<TaskPage<TaskRecord>, ApiError> {
        Ok(self.registry.query(&query))
    }
}
