use async_trait::async_trait;
use tender_model::{TaskId, TaskPage, TaskQuery, TaskRecord};

use crate::error::ApiError;

/// Read access to the tasks a scheduler has launched.
///
/// [`RegistryAdapter`](crate::RegistryAdapter) serves straight from the scheduler's registry;
/// implement this directly to add auth or caching in front of it.
#[async_trait]
pub trait ApiHandler: Send + Sync + 'static {
    /// Get one task by ID.
    async fn get_task(&self, id: &TaskId) -> Result<Option<TaskRecord>, ApiError>;

    /// List tasks matching `query`.
    async fn query_tasks(&self, query: TaskQuery) -> Result<TaskPage<TaskRecord>, ApiError>;
}
