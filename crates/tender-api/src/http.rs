use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
};
use serde::{Deserialize, Serialize};
use tender_model::{TaskId, TaskQuery, TaskRecord, TaskState};
use tracing::debug;

use crate::{error::ApiError, handler::ApiHandler};

/// HTTP API service builder.
pub struct HttpApi<H> {
    handler: Arc<H>,
}

impl<H> HttpApi<H>
where
    H: ApiHandler,
{
    pub fn new(handler: Arc<H>) -> Self {
        Self { handler }
    }

    /// Build axum router with mounted endpoints.
    ///
    /// Routes:
    /// - GET /api/v1/tasks - List tasks (optionally filtered)
    /// - GET /api/v1/tasks/{id} - Get one task
    pub fn router(self) -> Router {
        Router::new()
            .route("/api/v1/tasks", get(list_tasks::<H>))
            .route("/api/v1/tasks/{id}", get(get_task::<H>))
            .with_state(self.handler)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct GetTaskResponse {
    info: TaskRecord,
}

#[derive(Debug, Deserialize)]
struct ListTasksParams {
    /// Filter by agent hostname
    host: Option<String>,
    /// Filter by task state
    state: Option<String>,
    /// Max items per page (default 100, max 1000)
    limit: Option<usize>,
    /// Offset for pagination (default 0)
    offset: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ListTasksResponse {
    tasks: Vec<TaskRecord>,
    total: usize,
}

/// GET /api/v1/tasks/{id}
async fn get_task<H>(
    State(handler): State<Arc<H>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let task_id = TaskId::from(id);
    debug!(%task_id, "getting task");

    match handler.get_task(&task_id).await? {
        Some(info) => Ok(Json(GetTaskResponse { info })),
        None => Err(ApiError::TaskNotFound(task_id.to_string())),
    }
}

/// GET /api/v1/tasks
///
/// Query params (all optional, combinable):
/// - ?host=name     - filter by agent hostname
/// - ?state=running - filter by task state
/// - ?limit=50      - max items per page
/// - ?offset=0      - pagination offset
async fn list_tasks<H>(
    State(handler): State<Arc<H>>,
    Query(params): Query<ListTasksParams>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let mut query = TaskQuery::new();

    if let Some(host) = params.host {
        if host.trim().is_empty() {
            return Err(ApiError::InvalidRequest("host cannot be empty".into()));
        }
        query = query.with_hostname(host);
    }

    if let Some(state) = params.state {
        let state = TaskState::parse(&state).ok_or_else(|| {
            ApiError::InvalidRequest(format!(
                "invalid state: '{state}' (valid: staging, starting, running, finished, failed, killed, lost, error)"
            ))
        })?;
        query = query.with_state(state);
    }

    if let Some(limit) = params.limit {
        query = query.with_limit(limit);
    }

    if let Some(offset) = params.offset {
        query = query.with_offset(offset);
    }

    let page = handler.query_tasks(query).await?;
    debug!(count = page.items.len(), total = page.total, "tasks listed");

    Ok(Json(ListTasksResponse {
        tasks: page.items,
        total: page.total,
    }))
}
