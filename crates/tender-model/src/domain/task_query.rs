use super::TaskState;

const DEFAULT_LIMIT: usize = 100;
const MAX_LIMIT: usize = 1000;

/// Filters and pagination for listing tracked tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    pub hostname: Option<String>,
    pub state: Option<TaskState>,
    pub limit: usize,
    pub offset: usize,
}

/// One page of a task listing.
#[derive(Debug, Clone)]
pub struct TaskPage<T> {
    pub items: Vec<T>,
    /// Matches after filtering, before pagination.
    pub total: usize,
}

impl TaskQuery {
    pub fn new() -> Self {
        Self {
            hostname: None,
            state: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    pub fn with_state(mut self, state: TaskState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.min(MAX_LIMIT);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}
