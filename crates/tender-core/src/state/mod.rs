use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::SystemTime,
};

use tender_model::{Hostname, TaskId, TaskPage, TaskQuery, TaskRecord, TaskState};

/// In-memory record of every task the scheduler launched.
///
/// Cloning shares the same storage. Only a launch the driver refused is ever released, so the
/// registry length is the number of launches made over the life of the scheduler.
#[derive(Clone)]
pub struct TaskRegistry {
    inner: Arc<RwLock<RegistryInner>>,
}

struct RegistryInner {
    /// Tasks indexed by TaskId.
    tasks: HashMap<TaskId, TaskRecord>,
    /// Index: hostname -> task IDs launched on that host, in launch order.
    by_host: HashMap<Hostname, Vec<TaskId>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(RegistryInner {
                tasks: HashMap::new(),
                by_host: HashMap::new(),
            })),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Track `record` only while fewer than `capacity` tasks are held.
    ///
    /// The check and the insert happen under one write lock, so concurrent callers cannot
    /// both take the last slot.
    pub fn reserve(&self, record: TaskRecord, capacity: usize) -> bool {
        let mut inner = self.write();
        if inner.tasks.len() >= capacity {
            return false;
        }
        inner.put(record);
        true
    }

    /// Drop a reservation whose launch never reached the manager.
    pub fn release(&self, id: &TaskId) -> Option<TaskRecord> {
        let mut inner = self.write();

        let rec = inner.tasks.remove(id)?;
        if let Some(ids) = inner.by_host.get_mut(&rec.hostname) {
            ids.retain(|other| other != id);
            if ids.is_empty() {
                inner.by_host.remove(&rec.hostname);
            }
        }
        Some(rec)
    }

    /// Apply a status update. Any update counts as an acknowledgement of the launch.
    ///
    /// Returns `false` when the task is not tracked.
    pub fn update_state(&self, id: &TaskId, state: TaskState, message: Option<String>) -> bool {
        let mut inner = self.write();

        match inner.tasks.get_mut(id) {
            Some(rec) => {
                rec.state = state;
                rec.acknowledged = true;
                rec.updated_at = SystemTime::now();
                if message.is_some() {
                    rec.message = message;
                }
                true
            }
            None => false,
        }
    }

    pub fn mark_acknowledged(&self, id: &TaskId) -> bool {
        let mut inner = self.write();

        match inner.tasks.get_mut(id) {
            Some(rec) => {
                rec.acknowledged = true;
                rec.updated_at = SystemTime::now();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: &TaskId) -> Option<TaskRecord> {
        self.read().tasks.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().tasks.is_empty()
    }

    /// IDs of tasks whose launch the manager has not confirmed yet.
    pub fn list_unacknowledged(&self) -> Vec<TaskId> {
        let mut ids: Vec<TaskId> = self
            .read()
            .tasks
            .values()
            .filter(|rec| !rec.acknowledged)
            .map(|rec| rec.id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Query tasks with combined filters and pagination.
    ///
    /// A hostname filter scans only that host's index. `total` counts matches before pagination.
    pub fn query(&self, q: &TaskQuery) -> TaskPage<TaskRecord> {
        let inner = self.read();

        let iter: Box<dyn Iterator<Item = &TaskRecord>> = match &q.hostname {
            Some(host) => match inner.by_host.get(host.as_str()) {
                Some(ids) => Box::new(ids.iter().filter_map(|id| inner.tasks.get(id))),
                None => {
                    return TaskPage {
                        items: vec![],
                        total: 0,
                    };
                }
            },
            None => Box::new(inner.tasks.values()),
        };

        let iter: Box<dyn Iterator<Item = &TaskRecord>> = match q.state {
            Some(state) => Box::new(iter.filter(move |rec| rec.state == state)),
            None => iter,
        };

        let filtered: Vec<&TaskRecord> = iter.collect();
        let total = filtered.len();

        let items = filtered
            .into_iter()
            .skip(q.offset)
            .take(q.limit)
            .cloned()
            .collect();

        TaskPage { items, total }
    }
}

impl RegistryInner {
    fn put(&mut self, record: TaskRecord) {
        let id = record.id.clone();
        let host = record.hostname.clone();
        if self.tasks.insert(id.clone(), record).is_none() {
            self.by_host.entry(host).or_default().push(id);
        }
    }
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}
