//! Task-id to context lookup.
//!
//! Backs `wait` and `on_completed`: both resolve the caller's [`TaskId`] to
//! the live context through this table. Guarded by one read/write lock;
//! lookups from many caller threads proceed concurrently, inserts take the
//! lock exclusively.
//!
//! The scheduler never removes entries, so the table grows for the
//! scheduler's lifetime; `wait` and `on_completed` on an already-finished
//! task stay valid indefinitely. [`remove`](ContextTable::remove) exists as
//! a capability for a future eviction policy.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use taskgrid_core::id::TaskId;

use crate::context::TaskContext;

/// Map from task id to its live context.
#[derive(Default)]
pub struct ContextTable {
    entries: RwLock<HashMap<TaskId, Arc<TaskContext>>>,
}

impl ContextTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a context under its id.
    pub fn insert(&self, id: TaskId, context: Arc<TaskContext>) {
        self.entries.write().insert(id, context);
    }

    /// Look up the context for `id`.
    pub fn lookup(&self, id: TaskId) -> Option<Arc<TaskContext>> {
        self.entries.read().get(&id).cloned()
    }

    /// Remove and return the context for `id`.
    ///
    /// Unused by the scheduler itself; see the module docs.
    pub fn remove(&self, id: TaskId) -> Option<Arc<TaskContext>> {
        self.entries.write().remove(&id)
    }

    /// Number of tracked contexts.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
