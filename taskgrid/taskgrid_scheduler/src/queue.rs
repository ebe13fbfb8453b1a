//! The shared max-priority queue of task contexts.
//!
//! Workers peek the top under a read lock, step the executor with no queue
//! lock held, and only take the write lock to push or to remove a completed
//! context. Because the step happens outside the lock, the worker that
//! observed the final step must re-validate under the write lock that its
//! context is still the top before popping; the queue may have emptied or a
//! higher-priority push may have displaced the top while the worker waited.
//! That re-validation is what guarantees exactly one worker performs the
//! completion transition for a given context.
//!
//! Ordering among equal priorities is heap order: unspecified, not FIFO.

use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;

use crate::context::TaskContext;

/// Heap entry ordered by task priority alone.
struct QueueEntry(Arc<TaskContext>);

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.0.priority() == other.0.priority()
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.priority().cmp(&other.0.priority())
    }
}

/// Max-priority queue of pending and running task contexts.
#[derive(Default)]
pub struct TaskQueue {
    heap: RwLock<BinaryHeap<QueueEntry>>,
}

impl TaskQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a context.
    pub fn push(&self, context: Arc<TaskContext>) {
        self.heap.write().push(QueueEntry(context));
    }

    /// The highest-priority context, if any.
    ///
    /// Takes the read lock only long enough to clone the top's `Arc`; the
    /// caller steps the executor with no queue lock held.
    pub fn peek(&self) -> Option<Arc<TaskContext>> {
        self.heap.read().peek().map(|entry| Arc::clone(&entry.0))
    }

    /// Remove `context` only if it is still the queue top.
    ///
    /// Re-validates under the write lock and returns whether the pop
    /// happened. A `false` return means the queue emptied or the top changed
    /// while the caller waited for the lock; the caller abandons its removal
    /// attempt and loops back to re-peek.
    pub fn pop_if_top(&self, context: &Arc<TaskContext>) -> bool {
        let mut heap = self.heap.write();
        let still_top = heap
            .peek()
            .is_some_and(|top| Arc::ptr_eq(&top.0, context));
        if still_top {
            heap.pop();
        }
        still_top
    }

    /// Number of queued contexts.
    pub fn len(&self) -> usize {
        self.heap.read().len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.heap.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskgrid_core::id::TaskId;
    use taskgrid_core::traits::{Executor, StepStatus};

    struct NoopExecutor;

    impl Executor for NoopExecutor {
        fn execute_step(&self, _thread_index: usize, _thread_count: usize) -> StepStatus {
            StepStatus::Done
        }
    }

    fn context(id: u64, priority: i32) -> Arc<TaskContext> {
        Arc::new(TaskContext::new(
            TaskId::from_raw(id),
            priority,
            Arc::new(NoopExecutor),
        ))
    }

    #[test]
    fn test_peek_returns_highest_priority() {
        let queue = TaskQueue::new();
        queue.push(context(1, 10));
        queue.push(context(2, 100));
        queue.push(context(3, 1));

        let top = queue.peek().unwrap();
        assert_eq!(top.priority(), 100);
        assert_eq!(top.id(), TaskId::from_raw(2));
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn test_peek_empty_returns_none() {
        let queue = TaskQueue::new();
        assert!(queue.peek().is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_pop_if_top_pops_current_top() {
        let queue = TaskQueue::new();
        let low = context(1, 1);
        let high = context(2, 9);
        queue.push(Arc::clone(&low));
        queue.push(Arc::clone(&high));

        assert!(queue.pop_if_top(&high));
        assert_eq!(queue.len(), 1);
        assert!(queue.pop_if_top(&low));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_pop_if_top_rejects_displaced_context() {
        let queue = TaskQueue::new();
        let low = context(1, 1);
        queue.push(Arc::clone(&low));

        // A higher-priority insert displaces the observed top.
        queue.push(context(2, 50));

        assert!(!queue.pop_if_top(&low));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_pop_if_top_rejects_empty_queue() {
        let queue = TaskQueue::new();
        let stale = context(1, 1);
        assert!(!queue.pop_if_top(&stale));
    }

    #[test]
    fn test_equal_priority_entries_both_surface() {
        let queue = TaskQueue::new();
        queue.push(context(1, 5));
        queue.push(context(2, 5));

        // Order among equals is unspecified; both must come out.
        let first = queue.peek().unwrap();
        assert!(queue.pop_if_top(&first));
        let second = queue.peek().unwrap();
        assert!(queue.pop_if_top(&second));
        assert_ne!(first.id(), second.id());
        assert!(queue.is_empty());
    }
}
