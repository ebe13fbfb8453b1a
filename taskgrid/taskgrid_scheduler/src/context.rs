//! The scheduler's private per-task record.
//!
//! A [`TaskContext`] is shared between the priority queue, the context
//! table, and whichever worker is currently stepping its executor; the
//! longest-living holder determines when it is released. It carries the two
//! completion latches the whole lifecycle hinges on:
//!
//! - *task-complete* flips when the executor reports its final step;
//! - *callbacks-complete* flips when every registered callback has run (or
//!   immediately, when there were none).
//!
//! Task-complete always flips strictly before callbacks-complete, and
//! callbacks-complete is a one-way latch: once set it never reverts.
//! Waiters block on a dedicated mutex + condvar pair that exists solely to
//! publish callbacks-complete, so waiting on one task never contends with
//! scheduling or stepping of others.

use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use taskgrid_core::id::TaskId;
use taskgrid_core::traits::Executor;

/// Callback invoked with the id of the finished task.
///
/// Stored behind an `Arc` so a callback can be handed to a worker thread
/// without holding the registration lock while it runs.
pub type CompletionCallback = Arc<dyn Fn(TaskId) + Send + Sync>;

/// The scheduler-owned record for one scheduled task.
pub struct TaskContext {
    /// Public handle for this task
    id: TaskId,

    /// Scheduling priority; higher runs sooner
    priority: i32,

    /// The unit of work being driven to completion
    executor: Arc<dyn Executor>,

    /// Completion callbacks in registration order; registration order is
    /// invocation order
    callbacks: Mutex<Vec<CompletionCallback>>,

    /// Set when the executor reports its final step
    task_complete: AtomicBool,

    /// Set when all registered callbacks have run (or there were none)
    callbacks_complete: AtomicBool,

    /// Guards publication of `callbacks_complete` to waiters
    wait_lock: Mutex<()>,

    /// Wakes waiters when `callbacks_complete` flips
    wait_cond: Condvar,
}

impl TaskContext {
    /// Create a context for a freshly scheduled task.
    pub fn new(id: TaskId, priority: i32, executor: Arc<dyn Executor>) -> Self {
        Self {
            id,
            priority,
            executor,
            callbacks: Mutex::new(Vec::new()),
            task_complete: AtomicBool::new(false),
            callbacks_complete: AtomicBool::new(false),
            wait_lock: Mutex::new(()),
            wait_cond: Condvar::new(),
        }
    }

    /// The task's public id.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// The task's scheduling priority.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// The executor this context drives.
    pub fn executor(&self) -> &Arc<dyn Executor> {
        &self.executor
    }

    /// Append a completion callback.
    ///
    /// Safe to call concurrently with the completion transition: the list is
    /// locked for the append, and a callback pass snapshots the list length
    /// when it starts.
    pub fn push_callback(&self, callback: CompletionCallback) {
        self.callbacks.lock().push(callback);
    }

    /// Number of callbacks registered so far.
    pub fn callback_count(&self) -> usize {
        self.callbacks.lock().len()
    }

    /// The callback at `index`, if one is registered there.
    ///
    /// Returns a clone so the list lock is released before the callback
    /// runs; a callback may therefore register further callbacks without
    /// deadlocking.
    pub fn callback_at(&self, index: usize) -> Option<CompletionCallback> {
        self.callbacks.lock().get(index).cloned()
    }

    /// Latch the task-complete flag.
    ///
    /// Called exactly once per context, by the worker that won the
    /// pop-on-completion transition.
    pub fn mark_task_complete(&self) {
        self.task_complete.store(true, Ordering::SeqCst);
    }

    /// Whether the executor has reported its final step.
    pub fn is_task_complete(&self) -> bool {
        self.task_complete.load(Ordering::SeqCst)
    }

    /// Whether the task and all its callbacks have finished.
    pub fn is_finished(&self) -> bool {
        self.callbacks_complete.load(Ordering::SeqCst)
    }

    /// Latch callbacks-complete and wake every waiter.
    ///
    /// Idempotent. The flag is flipped under the wait mutex so a waiter
    /// checking it inside [`wait_until_finished`](Self::wait_until_finished)
    /// cannot miss the notification.
    pub fn finish_callbacks(&self) {
        let _guard = self.wait_lock.lock();
        self.callbacks_complete.store(true, Ordering::SeqCst);
        self.wait_cond.notify_all();
    }

    /// Block until callbacks-complete is latched.
    ///
    /// Returns immediately when the latch is already set.
    pub fn wait_until_finished(&self) {
        let mut guard = self.wait_lock.lock();
        while !self.callbacks_complete.load(Ordering::SeqCst) {
            self.wait_cond.wait(&mut guard);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;
    use taskgrid_core::traits::StepStatus;

    struct NoopExecutor;

    impl Executor for NoopExecutor {
        fn execute_step(&self, _thread_index: usize, _thread_count: usize) -> StepStatus {
            StepStatus::Done
        }
    }

    fn context(priority: i32) -> TaskContext {
        TaskContext::new(TaskId::from_raw(1), priority, Arc::new(NoopExecutor))
    }

    #[test]
    fn test_latches_start_unset() {
        let ctx = context(5);
        assert!(!ctx.is_task_complete());
        assert!(!ctx.is_finished());
        assert_eq!(ctx.priority(), 5);
        assert_eq!(ctx.id(), TaskId::from_raw(1));
    }

    #[test]
    fn test_finish_callbacks_is_idempotent() {
        let ctx = context(0);
        ctx.finish_callbacks();
        assert!(ctx.is_finished());
        ctx.finish_callbacks();
        assert!(ctx.is_finished());
    }

    #[test]
    fn test_wait_returns_immediately_when_finished() {
        let ctx = context(0);
        ctx.finish_callbacks();
        // Must not block.
        ctx.wait_until_finished();
    }

    #[test]
    fn test_wait_wakes_on_finish() {
        let ctx = Arc::new(context(0));
        let ctx_clone = Arc::clone(&ctx);

        let waiter = thread::spawn(move || {
            ctx_clone.wait_until_finished();
        });

        thread::sleep(Duration::from_millis(20));
        ctx.finish_callbacks();

        waiter.join().unwrap();
        assert!(ctx.is_finished());
    }

    #[test]
    fn test_callbacks_keep_registration_order() {
        let ctx = context(0);

        ctx.push_callback(Arc::new(|id| assert_eq!(id, TaskId::from_raw(1))));
        ctx.push_callback(Arc::new(|_id| {}));
        assert_eq!(ctx.callback_count(), 2);

        assert!(ctx.callback_at(0).is_some());
        assert!(ctx.callback_at(1).is_some());
        assert!(ctx.callback_at(2).is_none());
    }
}
