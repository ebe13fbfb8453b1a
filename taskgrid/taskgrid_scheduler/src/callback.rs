//! The synthetic executor draining a finished task's callbacks.
//!
//! When a task with registered callbacks completes, the worker that won the
//! completion transition schedules one of these at the task's priority plus
//! one, so the callbacks preempt newly queued same-priority work. The
//! synthetic task then flows through the ordinary queue/worker pipeline: one
//! callback per step, and on its own completion it latches the original
//! context's callbacks-complete flag, waking every waiter.
//!
//! A callback-executor task must not itself have callbacks registered.

use log::trace;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use taskgrid_core::traits::{Executor, StepStatus};

use crate::context::TaskContext;

/// Executor that invokes a completed task's callbacks, one per step.
///
/// The callback count is snapshotted at construction: callbacks registered
/// after the snapshot are not part of this run. Each step claims the next
/// index with a lock-free atomic increment, so even when several workers
/// race on the same synthetic task, every callback in the snapshot runs
/// exactly once and in registration order of claiming.
pub struct CallbackExecutor {
    /// Context of the completed task whose callbacks we run
    context: Arc<TaskContext>,

    /// Next callback index to claim
    next_index: AtomicUsize,

    /// Snapshot of the callback count at construction
    total: usize,
}

impl CallbackExecutor {
    /// Wrap the completed task's context.
    ///
    /// The context arrives through this typed constructor rather than a
    /// generic task parameter, so a callback executor without a context is
    /// unrepresentable.
    pub fn new(context: Arc<TaskContext>) -> Self {
        let total = context.callback_count();
        Self {
            context,
            next_index: AtomicUsize::new(0),
            total,
        }
    }

    /// How many callbacks this run will invoke.
    pub fn callback_total(&self) -> usize {
        self.total
    }
}

impl Executor for CallbackExecutor {
    fn execute_step(&self, _thread_index: usize, _thread_count: usize) -> StepStatus {
        // Claim the next index exclusively; racing steppers each get a
        // distinct one.
        let claimed = self.next_index.fetch_add(1, Ordering::SeqCst);

        if claimed >= self.total {
            // The snapshot is already drained; latch idempotently.
            self.context.finish_callbacks();
            return StepStatus::Done;
        }

        if let Some(callback) = self.context.callback_at(claimed) {
            trace!(
                "running callback {}/{} for {}",
                claimed + 1,
                self.total,
                self.context.id()
            );
            callback(self.context.id());
        }

        if claimed + 1 == self.total {
            self.context.finish_callbacks();
            StepStatus::Done
        } else {
            StepStatus::Continue
        }
    }
}
