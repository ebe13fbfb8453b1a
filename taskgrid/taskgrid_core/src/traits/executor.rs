//! The steppable executor contract.
//!
//! An executor wraps a task and performs one bounded unit of work per
//! [`execute_step`](Executor::execute_step) call, reporting whether that
//! unit was the last one. The scheduler calls the step repeatedly, possibly
//! from different worker threads between calls, until it observes
//! [`StepStatus::Done`].

use crate::error::Result;
use crate::traits::task::Task;

/// Outcome of a single executor step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// More work remains; the scheduler will step this executor again.
    Continue,

    /// The unit of work just performed was the last one.
    Done,
}

impl StepStatus {
    /// Whether this status ends the executor's step sequence.
    pub fn is_done(&self) -> bool {
        matches!(self, StepStatus::Done)
    }
}

/// A pluggable, steppable unit of work.
///
/// Steps are issued through `&self` because the executor is shared between
/// the scheduler's queue, its context table, and whichever worker is
/// currently stepping it; implementations coordinate internal state with
/// atomics or locks. Two racing workers can both step an executor whose top
/// position is in flux, so implementations must also tolerate extra step
/// calls after they have reported [`StepStatus::Done`].
///
/// The `(thread_index, thread_count)` pair lets a parallel executor carve up
/// its work by worker; `thread_index` is always in `[0, thread_count)`.
/// A step that never returns stalls its worker permanently; steps are
/// expected to be short and bounded.
pub trait Executor: Send + Sync {
    /// Perform one bounded unit of work.
    fn execute_step(&self, thread_index: usize, thread_count: usize) -> StepStatus;
}

/// Constructor producing an owned executor from an owned task.
///
/// Registered under a kind name; invoked by the scheduler when a task
/// declaring that kind is scheduled. Returns an error when the task is
/// missing something the executor requires, which fails the schedule call
/// synchronously.
pub type ExecutorConstructor = Box<dyn Fn(Box<dyn Task>) -> Result<Box<dyn Executor>> + Send + Sync>;
