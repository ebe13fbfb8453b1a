//! Core traits connecting the scheduler to pluggable units of work.
//!
//! - [`Task`]: the read-only parameter bag describing what to run
//! - [`Executor`]: a steppable unit of work constructed from a task

pub mod executor;
pub mod task;

// Re-export key types from executor
pub use executor::{Executor, ExecutorConstructor, StepStatus};

// Re-export key types from task
pub use task::Task;
