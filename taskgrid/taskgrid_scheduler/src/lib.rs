#![deny(warnings)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

//! # Taskgrid Scheduler
//!
//! A priority-based, multi-threaded task scheduler. A fixed pool of worker
//! threads drives pluggable [`Executor`](taskgrid_core::traits::Executor)s to
//! completion in strict priority order, one bounded step at a time; per-task
//! completion callbacks run as a first-class scheduled task, and callers can
//! block until a task plus its callbacks has fully finished.
//!
//! ## Components
//!
//! - **registry**: Maps executor kind names to constructors
//! - **context**: The scheduler's private per-task record
//! - **queue**: The shared max-priority queue of contexts
//! - **table**: Task-id to context lookup
//! - **callback**: The synthetic executor draining completion callbacks
//! - **pool**: Worker threads running the scheduling loop
//! - **system**: The [`Scheduler`] facade and its configuration
//!
//! ## Quick Start
//!
//! ```
//! use taskgrid_core::traits::{Executor, StepStatus};
//! use taskgrid_core::types::TaskParams;
//! use taskgrid_scheduler::Scheduler;
//!
//! struct Greeter;
//!
//! impl Executor for Greeter {
//!     fn execute_step(&self, _thread_index: usize, _thread_count: usize) -> StepStatus {
//!         StepStatus::Done
//!     }
//! }
//!
//! let scheduler = Scheduler::new();
//! scheduler.register("greeter", |_task| Ok(Box::new(Greeter) as Box<dyn Executor>));
//!
//! let id = scheduler.schedule(Box::new(TaskParams::new("greeter")), 10).unwrap();
//! scheduler.wait(id).unwrap();
//! scheduler.terminate();
//! ```

pub mod callback;
pub mod context;
pub mod pool;
pub mod queue;
pub mod registry;
pub mod system;
pub mod table;

// Re-export key types for easier access
pub use callback::CallbackExecutor;
pub use context::{CompletionCallback, TaskContext};
pub use pool::WorkerPool;
pub use queue::TaskQueue;
pub use registry::{ExecutorProvider, ExecutorRegistry};
pub use system::{Scheduler, SchedulerConfig, SchedulerStats};
pub use table::ContextTable;
