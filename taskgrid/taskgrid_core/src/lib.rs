#![deny(warnings)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

//! # Taskgrid Core
//!
//! `taskgrid_core` provides the fundamental building blocks for the taskgrid
//! scheduler: error types, task identifiers, and the traits connecting the
//! scheduler engine to pluggable units of work.
//!
//! ## Crate Structure
//!
//! - **error**: Error types shared by all taskgrid components
//! - **id**: The `TaskId` handle and its lock-free generator
//! - **traits**: The `Task` and `Executor` contracts
//! - **types**: Concrete data structures behind the traits
//!
//! The scheduler engine itself lives in the `taskgrid_scheduler` crate; this
//! crate deliberately has no threading machinery so executor providers can
//! depend on it alone.

pub mod error;
pub mod id;
pub mod traits;
pub mod types;

// Re-export key types and traits for convenience
pub use error::{Error, Result};
pub use id::{IdGenerator, TaskId};
pub use traits::{Executor, ExecutorConstructor, StepStatus, Task};
pub use types::TaskParams;
