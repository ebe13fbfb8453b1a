//! Error types for the taskgrid scheduler.
//!
//! This module defines the error conditions a caller can observe. The
//! taxonomy follows the scheduler's contract: configuration errors
//! (unregistered or misconfigured executor kinds) are non-recoverable at the
//! call that triggered them, usage errors (unknown task ids) are reported and
//! never crash, and every failure surfaces synchronously at the triggering
//! call.
//!
//! Executor steps have no error channel of their own; `Continue`/`Done` is
//! the only feedback from a step, and an executor that cannot make progress
//! must represent that as an application-level condition.

use crate::id::TaskId;
use thiserror::Error;

/// Root error type for the taskgrid system.
#[derive(Debug, Error)]
pub enum Error {
    /// No executor constructor is registered under the requested kind name.
    ///
    /// The kind must be registered before any task declaring it is
    /// scheduled; this is a caller contract, not a transient condition.
    #[error("no executor registered for kind: {0}")]
    UnknownExecutor(String),

    /// A registered constructor rejected the task it was given.
    #[error("failed to construct {kind} executor: {reason}")]
    Construction {
        /// Kind name the constructor was registered under
        kind: String,

        /// Why the constructor rejected the task
        reason: String,
    },

    /// The task id was never issued by this scheduler.
    #[error("unknown task id: {0}")]
    UnknownTask(TaskId),

    /// The scheduler has been terminated and accepts no new work.
    #[error("scheduler is shutting down")]
    ShuttingDown,

    /// General runtime errors
    #[error("runtime error: {0}")]
    Runtime(String),
}

/// Result type used throughout the taskgrid system.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = Error::UnknownExecutor("raytracer".to_string());
        assert_eq!(
            format!("{}", error),
            "no executor registered for kind: raytracer"
        );

        let error = Error::UnknownTask(TaskId::from_raw(7));
        assert_eq!(format!("{}", error), "unknown task id: task-7");

        let error = Error::Construction {
            kind: "printer".to_string(),
            reason: "missing parameter: copies".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "failed to construct printer executor: missing parameter: copies"
        );
    }

    #[test]
    fn test_error_is_debug() {
        let error = Error::ShuttingDown;
        let debug = format!("{:?}", error);
        assert!(debug.contains("ShuttingDown"));
    }
}
