//! Task parameter access trait.
//!
//! A task is a read-only named-parameter bag plus the name of the executor
//! kind that should run it. The scheduler never inspects parameters itself;
//! it only reads the kind name to resolve a constructor, then hands the task
//! over to the constructed executor. Ownership transfers to the scheduler at
//! schedule time.

/// Read-only parameters for an executor.
///
/// Every accessor returns `None` when the name is unrecognized; only
/// [`executor_kind`](Task::executor_kind) is mandatory. Implementations are
/// expected to be cheap value lookups, not computations.
///
/// # Examples
///
/// ```
/// use taskgrid_core::traits::Task;
///
/// struct RenderTask {
///     width: i64,
/// }
///
/// impl Task for RenderTask {
///     fn int_param(&self, name: &str) -> Option<i64> {
///         (name == "width").then_some(self.width)
///     }
///
///     fn executor_kind(&self) -> &str {
///         "renderer"
///     }
/// }
///
/// let task = RenderTask { width: 640 };
/// assert_eq!(task.int_param("width"), Some(640));
/// assert_eq!(task.int_param("height"), None);
/// ```
pub trait Task: Send + Sync {
    /// Look up an integer parameter by name.
    fn int_param(&self, name: &str) -> Option<i64> {
        let _ = name; // Avoid unused variable warnings
        None
    }

    /// Look up a string parameter by name.
    fn string_param(&self, name: &str) -> Option<String> {
        let _ = name;
        None
    }

    /// Look up a floating-point parameter by name.
    fn float_param(&self, name: &str) -> Option<f64> {
        let _ = name;
        None
    }

    /// The registered kind name of the executor that should run this task.
    fn executor_kind(&self) -> &str;
}
