//! A stock builder-style task parameter bag.
//!
//! Executor providers are free to implement [`Task`] themselves; this bag
//! covers the common case of a handful of named values without a dedicated
//! struct per executor kind.

use crate::traits::Task;
use std::collections::HashMap;

/// A named-parameter bag implementing [`Task`].
///
/// # Examples
///
/// ```
/// use taskgrid_core::traits::Task;
/// use taskgrid_core::types::TaskParams;
///
/// let task = TaskParams::new("printer")
///     .with_int("copies", 3)
///     .with_string("text", "hello")
///     .with_float("scale", 1.5);
///
/// assert_eq!(task.executor_kind(), "printer");
/// assert_eq!(task.int_param("copies"), Some(3));
/// assert_eq!(task.string_param("text").as_deref(), Some("hello"));
/// assert_eq!(task.float_param("scale"), Some(1.5));
/// ```
#[derive(Debug, Clone)]
pub struct TaskParams {
    kind: String,
    ints: HashMap<String, i64>,
    strings: HashMap<String, String>,
    floats: HashMap<String, f64>,
}

impl TaskParams {
    /// Create an empty parameter bag for the given executor kind.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ints: HashMap::new(),
            strings: HashMap::new(),
            floats: HashMap::new(),
        }
    }

    /// Add an integer parameter.
    pub fn with_int(mut self, name: impl Into<String>, value: i64) -> Self {
        self.ints.insert(name.into(), value);
        self
    }

    /// Add a string parameter.
    pub fn with_string(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.strings.insert(name.into(), value.into());
        self
    }

    /// Add a floating-point parameter.
    pub fn with_float(mut self, name: impl Into<String>, value: f64) -> Self {
        self.floats.insert(name.into(), value);
        self
    }
}

impl Task for TaskParams {
    fn int_param(&self, name: &str) -> Option<i64> {
        self.ints.get(name).copied()
    }

    fn string_param(&self, name: &str) -> Option<String> {
        self.strings.get(name).cloned()
    }

    fn float_param(&self, name: &str) -> Option<f64> {
        self.floats.get(name).copied()
    }

    fn executor_kind(&self) -> &str {
        &self.kind
    }
}
