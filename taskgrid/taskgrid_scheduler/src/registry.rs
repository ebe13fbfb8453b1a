//! Executor kind registry.
//!
//! Maps an executor kind name to the constructor that produces executors of
//! that kind. Providers register their kinds before any task declaring them
//! is scheduled; scheduling a task with an unregistered kind fails the
//! schedule call.

use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;
use taskgrid_core::error::{Error, Result};
use taskgrid_core::traits::{Executor, ExecutorConstructor, Task};

/// Registry of executor constructors, keyed by kind name.
///
/// Registration and lookup are guarded by one read/write lock; lookups from
/// many scheduling threads proceed concurrently.
#[derive(Default)]
pub struct ExecutorRegistry {
    constructors: RwLock<HashMap<String, ExecutorConstructor>>,
}

impl ExecutorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install or replace the constructor for a kind name.
    pub fn register<F>(&self, kind: impl Into<String>, constructor: F)
    where
        F: Fn(Box<dyn Task>) -> Result<Box<dyn Executor>> + Send + Sync + 'static,
    {
        let kind = kind.into();
        debug!("registering executor kind: {}", kind);
        self.constructors.write().insert(kind, Box::new(constructor));
    }

    /// Construct an executor for `task` from its declared kind.
    ///
    /// # Returns
    ///
    /// * `Ok(executor)` - An owned executor wrapping the task.
    /// * `Err(Error::UnknownExecutor)` if the kind was never registered.
    /// * Whatever error the constructor itself reports.
    pub fn construct(&self, task: Box<dyn Task>) -> Result<Box<dyn Executor>> {
        let kind = task.executor_kind().to_string();
        let constructors = self.constructors.read();
        let constructor = constructors
            .get(&kind)
            .ok_or_else(|| Error::UnknownExecutor(kind.clone()))?;
        constructor(task)
    }

    /// Whether a constructor is registered under `kind`.
    pub fn contains(&self, kind: &str) -> bool {
        self.constructors.read().contains_key(kind)
    }

    /// Number of registered kinds.
    pub fn len(&self) -> usize {
        self.constructors.read().len()
    }

    /// Whether the registry has no registered kinds.
    pub fn is_empty(&self) -> bool {
        self.constructors.read().is_empty()
    }
}

/// Entry point implemented by executor providers.
///
/// This is the in-process counterpart of a dynamic library's init symbol:
/// the host invokes [`register`](ExecutorProvider::register) exactly once
/// per provider, synchronously, at install time, and the provider calls
/// [`ExecutorRegistry::register`] for each kind it supplies.
pub trait ExecutorProvider {
    /// Register this provider's executor kinds.
    fn register(&self, registry: &ExecutorRegistry);
}
