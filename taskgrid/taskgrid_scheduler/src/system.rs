//! The scheduler facade.
//!
//! [`Scheduler`] is an explicit handle, not a global: constructing one
//! allocates the shared structures and starts the workers, every operation
//! takes the handle by reference, and [`terminate`](Scheduler::terminate)
//! stops and joins the workers. `Drop` terminates as a safety net.

use log::{debug, info};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use taskgrid_core::error::{Error, Result};
use taskgrid_core::id::{IdGenerator, TaskId};
use taskgrid_core::traits::{Executor, Task};

use crate::context::TaskContext;
use crate::pool::WorkerPool;
use crate::queue::TaskQueue;
use crate::registry::{ExecutorProvider, ExecutorRegistry};
use crate::table::ContextTable;

/// Configuration for a [`Scheduler`].
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Number of worker threads
    pub worker_threads: usize,

    /// How long an idle worker sleeps before re-checking the queue
    pub idle_poll_interval: Duration,

    /// Name prefix for worker threads
    pub thread_name_prefix: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            worker_threads: num_cpus::get(),
            idle_poll_interval: Duration::from_millis(2),
            thread_name_prefix: "taskgrid-worker".to_string(),
        }
    }
}

/// Counters describing scheduler activity.
#[derive(Debug, Default, Clone)]
pub struct SchedulerStats {
    /// Tasks accepted for scheduling, callback tasks included
    pub tasks_scheduled: u64,

    /// Tasks whose executor reported its final step
    pub tasks_completed: u64,

    /// Executor steps issued across all workers
    pub steps_executed: u64,
}

/// Shared state the facade and every worker hold an `Arc` to.
pub(crate) struct SchedulerCore {
    /// Executor kind registry
    pub(crate) registry: ExecutorRegistry,

    /// The shared max-priority queue
    pub(crate) queue: TaskQueue,

    /// Task-id to context lookup
    pub(crate) table: ContextTable,

    /// Task id source
    pub(crate) ids: IdGenerator,

    /// Tells workers to exit their loop
    pub(crate) shutdown: AtomicBool,

    /// Tasks accepted for scheduling
    pub(crate) tasks_scheduled: AtomicU64,

    /// Tasks whose executor reported its final step
    pub(crate) tasks_completed: AtomicU64,

    /// Executor steps issued across all workers
    pub(crate) steps_executed: AtomicU64,
}

impl SchedulerCore {
    fn new() -> Self {
        Self {
            registry: ExecutorRegistry::new(),
            queue: TaskQueue::new(),
            table: ContextTable::new(),
            ids: IdGenerator::new(),
            shutdown: AtomicBool::new(false),
            tasks_scheduled: AtomicU64::new(0),
            tasks_completed: AtomicU64::new(0),
            steps_executed: AtomicU64::new(0),
        }
    }

    /// Allocate a context for `executor`, publish it, and hand back its id.
    ///
    /// Table insert happens before the queue insert; neither needs to be
    /// atomic with the other because the id only escapes after both, so no
    /// caller can look it up while the context is half-published.
    pub(crate) fn schedule_executor(&self, executor: Arc<dyn Executor>, priority: i32) -> TaskId {
        let id = self.ids.next_id();
        let context = Arc::new(TaskContext::new(id, priority, executor));

        self.table.insert(id, Arc::clone(&context));
        self.queue.push(context);
        self.tasks_scheduled.fetch_add(1, Ordering::Relaxed);

        id
    }
}

/// The public surface of the task system.
///
/// Schedules tasks by priority onto a fixed worker pool, chains completion
/// callbacks, and lets callers block until a task plus its callbacks has
/// fully finished. All methods take `&self` and are safe to call from many
/// threads.
pub struct Scheduler {
    /// State shared with the workers
    core: Arc<SchedulerCore>,

    /// Worker threads; drained by the first effective terminate
    workers: Mutex<WorkerPool>,

    /// The configuration this scheduler was started with
    config: SchedulerConfig,
}

impl Scheduler {
    /// Start a scheduler with the default configuration.
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    /// Start a scheduler with the given configuration.
    pub fn with_config(config: SchedulerConfig) -> Self {
        let core = Arc::new(SchedulerCore::new());

        info!(
            "Starting scheduler with {} workers (idle poll {:?})",
            config.worker_threads, config.idle_poll_interval
        );

        let workers = WorkerPool::start(
            Arc::clone(&core),
            config.worker_threads,
            config.idle_poll_interval,
            &config.thread_name_prefix,
        );

        Self {
            core,
            workers: Mutex::new(workers),
            config,
        }
    }

    /// Install or replace the executor constructor for a kind name.
    pub fn register<F>(&self, kind: impl Into<String>, constructor: F)
    where
        F: Fn(Box<dyn Task>) -> Result<Box<dyn Executor>> + Send + Sync + 'static,
    {
        self.core.registry.register(kind, constructor);
    }

    /// Install every executor kind a provider supplies.
    ///
    /// Invoked once per provider, synchronously, before tasks of its kinds
    /// are scheduled.
    pub fn install(&self, provider: &dyn ExecutorProvider) {
        provider.register(&self.core.registry);
    }

    /// Schedule a task at the given priority; higher runs sooner.
    ///
    /// Resolves the task's declared executor kind, constructs the executor,
    /// and publishes the task to the worker pool. The returned id is the
    /// handle for [`wait`](Self::wait) and [`on_completed`](Self::on_completed).
    ///
    /// # Returns
    ///
    /// * `Ok(TaskId)` - The unique handle for the scheduled task.
    /// * `Err(Error::UnknownExecutor)` if the kind was never registered.
    /// * `Err(Error::ShuttingDown)` after [`terminate`](Self::terminate).
    pub fn schedule(&self, task: Box<dyn Task>, priority: i32) -> Result<TaskId> {
        if self.core.shutdown.load(Ordering::SeqCst) {
            return Err(Error::ShuttingDown);
        }

        let executor = self.core.registry.construct(task)?;
        let id = self.core.schedule_executor(Arc::from(executor), priority);

        debug!("Scheduled {} at priority {}", id, priority);
        Ok(id)
    }

    /// Block until the task and all its registered callbacks have finished.
    ///
    /// Returns immediately when the task already finished. Waiting on one
    /// task never blocks scheduling or stepping of others.
    ///
    /// # Returns
    ///
    /// * `Ok(())` once the task's callbacks-complete latch is set.
    /// * `Err(Error::UnknownTask)` if the id was never issued here.
    pub fn wait(&self, id: TaskId) -> Result<()> {
        let context = self.core.table.lookup(id).ok_or(Error::UnknownTask(id))?;
        context.wait_until_finished();
        Ok(())
    }

    /// Register a callback to run after the task completes.
    ///
    /// Callbacks run in registration order, each invoked with the task's
    /// id, as a separate scheduled task at the original priority plus one.
    /// Register before the task reaches completion: a registration that
    /// arrives after the callback pass has snapshotted its count does not
    /// run in that pass.
    ///
    /// # Returns
    ///
    /// * `Ok(())` when the callback was recorded.
    /// * `Err(Error::UnknownTask)` if the id was never issued here.
    pub fn on_completed<F>(&self, id: TaskId, callback: F) -> Result<()>
    where
        F: Fn(TaskId) + Send + Sync + 'static,
    {
        let context = self.core.table.lookup(id).ok_or(Error::UnknownTask(id))?;
        context.push_callback(Arc::new(callback));
        Ok(())
    }

    /// Stop the workers and wait for them to exit.
    ///
    /// Idempotent: the join handles are drained under a lock, so only the
    /// first effective call joins; later calls (including `Drop`) are
    /// no-ops. Queued tasks that have not completed are abandoned, and
    /// waiters on such tasks are not woken.
    pub fn terminate(&self) {
        if !self.core.shutdown.swap(true, Ordering::SeqCst) {
            info!("Terminating scheduler");
        }
        self.workers.lock().join_all();
    }

    /// Whether [`terminate`](Self::terminate) has been called.
    pub fn is_terminated(&self) -> bool {
        self.core.shutdown.load(Ordering::SeqCst)
    }

    /// Number of worker threads this scheduler was started with.
    pub fn worker_count(&self) -> usize {
        self.config.worker_threads
    }

    /// The configuration this scheduler was started with.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// A snapshot of the scheduler's activity counters.
    pub fn stats(&self) -> SchedulerStats {
        SchedulerStats {
            tasks_scheduled: self.core.tasks_scheduled.load(Ordering::Relaxed),
            tasks_completed: self.core.tasks_completed.load(Ordering::Relaxed),
            steps_executed: self.core.steps_executed.load(Ordering::Relaxed),
        }
    }
}

impl Default for Scheduler {
    /// Default implementation that uses the default configuration
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.terminate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use taskgrid_core::traits::StepStatus;
    use taskgrid_core::types::TaskParams;

    struct OneShot;

    impl Executor for OneShot {
        fn execute_step(&self, _thread_index: usize, _thread_count: usize) -> StepStatus {
            StepStatus::Done
        }
    }

    fn single_worker() -> Scheduler {
        Scheduler::with_config(SchedulerConfig {
            worker_threads: 1,
            idle_poll_interval: Duration::from_millis(1),
            ..Default::default()
        })
    }

    #[test]
    fn test_schedule_unknown_kind_fails_fast() {
        let scheduler = single_worker();
        let result = scheduler.schedule(Box::new(TaskParams::new("ghost")), 1);
        assert!(matches!(result, Err(Error::UnknownExecutor(_))));
        scheduler.terminate();
    }

    #[test]
    fn test_schedule_and_wait_round_trip() {
        let scheduler = single_worker();
        scheduler.register("oneshot", |_task| Ok(Box::new(OneShot) as Box<dyn Executor>));

        let id = scheduler
            .schedule(Box::new(TaskParams::new("oneshot")), 5)
            .unwrap();
        scheduler.wait(id).unwrap();

        let stats = scheduler.stats();
        assert_eq!(stats.tasks_scheduled, 1);
        assert_eq!(stats.tasks_completed, 1);
        assert!(stats.steps_executed >= 1);

        scheduler.terminate();
    }

    #[test]
    fn test_ids_increase_in_issuance_order() {
        let scheduler = single_worker();
        scheduler.register("oneshot", |_task| Ok(Box::new(OneShot) as Box<dyn Executor>));

        let mut previous: Option<TaskId> = None;
        for _ in 0..10 {
            let id = scheduler
                .schedule(Box::new(TaskParams::new("oneshot")), 1)
                .unwrap();
            if let Some(previous) = previous {
                assert!(id > previous);
            }
            previous = Some(id);
        }

        scheduler.terminate();
    }

    #[test]
    fn test_wait_unknown_id_is_usage_error() {
        let scheduler = single_worker();
        let result = scheduler.wait(TaskId::from_raw(123456));
        assert!(matches!(result, Err(Error::UnknownTask(_))));
        scheduler.terminate();
    }

    #[test]
    fn test_on_completed_unknown_id_is_usage_error() {
        let scheduler = single_worker();
        let result = scheduler.on_completed(TaskId::from_raw(123456), |_id| {});
        assert!(matches!(result, Err(Error::UnknownTask(_))));
        scheduler.terminate();
    }

    #[test]
    fn test_terminate_is_idempotent_and_rejects_new_work() {
        let scheduler = single_worker();
        scheduler.register("oneshot", |_task| Ok(Box::new(OneShot) as Box<dyn Executor>));

        scheduler.terminate();
        scheduler.terminate();
        assert!(scheduler.is_terminated());

        let result = scheduler.schedule(Box::new(TaskParams::new("oneshot")), 1);
        assert!(matches!(result, Err(Error::ShuttingDown)));
    }

    #[test]
    fn test_install_provider_registers_kinds() {
        struct OneShotProvider;

        impl ExecutorProvider for OneShotProvider {
            fn register(&self, registry: &ExecutorRegistry) {
                registry.register("oneshot", |_task| Ok(Box::new(OneShot) as Box<dyn Executor>));
            }
        }

        let scheduler = single_worker();
        scheduler.install(&OneShotProvider);

        let id = scheduler
            .schedule(Box::new(TaskParams::new("oneshot")), 1)
            .unwrap();
        scheduler.wait(id).unwrap();
        scheduler.terminate();
    }

    #[test]
    fn test_constructor_sees_task_parameters() {
        let scheduler = single_worker();
        let seen_max = Arc::new(AtomicUsize::new(0));

        let seen = Arc::clone(&seen_max);
        scheduler.register("counting", move |task: Box<dyn Task>| {
            let max = task.int_param("max").unwrap_or(0);
            seen.store(max as usize, Ordering::SeqCst);
            Ok(Box::new(OneShot) as Box<dyn Executor>)
        });

        let task = TaskParams::new("counting").with_int("max", 5);
        let id = scheduler.schedule(Box::new(task), 1).unwrap();
        scheduler.wait(id).unwrap();

        assert_eq!(seen_max.load(Ordering::SeqCst), 5);
        scheduler.terminate();
    }
}
