//! Worker threads driving the scheduling loop.
//!
//! Each worker repeats: check the shutdown flag; peek the queue top (read
//! lock only); step the top's executor with no queue lock held; and on a
//! final step, re-validate-and-pop under the write lock before performing
//! the completion transition. Re-peeking after every step, instead of
//! sticking with the same context, is how priority preemption happens: a
//! higher-priority task pushed mid-run is at the top by the next peek.
//!
//! An idle worker's bounded poll sleep is its only blocking point.

use log::{debug, error, trace};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use taskgrid_core::traits::StepStatus;

use crate::callback::CallbackExecutor;
use crate::system::SchedulerCore;

/// The scheduler's long-lived worker threads.
pub struct WorkerPool {
    /// Worker threads
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `count` workers named `<prefix>-<index>` over the shared core.
    pub(crate) fn start(
        core: Arc<SchedulerCore>,
        count: usize,
        idle_poll: Duration,
        name_prefix: &str,
    ) -> Self {
        let mut workers = Vec::with_capacity(count);

        for index in 0..count {
            let thread_name = format!("{}-{}", name_prefix, index);
            let core = Arc::clone(&core);

            let builder = thread::Builder::new().name(thread_name);
            let handle = builder
                .spawn(move || worker_loop(index, count, core, idle_poll))
                .expect("Failed to spawn worker thread");

            workers.push(handle);
        }

        Self { workers }
    }

    /// Number of workers still owned by this pool.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Join every worker; handles are drained, so repeat calls are no-ops.
    pub(crate) fn join_all(&mut self) {
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                error!("Worker thread panicked during shutdown");
            }
        }
    }
}

/// The scheduling loop run by each worker thread.
fn worker_loop(index: usize, pool_size: usize, core: Arc<SchedulerCore>, idle_poll: Duration) {
    debug!("Worker {}: Starting", index);

    loop {
        if core.shutdown.load(Ordering::SeqCst) {
            debug!("Worker {}: Shutdown flag set, exiting", index);
            return;
        }

        // Highest-priority context right now. The read lock is released
        // before the step so other workers can peek, push, and pop.
        let context = match core.queue.peek() {
            Some(context) => context,
            None => {
                thread::sleep(idle_poll);
                continue;
            }
        };

        let status = context.executor().execute_step(index, pool_size);
        core.steps_executed.fetch_add(1, Ordering::Relaxed);

        if status == StepStatus::Continue {
            // Re-peek rather than sticking with this context: a freshly
            // pushed higher-priority task takes over at the next iteration.
            continue;
        }

        // Final step observed. Only the worker whose context is still the
        // top may perform the completion transition; anyone else saw a
        // stale top and goes back to re-peek.
        if !core.queue.pop_if_top(&context) {
            trace!(
                "Worker {}: Top changed before removal of {}",
                index,
                context.id()
            );
            continue;
        }

        context.mark_task_complete();
        core.tasks_completed.fetch_add(1, Ordering::Relaxed);

        if context.callback_count() > 0 {
            // Chain the callbacks as their own scheduled task, one priority
            // step above the finished task so they run before any newly
            // queued work of equal priority.
            let executor = Arc::new(CallbackExecutor::new(Arc::clone(&context)));
            let priority = context.priority().saturating_add(1);
            let callback_id = core.schedule_executor(executor, priority);

            trace!(
                "Worker {}: {} finished, callbacks scheduled as {}",
                index,
                context.id(),
                callback_id
            );
        } else {
            trace!("Worker {}: {} finished, no callbacks", index, context.id());
            context.finish_callbacks();
        }
    }
}
