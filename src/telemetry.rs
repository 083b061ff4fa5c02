//! Structured observability hooks.
//!
//! With the `tracing` feature enabled, the pool emits `tracing` events for
//! submissions, rejections, task outcomes and worker lifecycle changes, and
//! each worker runs inside its own span. Without the feature this module
//! only provides [`TracedTask`], which then behaves as a plain pass-through.
//!
//! # Example
//!
//! ```rust,ignore
//! use rust_elastic_pool::prelude::*;
//! use rust_elastic_pool::telemetry::TracedTask;
//!
//! let pool = ElasticPool::with_config(PoolConfig::new(2, 4))?;
//!
//! let span = tracing::info_span!("request", id = 7);
//! let _entered = span.enter();
//! // The task runs inside "request" even though a worker thread executes it
//! pool.execute_task(TracedTask::new(ClosureTask::new(|| Ok(()))))?;
//! ```

use crate::core::{Result, Task};

/// A task wrapper that carries the submitter's tracing span onto the
/// worker thread.
///
/// The span current at construction time is entered for the duration of
/// [`Task::run`].
pub struct TracedTask<T: Task> {
    inner: T,
    #[cfg(feature = "tracing")]
    span: tracing::Span,
}

impl<T: Task> TracedTask<T> {
    /// Wrap `task`, capturing the current span
    pub fn new(task: T) -> Self {
        Self {
            inner: task,
            #[cfg(feature = "tracing")]
            span: tracing::Span::current(),
        }
    }

    /// Wrap `task` under an explicit span
    #[cfg(feature = "tracing")]
    pub fn with_span(task: T, span: tracing::Span) -> Self {
        Self { inner: task, span }
    }
}

impl<T: Task> Task for TracedTask<T> {
    fn run(&mut self) -> Result<()> {
        #[cfg(feature = "tracing")]
        let _guard = self.span.enter();
        self.inner.run()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// Event emitters consumed by `tracing` subscribers.
///
/// Field names follow the `counter.*` / `gauge.*` / `histogram.*`
/// convention understood by tracing-to-metrics bridges.
#[cfg(feature = "tracing")]
pub mod metrics {
    use std::time::Duration;

    /// A task was accepted into a shard.
    #[inline]
    pub fn record_submission(queue_depth: usize) {
        tracing::trace!(
            counter.tasks_submitted = 1,
            gauge.queue_depth = queue_depth as i64,
            "task submitted"
        );
    }

    /// A task was handed to the rejection policy.
    #[inline]
    pub fn record_rejection(policy: &str) {
        tracing::debug!(counter.tasks_rejected = 1, policy = policy, "task rejected");
    }

    /// A task returned, successfully or with an error.
    #[inline]
    pub fn record_completion(duration: Duration, success: bool) {
        let duration_ms = duration.as_millis() as u64;
        if success {
            tracing::trace!(
                counter.tasks_completed = 1,
                histogram.task_duration_ms = duration_ms,
                "task completed"
            );
        } else {
            tracing::trace!(
                counter.tasks_failed = 1,
                histogram.task_duration_ms = duration_ms,
                "task failed"
            );
        }
    }

    /// A task panicked.
    #[inline]
    pub fn record_panic(duration: Duration) {
        tracing::trace!(
            counter.tasks_panicked = 1,
            histogram.task_duration_ms = duration.as_millis() as u64,
            "task panicked"
        );
    }

    /// A worker picked up a task.
    #[inline]
    pub fn record_worker_busy(worker_id: usize) {
        tracing::trace!(gauge.workers_busy = 1, worker_id = worker_id, "worker busy");
    }

    /// A worker went back to polling.
    #[inline]
    pub fn record_worker_idle(worker_id: usize) {
        tracing::trace!(gauge.workers_busy = -1i64, worker_id = worker_id, "worker idle");
    }

    /// A worker thread was started.
    #[inline]
    pub fn record_worker_spawned(worker_id: usize, shard: usize, workers: usize) {
        tracing::debug!(
            gauge.workers = workers as i64,
            worker_id = worker_id,
            shard = shard,
            "worker spawned"
        );
    }

    /// A surplus worker left after an idle timeout.
    #[inline]
    pub fn record_worker_retired(worker_id: usize) {
        tracing::debug!(counter.workers_retired = 1, worker_id = worker_id, "worker retired");
    }

    /// The pool finished starting its core workers.
    #[inline]
    pub fn record_pool_start(core: usize, max: usize, shards: usize) {
        tracing::info!(core = core, max = max, shards = shards, "elastic pool started");
    }

    /// The last worker exited after shutdown.
    #[inline]
    pub fn record_pool_shutdown(tasks_completed: u64, tasks_failed: u64) {
        tracing::info!(
            tasks_completed = tasks_completed,
            tasks_failed = tasks_failed,
            "elastic pool terminated"
        );
    }
}
