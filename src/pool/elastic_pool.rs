//! Elastic sharded thread pool
//!
//! Tasks are spread round-robin over `max_pool_size` bounded shards. Each
//! worker drains exactly one shard. The pool grows towards `max_pool_size`
//! when spare capacity runs low or a shard has nobody draining it, shrinks
//! back to `core_pool_size` as surplus workers idle out, and hands anything
//! it cannot place to the configured [`RejectionPolicy`].

use crate::core::wrapper::next_task_id;
use crate::core::{
    BoxedTask, ClosureTask, PoolError, RejectionPolicy, Result, Task, TaskOutcome, TaskWrapper,
};
use crate::pool::config::PoolConfig;
use crate::pool::factory::{NamedThreadFactory, ThreadFactory};
use crate::pool::handle::{ResultTask, TaskHandle};
use crate::pool::stats::{PoolCounters, PoolStats};
use crate::pool::worker::{log_outcome, run_bound, Worker, WorkerControl};
use crate::queue::Shard;
use crossbeam_utils::CachePadded;
use parking_lot::{Condvar, Mutex};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Reason given for tasks submitted after shutdown
pub const REASON_SHUTDOWN: &str = "pool is shutting down";

/// Reason given when every shard is full and the pool cannot grow
pub const REASON_SATURATED: &str = "all shards full and max size reached";

/// How long `Drop` waits for workers to finish
const DROP_TIMEOUT: Duration = Duration::from_secs(5);

struct WorkerSlot {
    worker: Arc<Worker>,
    // Dropping the slot detaches the thread
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct PoolState {
    workers: HashMap<usize, WorkerSlot>,
    next_worker_id: usize,
    largest_pool_size: usize,
}

impl PoolState {
    fn bound_count(&self, shard: usize) -> usize {
        self.workers
            .values()
            .filter(|slot| slot.worker.shard_index() == shard)
            .count()
    }
}

/// State shared between the pool handle and its worker threads
pub(crate) struct PoolInner {
    config: PoolConfig,
    min_spare: usize,
    shards: Vec<Shard>,
    state: Mutex<PoolState>,
    termination: Condvar,
    shutdown: AtomicBool,
    terminated: AtomicBool,
    cursor: CachePadded<AtomicUsize>,
    counters: PoolCounters,
    factory: Arc<dyn ThreadFactory>,
    me: Weak<PoolInner>,
}

/// Elastic thread pool with per-worker bounded shards.
///
/// # Example
///
/// ```rust
/// use rust_elastic_pool::prelude::*;
/// use std::time::Duration;
///
/// let pool = ElasticPool::new(2, 4, 1, Duration::from_secs(5), 16, RejectionPolicy::Abort)
///     .expect("Failed to create pool");
///
/// let handle = pool.submit(|| Ok(6 * 7)).expect("Failed to submit");
/// assert_eq!(handle.wait().unwrap(), 42);
///
/// pool.shutdown();
/// assert!(pool.await_termination(Duration::from_secs(5)));
/// ```
pub struct ElasticPool {
    inner: Arc<PoolInner>,
}

impl ElasticPool {
    /// Create a pool and start its core workers.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] for an inconsistent configuration
    /// and [`PoolError::SpawnError`] if a core worker could not be started.
    pub fn new(
        core_pool_size: usize,
        max_pool_size: usize,
        min_spare_threads: usize,
        keep_alive: Duration,
        shard_capacity: usize,
        rejection_policy: RejectionPolicy,
    ) -> Result<Self> {
        Self::with_config(
            PoolConfig::new(core_pool_size, max_pool_size)
                .with_min_spare_threads(min_spare_threads)
                .with_keep_alive(keep_alive)
                .with_shard_capacity(shard_capacity)
                .with_rejection_policy(rejection_policy),
        )
    }

    /// Create a pool from a [`PoolConfig`]
    pub fn with_config(config: PoolConfig) -> Result<Self> {
        Self::with_factory(config, Arc::new(NamedThreadFactory::new()))
    }

    /// Create a pool whose worker threads come from `factory`
    pub fn with_factory(config: PoolConfig, factory: Arc<dyn ThreadFactory>) -> Result<Self> {
        config.validate()?;

        let shards = (0..config.max_pool_size)
            .map(|index| Shard::new(index, config.shard_capacity))
            .collect();
        let min_spare = config.effective_min_spare();
        if min_spare < config.min_spare_threads {
            log::warn!(
                target: "elastic_pool",
                "[ElasticPool] min_spare_threads {} exceeds core size, clamped to {}",
                config.min_spare_threads,
                min_spare
            );
        }

        let inner = Arc::new_cyclic(|me| PoolInner {
            config,
            min_spare,
            shards,
            state: Mutex::new(PoolState::default()),
            termination: Condvar::new(),
            shutdown: AtomicBool::new(false),
            terminated: AtomicBool::new(false),
            cursor: CachePadded::new(AtomicUsize::new(0)),
            counters: PoolCounters::new(),
            factory,
            me: me.clone(),
        });

        let started = {
            let mut state = inner.state.lock();
            (0..inner.config.core_pool_size).try_for_each(|i| {
                inner
                    .add_worker(&mut state, i % inner.shards.len())
                    .map(|_| ())
            })
        };
        if let Err(e) = started {
            inner.shutdown();
            return Err(e);
        }

        let config = &inner.config;
        log::info!(
            target: "elastic_pool",
            "[ElasticPool] '{}' initialised with core={}, max={}, minSpare={}, keepAlive={}ms, shardCapacity={}, policy={}",
            config.pool_name,
            config.core_pool_size,
            config.max_pool_size,
            inner.min_spare,
            config.keep_alive.as_millis(),
            config.shard_capacity,
            config.rejection_policy
        );

        #[cfg(feature = "tracing")]
        crate::telemetry::metrics::record_pool_start(
            config.core_pool_size,
            config.max_pool_size,
            inner.shards.len(),
        );

        Ok(Self { inner })
    }

    /// Submit a closure for fire-and-forget execution.
    ///
    /// # Errors
    ///
    /// Only the `Abort` policy surfaces rejections as
    /// [`PoolError::Rejected`]; the other policies return `Ok(())` even when
    /// the task was run inline or dropped.
    pub fn execute<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        self.execute_task(ClosureTask::new(f))
    }

    /// Submit a [`Task`] implementation
    pub fn execute_task<T: Task + 'static>(&self, task: T) -> Result<()> {
        self.execute_boxed(Box::new(task))
    }

    /// Submit an already boxed task
    pub fn execute_boxed(&self, task: BoxedTask) -> Result<()> {
        self.inner.execute_wrapped(TaskWrapper::new(task))
    }

    /// Submit a value-producing closure and get a handle to its result.
    ///
    /// If the pool drops the task unrun (`Discard`, `DiscardOldest`,
    /// [`shutdown_now`](Self::shutdown_now)) the handle resolves to
    /// [`PoolError::Discarded`].
    pub fn submit<F, T>(&self, f: F) -> Result<TaskHandle<T>>
    where
        F: FnOnce() -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        self.submit_named("SubmittedTask", f)
    }

    /// Like [`submit`](Self::submit), with a name used in logs
    pub fn submit_named<S, F, T>(&self, name: S, f: F) -> Result<TaskHandle<T>>
    where
        S: Into<String>,
        F: FnOnce() -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let name = name.into();
        let task_id = next_task_id();
        let (sender, receiver) = crossbeam_channel::bounded(1);

        let task = ResultTask::new(task_id, f, name.clone(), sender);
        self.inner
            .execute_wrapped(TaskWrapper::with_id(task_id, Box::new(task)))?;
        Ok(TaskHandle::new(task_id, name, receiver))
    }

    /// Stop accepting tasks and let workers finish what is queued.
    ///
    /// Idempotent. Returns immediately; use
    /// [`await_termination`](Self::await_termination) to wait.
    pub fn shutdown(&self) {
        self.inner.shutdown();
    }

    /// Shut down and drop every queued task, returning how many were dropped.
    ///
    /// Tasks already executing run to completion.
    pub fn shutdown_now(&self) -> usize {
        self.inner.shutdown_now()
    }

    /// Block until every worker has exited after shutdown, or `timeout`
    /// elapses. Returns whether the pool is terminated.
    pub fn await_termination(&self, timeout: Duration) -> bool {
        self.inner.await_termination(timeout)
    }

    /// True once shutdown has been requested
    pub fn is_shutdown(&self) -> bool {
        self.inner.is_shutdown()
    }

    /// True once shutdown was requested and every worker has exited
    pub fn is_terminated(&self) -> bool {
        self.inner.terminated.load(Ordering::Acquire)
    }

    /// True if a worker idling out right now would be allowed to exit
    pub fn can_terminate_worker(&self) -> bool {
        let state = self.inner.state.lock();
        self.inner.surplus(&state)
    }

    /// Number of live workers
    pub fn active_worker_count(&self) -> usize {
        self.inner.state.lock().workers.len()
    }

    /// Highest number of live workers seen so far
    pub fn largest_pool_size(&self) -> usize {
        self.inner.state.lock().largest_pool_size
    }

    /// Tasks currently queued across all shards
    pub fn total_queued_count(&self) -> usize {
        self.inner.shards.iter().map(Shard::len).sum()
    }

    /// Tasks currently queued, per shard
    pub fn shard_lengths(&self) -> Vec<usize> {
        self.inner.shards.iter().map(Shard::len).collect()
    }

    /// Tasks that finished running, on a worker or on a caller thread
    pub fn completed_count(&self) -> u64 {
        self.inner.counters.completed()
    }

    /// Finished tasks that returned an error or panicked
    pub fn failed_count(&self) -> u64 {
        self.inner.counters.failed()
    }

    /// Tasks handed to the rejection policy
    pub fn rejected_count(&self) -> u64 {
        self.inner.counters.rejected()
    }

    /// Tasks accepted into a shard
    pub fn submitted_count(&self) -> u64 {
        self.inner.counters.submitted()
    }

    /// Snapshot of sizes and counters
    pub fn stats(&self) -> PoolStats {
        let (active_workers, largest_pool_size) = {
            let state = self.inner.state.lock();
            (state.workers.len(), state.largest_pool_size)
        };
        let shard_lengths = self.shard_lengths();
        let counters = &self.inner.counters;

        PoolStats {
            active_workers,
            largest_pool_size,
            queued: shard_lengths.iter().sum(),
            shard_lengths,
            submitted: counters.submitted(),
            completed: counters.completed(),
            failed: counters.failed(),
            panicked: counters.panicked(),
            rejected: counters.rejected(),
            caller_runs: counters.caller_runs(),
            evicted: counters.evicted(),
            average_processing_time_us: counters.average_processing_time_us(),
            shutdown: self.is_shutdown(),
            terminated: self.is_terminated(),
        }
    }

    /// Configuration the pool was built with
    pub fn config(&self) -> &PoolConfig {
        &self.inner.config
    }

    /// Name used as the worker thread name prefix
    pub fn pool_name(&self) -> &str {
        &self.inner.config.pool_name
    }
}

impl Drop for ElasticPool {
    fn drop(&mut self) {
        self.inner.shutdown();
        // A worker can never see its own termination.
        if self.inner.is_worker_thread() {
            log::debug!(
                target: "elastic_pool",
                "[ElasticPool] '{}' dropped from one of its own workers, not waiting",
                self.inner.config.pool_name
            );
            return;
        }
        if !self.inner.await_termination(DROP_TIMEOUT) {
            log::warn!(
                target: "elastic_pool",
                "[ElasticPool] '{}' dropped with workers still running after {:?}",
                self.inner.config.pool_name,
                DROP_TIMEOUT
            );
        }
    }
}

impl std::fmt::Debug for ElasticPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElasticPool")
            .field("config", &self.inner.config)
            .field("active_workers", &self.active_worker_count())
            .field("shard_lengths", &self.shard_lengths())
            .field("shutdown", &self.is_shutdown())
            .finish()
    }
}

impl PoolInner {
    fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    fn execute_wrapped(&self, wrapper: TaskWrapper) -> Result<()> {
        if self.is_shutdown() {
            return self.reject(wrapper, REASON_SHUTDOWN);
        }

        match self.place_task(wrapper) {
            Ok(shard) => {
                self.accepted();
                self.maybe_grow(shard);
                Ok(())
            }
            Err(wrapper) => match self.grow_and_place(wrapper) {
                Ok(()) => {
                    self.accepted();
                    Ok(())
                }
                Err(wrapper) => {
                    let reason = if self.is_shutdown() {
                        REASON_SHUTDOWN
                    } else {
                        REASON_SATURATED
                    };
                    self.reject(wrapper, reason)
                }
            },
        }
    }

    fn accepted(&self) {
        self.counters.record_submission();

        #[cfg(feature = "tracing")]
        crate::telemetry::metrics::record_submission(self.shards.iter().map(Shard::len).sum());
    }

    /// Offer to each shard once, starting at the round-robin cursor.
    /// Returns the index of the shard that took the task.
    fn place_task(&self, wrapper: TaskWrapper) -> std::result::Result<usize, TaskWrapper> {
        let n = self.shards.len();
        let start = self.cursor.fetch_add(1, Ordering::Relaxed) % n;
        let id = wrapper.id();

        let mut wrapper = wrapper;
        for offset in 0..n {
            let index = (start + offset) % n;
            match self.shards[index].offer(wrapper) {
                Ok(()) => {
                    log::debug!(target: "elastic_pool", "[Pool] Task-{} accepted into shard #{}", id, index);
                    return Ok(index);
                }
                Err(back) => wrapper = back,
            }
        }
        Err(wrapper)
    }

    /// Add a worker if spare capacity is low, or if `landed` has no worker.
    fn maybe_grow(&self, landed: usize) {
        let mut state = self.state.lock();
        if self.is_shutdown() {
            return;
        }
        let workers = state.workers.len();
        if workers >= self.config.max_pool_size {
            return;
        }

        let busy = self.busy_shard_count();
        // Below max size at least one shard is unbound.
        let target = if workers.saturating_sub(busy) < self.min_spare {
            self.unbound_shard(&state)
        } else if state.bound_count(landed) == 0 && !self.shards[landed].is_empty() {
            Some(landed)
        } else {
            None
        };

        if let Some(shard) = target {
            if let Err(e) = self.add_worker(&mut state, shard) {
                log::error!(target: "elastic_pool", "[Pool] failed to grow: {}", e);
            }
        }
    }

    /// Put the task in the least-loaded shard and start a worker for it.
    fn grow_and_place(&self, wrapper: TaskWrapper) -> std::result::Result<(), TaskWrapper> {
        let mut state = self.state.lock();
        if self.is_shutdown() || state.workers.len() >= self.config.max_pool_size {
            return Err(wrapper);
        }

        let index = self.least_loaded_shard();
        let task = wrapper.to_string();
        self.shards[index].offer(wrapper)?;

        match self.add_worker(&mut state, index) {
            Ok(id) => log::info!(
                target: "elastic_pool",
                "[Pool] Created new worker #{} for task {} in shard #{}",
                id,
                task,
                index
            ),
            Err(e) => log::error!(
                target: "elastic_pool",
                "[Pool] could not add a worker for {}, left queued in shard #{}: {}",
                task,
                index,
                e
            ),
        }
        Ok(())
    }

    /// Apply the configured policy to a task the pool could not accept.
    fn reject(&self, wrapper: TaskWrapper, reason: &str) -> Result<()> {
        self.counters.record_rejection();
        let task = wrapper.to_string();
        log::warn!(
            target: "elastic_pool",
            "[Rejected] Task {} was rejected due to: {}",
            task,
            reason
        );

        #[cfg(feature = "tracing")]
        crate::telemetry::metrics::record_rejection(self.config.rejection_policy.as_str());

        match self.config.rejection_policy {
            RejectionPolicy::Abort => Err(PoolError::rejected(task, reason)),
            RejectionPolicy::CallerRuns if !self.is_shutdown() => {
                self.run_in_caller(wrapper);
                Ok(())
            }
            RejectionPolicy::DiscardOldest if !self.is_shutdown() => {
                self.discard_oldest(wrapper);
                Ok(())
            }
            _ => {
                log::debug!(target: "elastic_pool", "[Rejected] Discarded {}", task);
                drop(wrapper);
                Ok(())
            }
        }
    }

    fn run_in_caller(&self, wrapper: TaskWrapper) {
        let current = thread::current();
        let executor = current.name().unwrap_or("caller");
        let task = wrapper.to_string();
        log::info!(
            target: "elastic_pool",
            "[Rejected] Executing {} in caller thread {}",
            task,
            executor
        );

        self.counters.record_caller_run();
        let start = Instant::now();
        let outcome = wrapper.run();
        let elapsed = start.elapsed();

        log_outcome(executor, &task, &outcome, elapsed);
        self.counters.record_outcome(&outcome, elapsed);
    }

    /// Evict the oldest queued task and queue `wrapper` in its shard.
    ///
    /// Under contention the eviction or the re-offer can lose the race, in
    /// which case `wrapper` is dropped.
    fn discard_oldest(&self, wrapper: TaskWrapper) {
        let oldest = self
            .shards
            .iter()
            .filter_map(|shard| shard.oldest().map(|key| (key, shard.index())))
            .min();

        let Some(((_, oldest_id), index)) = oldest else {
            log::debug!(target: "elastic_pool", "[Rejected] Nothing queued to evict, dropping {}", wrapper);
            return;
        };
        let Some(evicted) = self.shards[index].remove(oldest_id) else {
            log::debug!(target: "elastic_pool", "[Rejected] Task-{} already taken, dropping {}", oldest_id, wrapper);
            return;
        };

        self.counters.record_eviction();
        log::info!(
            target: "elastic_pool",
            "[Rejected] Discarded oldest task {} to make room for {}",
            evicted,
            wrapper
        );
        drop(evicted);

        match self.shards[index].offer(wrapper) {
            Ok(()) => self.accepted(),
            Err(back) => {
                log::debug!(target: "elastic_pool", "[Rejected] Shard #{} refilled, dropping {}", index, back);
            }
        }
    }

    fn shutdown(&self) {
        let state = self.state.lock();
        if self.shutdown.swap(true, Ordering::AcqRel) {
            return;
        }
        log::info!(
            target: "elastic_pool",
            "[ElasticPool] '{}' shutdown initiated with {} workers",
            self.config.pool_name,
            state.workers.len()
        );

        for slot in state.workers.values() {
            slot.worker.shutdown(&self.shards[slot.worker.shard_index()]);
        }
        if state.workers.is_empty() {
            self.mark_terminated();
        }
    }

    fn shutdown_now(&self) -> usize {
        self.shutdown();
        let drained: Vec<TaskWrapper> = self.shards.iter().flat_map(Shard::drain).collect();
        log::info!(
            target: "elastic_pool",
            "[ElasticPool] '{}' shutdown now, {} queued tasks dropped",
            self.config.pool_name,
            drained.len()
        );
        drained.len()
    }

    fn await_termination(&self, timeout: Duration) -> bool {
        let deadline = Instant::now().checked_add(timeout);
        let mut state = self.state.lock();
        while !self.terminated.load(Ordering::Acquire) {
            match deadline {
                Some(deadline) => {
                    if self.termination.wait_until(&mut state, deadline).timed_out() {
                        return self.terminated.load(Ordering::Acquire);
                    }
                }
                None => self.termination.wait(&mut state),
            }
        }
        true
    }

    /// Must be called with the state lock held.
    fn mark_terminated(&self) {
        if self.terminated.swap(true, Ordering::AcqRel) {
            return;
        }
        log::info!(
            target: "elastic_pool",
            "[ElasticPool] '{}' all workers are terminated, pool is now terminated",
            self.config.pool_name
        );
        self.termination.notify_all();

        #[cfg(feature = "tracing")]
        crate::telemetry::metrics::record_pool_shutdown(
            self.counters.completed(),
            self.counters.failed(),
        );
    }

    fn is_worker_thread(&self) -> bool {
        let current = thread::current().id();
        self.state
            .lock()
            .workers
            .values()
            .any(|slot| slot.handle.thread().id() == current)
    }

    /// Shards with queued work. Used as a stand-in for busy workers.
    fn busy_shard_count(&self) -> usize {
        self.shards.iter().filter(|shard| !shard.is_empty()).count()
    }

    /// First shard without a worker, preferring ones with queued work
    fn unbound_shard(&self, state: &PoolState) -> Option<usize> {
        let unbound: Vec<usize> = (0..self.shards.len())
            .filter(|&i| state.bound_count(i) == 0)
            .collect();
        unbound
            .iter()
            .copied()
            .find(|&i| !self.shards[i].is_empty())
            .or_else(|| unbound.first().copied())
    }

    /// Shortest shard; ties go to the lowest index
    fn least_loaded_shard(&self) -> usize {
        self.shards
            .iter()
            .enumerate()
            .min_by_key(|(_, shard)| shard.len())
            .map(|(index, _)| index)
            .unwrap_or(0)
    }

    fn surplus(&self, state: &PoolState) -> bool {
        !self.is_shutdown() && state.workers.len() > self.config.core_pool_size
    }

    /// Start a worker bound to `shard_index`. Caller holds the state lock.
    fn add_worker(&self, state: &mut PoolState, shard_index: usize) -> Result<usize> {
        let pool = self
            .me
            .upgrade()
            .ok_or_else(|| PoolError::other("pool is being dropped"))?;

        state.next_worker_id += 1;
        let id = state.next_worker_id;
        let name = format!("{}-worker-{}", self.config.pool_name, id);
        let worker = Arc::new(Worker::new(
            id,
            name.clone(),
            shard_index,
            self.config.keep_alive,
        ));

        let runner = Arc::clone(&worker);
        let handle = self.factory.spawn(
            id,
            name.clone(),
            Box::new(move || {
                let shard = &pool.shards[runner.shard_index()];
                run_bound(&runner, shard, pool.as_ref());
            }),
        )?;

        state.workers.insert(
            id,
            WorkerSlot {
                worker,
                handle,
            },
        );
        state.largest_pool_size = state.largest_pool_size.max(state.workers.len());

        log::info!(
            target: "elastic_pool",
            "[Pool] Created worker {} on shard #{} ({} workers)",
            name,
            shard_index,
            state.workers.len()
        );

        #[cfg(feature = "tracing")]
        crate::telemetry::metrics::record_worker_spawned(id, shard_index, state.workers.len());

        Ok(id)
    }

    /// Start workers for shards that hold tasks but have nobody draining them.
    fn rescue_orphans(&self, state: &mut PoolState) {
        for index in 0..self.shards.len() {
            if state.workers.len() >= self.config.max_pool_size {
                break;
            }
            if state.bound_count(index) > 0 || self.shards[index].is_empty() {
                continue;
            }
            if let Err(e) = self.add_worker(state, index) {
                log::error!(target: "elastic_pool", "[Pool] could not rebind shard #{}: {}", index, e);
                break;
            }
        }
    }
}

impl WorkerControl for PoolInner {
    fn is_shutdown(&self) -> bool {
        PoolInner::is_shutdown(self)
    }

    fn retire_if_surplus(&self, worker_id: usize) -> bool {
        let mut state = self.state.lock();
        if !self.surplus(&state) {
            return false;
        }
        let slot = state.workers.remove(&worker_id);
        let remaining = state.workers.len();
        drop(state);

        if slot.is_some() {
            log::debug!(
                target: "elastic_pool",
                "[Pool] worker #{} retired, {} remaining",
                worker_id,
                remaining
            );

            #[cfg(feature = "tracing")]
            crate::telemetry::metrics::record_worker_retired(worker_id);
        }
        true
    }

    fn task_finished(&self, _worker_id: usize, outcome: &TaskOutcome, elapsed: Duration) {
        self.counters.record_outcome(outcome, elapsed);
    }

    fn worker_terminated(&self, worker_id: usize) {
        let mut state = self.state.lock();
        let slot = state.workers.remove(&worker_id);

        if self.is_shutdown() {
            if state.workers.is_empty() {
                self.mark_terminated();
            }
        } else {
            self.rescue_orphans(&mut state);
        }
        let remaining = state.workers.len();
        drop(state);

        if slot.is_some() {
            log::debug!(
                target: "elastic_pool",
                "[Pool] worker #{} terminated, {} remaining",
                worker_id,
                remaining
            );
        }
    }
}
