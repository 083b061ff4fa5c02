//! Worker state machine

use crate::core::{TaskOutcome, TaskWrapper};
use crate::queue::{Shard, ShardPoll, TaskSource};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[cfg(feature = "tracing")]
use tracing::{span, Level};

/// Lifecycle of a worker.
///
/// `Running -> (IdleWait <-> Executing) -> Stopping -> Terminated`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WorkerState {
    /// Created, or between two polls
    Running = 0,
    /// Blocked on its shard waiting for a task
    IdleWait = 1,
    /// Running a task
    Executing = 2,
    /// Leaving the loop
    Stopping = 3,
    /// Exit has been reported to the pool
    Terminated = 4,
}

impl WorkerState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => WorkerState::Running,
            1 => WorkerState::IdleWait,
            2 => WorkerState::Executing,
            3 => WorkerState::Stopping,
            _ => WorkerState::Terminated,
        }
    }
}

/// What a worker needs from the pool that owns it.
pub trait WorkerControl: Send + Sync {
    /// Pool-wide shutdown flag
    fn is_shutdown(&self) -> bool;

    /// Called after an idle timeout. Returns true if this worker is surplus
    /// above the core size and has been deregistered, in which case it must
    /// exit.
    fn retire_if_surplus(&self, worker_id: usize) -> bool;

    /// Called after every task this worker ran
    fn task_finished(&self, worker_id: usize, outcome: &TaskOutcome, elapsed: Duration);

    /// Called exactly once as the worker exits, on every exit path
    fn worker_terminated(&self, worker_id: usize);
}

/// A long-lived execution loop bound to one shard.
///
/// A `Worker` owns no thread. [`Worker::run`] executes the loop on whichever
/// thread calls it; the pool pairs each worker with a thread from its
/// [`ThreadFactory`](crate::pool::ThreadFactory).
#[derive(Debug)]
pub struct Worker {
    id: usize,
    name: String,
    shard_index: usize,
    keep_alive: Duration,
    stop: AtomicBool,
    state: AtomicU8,
}

impl Worker {
    /// Create a worker bound to `shard_index`
    pub fn new(id: usize, name: impl Into<String>, shard_index: usize, keep_alive: Duration) -> Self {
        Self {
            id,
            name: name.into(),
            shard_index,
            keep_alive,
            stop: AtomicBool::new(false),
            state: AtomicU8::new(WorkerState::Running as u8),
        }
    }

    /// Get worker ID
    pub fn id(&self) -> usize {
        self.id
    }

    /// Thread name given to this worker
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index of the shard this worker drains
    pub fn shard_index(&self) -> usize {
        self.shard_index
    }

    /// Current lifecycle state
    pub fn state(&self) -> WorkerState {
        WorkerState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Returns true once a stop has been requested
    pub fn is_stop_requested(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    /// Ask the worker to stop and wake it if it is idling on `shard`.
    ///
    /// A task already executing is never interrupted.
    pub fn shutdown(&self, shard: &Shard) {
        self.stop.store(true, Ordering::Release);
        shard.wake_all();
    }

    fn set_state(&self, state: WorkerState) {
        self.state.store(state as u8, Ordering::Release);
    }

    /// Main worker loop
    ///
    /// Polls `source` for up to the keep-alive each cycle. Core workers idle
    /// forever; a surplus worker exits on its first idle timeout if `control`
    /// agrees. Termination is reported to `control` on every exit path.
    pub fn run<S, C>(&self, source: &S, control: &C)
    where
        S: TaskSource + ?Sized,
        C: WorkerControl + ?Sized,
    {
        let _guard = TerminationGuard {
            worker: self,
            control,
        };

        #[cfg(feature = "tracing")]
        let _span = span!(Level::DEBUG, "worker", id = self.id, shard = self.shard_index).entered();

        log::debug!(target: "elastic_pool", "[Worker] {} started on shard #{}", self.name, self.shard_index);
        self.set_state(WorkerState::Running);

        loop {
            if control.is_shutdown() || self.is_stop_requested() {
                break;
            }

            self.set_state(WorkerState::IdleWait);
            match source.poll_task(self.keep_alive, &self.stop) {
                ShardPoll::Task(wrapper) => {
                    self.set_state(WorkerState::Executing);
                    self.execute_task(wrapper, control);
                    self.set_state(WorkerState::Running);
                }
                ShardPoll::TimedOut => {
                    if control.retire_if_surplus(self.id) {
                        log::info!(target: "elastic_pool", "[Worker] {} idle timeout, stopping", self.name);
                        break;
                    }
                    self.set_state(WorkerState::Running);
                }
                ShardPoll::Stopped => break,
            }
        }
    }

    /// Execute a single task with panic protection
    fn execute_task<C: WorkerControl + ?Sized>(&self, wrapper: TaskWrapper, control: &C) {
        let task = wrapper.to_string();
        log::debug!(target: "elastic_pool", "[Worker] {} executes {}", self.name, task);

        #[cfg(feature = "tracing")]
        crate::telemetry::metrics::record_worker_busy(self.id);

        let start = Instant::now();
        let outcome = wrapper.run();
        let elapsed = start.elapsed();

        log_outcome(&self.name, &task, &outcome, elapsed);
        control.task_finished(self.id, &outcome, elapsed);

        #[cfg(feature = "tracing")]
        crate::telemetry::metrics::record_worker_idle(self.id);
    }
}

/// Shared logging for task results, used by workers and by `CallerRuns`.
pub(crate) fn log_outcome(executor: &str, task: &str, outcome: &TaskOutcome, elapsed: Duration) {
    match outcome {
        TaskOutcome::Completed => {
            log::debug!(
                target: "elastic_pool",
                "[Worker] {} finished {} in {}ms",
                executor,
                task,
                elapsed.as_millis()
            );
        }
        TaskOutcome::Failed(e) => {
            log::warn!(
                target: "elastic_pool",
                "[Worker] {} error executing task {}: {}",
                executor,
                task,
                e
            );
        }
        TaskOutcome::Panicked(message) => {
            log::error!(
                target: "elastic_pool",
                "[Worker] {} task {} panicked: {}",
                executor,
                task,
                message
            );
        }
    }

    #[cfg(feature = "tracing")]
    {
        match outcome {
            TaskOutcome::Panicked(_) => crate::telemetry::metrics::record_panic(elapsed),
            other => crate::telemetry::metrics::record_completion(elapsed, other.is_success()),
        }
    }
}

/// Reports termination when the loop is left, including by unwinding.
struct TerminationGuard<'a, C: WorkerControl + ?Sized> {
    worker: &'a Worker,
    control: &'a C,
}

impl<C: WorkerControl + ?Sized> Drop for TerminationGuard<'_, C> {
    fn drop(&mut self) {
        self.worker.set_state(WorkerState::Stopping);
        self.control.worker_terminated(self.worker.id);
        self.worker.set_state(WorkerState::Terminated);
        log::debug!(target: "elastic_pool", "[Worker] {} terminated", self.worker.name);
    }
}

/// Convenience for spawning: run `worker` against `shard` on this thread.
pub(crate) fn run_bound<C: WorkerControl + ?Sized>(worker: &Arc<Worker>, shard: &Shard, control: &C) {
    worker.run(shard, control);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ClosureTask, PoolError};
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::sync::atomic::AtomicUsize;
    use std::thread;

    /// Hands out a fixed script of poll results, then reports `Stopped`.
    struct ScriptedSource {
        script: Mutex<VecDeque<ShardPoll>>,
        polls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(script: Vec<ShardPoll>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                polls: AtomicUsize::new(0),
            }
        }

        fn polls(&self) -> usize {
            self.polls.load(Ordering::SeqCst)
        }

        fn remaining(&self) -> usize {
            self.script.lock().len()
        }
    }

    impl TaskSource for ScriptedSource {
        fn poll_task(&self, _timeout: Duration, _stop: &AtomicBool) -> ShardPoll {
            self.polls.fetch_add(1, Ordering::SeqCst);
            self.script.lock().pop_front().unwrap_or(ShardPoll::Stopped)
        }
    }

    #[derive(Default)]
    struct RecordingControl {
        shutdown: AtomicBool,
        surplus: AtomicBool,
        retire_checks: AtomicUsize,
        outcomes: Mutex<Vec<bool>>,
        terminated: Mutex<Vec<usize>>,
        panic_on_finish: AtomicBool,
    }

    impl WorkerControl for RecordingControl {
        fn is_shutdown(&self) -> bool {
            self.shutdown.load(Ordering::SeqCst)
        }

        fn retire_if_surplus(&self, _worker_id: usize) -> bool {
            self.retire_checks.fetch_add(1, Ordering::SeqCst);
            self.surplus.load(Ordering::SeqCst)
        }

        fn task_finished(&self, _worker_id: usize, outcome: &TaskOutcome, _elapsed: Duration) {
            if self.panic_on_finish.load(Ordering::SeqCst) {
                panic!("control failure");
            }
            self.outcomes.lock().push(outcome.is_success());
        }

        fn worker_terminated(&self, worker_id: usize) {
            self.terminated.lock().push(worker_id);
        }
    }

    fn task(counter: &Arc<AtomicUsize>) -> ShardPoll {
        let counter = Arc::clone(counter);
        ShardPoll::Task(TaskWrapper::new(Box::new(ClosureTask::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }))))
    }

    fn worker() -> Worker {
        Worker::new(7, "test-worker-7", 0, Duration::from_millis(50))
    }

    #[test]
    fn test_worker_runs_tasks_then_stops() {
        let counter = Arc::new(AtomicUsize::new(0));
        let source = ScriptedSource::new(vec![task(&counter), task(&counter)]);
        let control = RecordingControl::default();
        let worker = worker();

        worker.run(&source, &control);

        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(*control.outcomes.lock(), vec![true, true]);
        assert_eq!(*control.terminated.lock(), vec![7]);
        assert_eq!(worker.state(), WorkerState::Terminated);
    }

    #[test]
    fn test_core_worker_survives_idle_timeouts() {
        let counter = Arc::new(AtomicUsize::new(0));
        let source = ScriptedSource::new(vec![
            ShardPoll::TimedOut,
            ShardPoll::TimedOut,
            task(&counter),
        ]);
        let control = RecordingControl::default();

        worker().run(&source, &control);

        assert_eq!(control.retire_checks.load(Ordering::SeqCst), 2);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(source.polls(), 4);
    }

    #[test]
    fn test_surplus_worker_retires_on_idle_timeout() {
        let counter = Arc::new(AtomicUsize::new(0));
        let source = ScriptedSource::new(vec![ShardPoll::TimedOut, task(&counter)]);
        let control = RecordingControl::default();
        control.surplus.store(true, Ordering::SeqCst);

        worker().run(&source, &control);

        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(source.remaining(), 1);
        assert_eq!(*control.terminated.lock(), vec![7]);
    }

    #[test]
    fn test_task_failures_do_not_kill_worker() {
        let counter = Arc::new(AtomicUsize::new(0));
        let source = ScriptedSource::new(vec![
            ShardPoll::Task(TaskWrapper::new(Box::new(ClosureTask::new(|| {
                panic!("Intentional panic for testing");
            })))),
            ShardPoll::Task(TaskWrapper::new(Box::new(ClosureTask::new(|| {
                Err(PoolError::other("bad input"))
            })))),
            task(&counter),
        ]);
        let control = RecordingControl::default();

        worker().run(&source, &control);

        assert_eq!(*control.outcomes.lock(), vec![false, false, true]);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_shutdown_pool_is_checked_before_polling() {
        let counter = Arc::new(AtomicUsize::new(0));
        let source = ScriptedSource::new(vec![task(&counter)]);
        let control = RecordingControl::default();
        control.shutdown.store(true, Ordering::SeqCst);

        worker().run(&source, &control);

        assert_eq!(source.polls(), 0);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(*control.terminated.lock(), vec![7]);
    }

    #[test]
    fn test_termination_reported_when_loop_unwinds() {
        let counter = Arc::new(AtomicUsize::new(0));
        let source = ScriptedSource::new(vec![task(&counter)]);
        let control = RecordingControl::default();
        control.panic_on_finish.store(true, Ordering::SeqCst);
        let worker = worker();

        let result = catch_unwind(AssertUnwindSafe(|| worker.run(&source, &control)));

        assert!(result.is_err());
        assert_eq!(*control.terminated.lock(), vec![7]);
        assert_eq!(worker.state(), WorkerState::Terminated);
    }

    #[test]
    fn test_shutdown_wakes_idle_worker_on_real_shard() {
        let shard = Arc::new(Shard::new(0, 4));
        let control = Arc::new(RecordingControl::default());
        let worker = Arc::new(Worker::new(1, "idle-worker", 0, Duration::from_secs(30)));

        let handle = {
            let shard = Arc::clone(&shard);
            let control = Arc::clone(&control);
            let worker = Arc::clone(&worker);
            thread::spawn(move || run_bound(&worker, &shard, control.as_ref()))
        };

        thread::sleep(Duration::from_millis(50));
        assert_eq!(worker.state(), WorkerState::IdleWait);

        let start = Instant::now();
        worker.shutdown(&shard);
        handle.join().expect("Worker thread panicked");

        assert!(start.elapsed() < Duration::from_secs(5));
        assert_eq!(*control.terminated.lock(), vec![1]);
    }
}
