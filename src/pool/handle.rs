//! Completion handles for result-bearing submissions

use crate::core::task::panic_message;
use crate::core::{PoolError, Result, Task};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use parking_lot::Mutex;
use std::panic::{catch_unwind, resume_unwind, AssertUnwindSafe};
use std::time::Duration;

/// Handle to the eventual result of a task passed to
/// [`ElasticPool::submit`](crate::pool::ElasticPool::submit).
///
/// The handle resolves once a worker (or the caller, under
/// `CallerRuns`) has run the task. If the pool drops the task unrun, the
/// handle resolves to [`PoolError::Discarded`].
pub struct TaskHandle<T> {
    task_id: u64,
    description: String,
    receiver: Receiver<Result<T>>,
    ready: Mutex<Option<Result<T>>>,
}

impl<T> TaskHandle<T> {
    pub(crate) fn new(task_id: u64, description: String, receiver: Receiver<Result<T>>) -> Self {
        Self {
            task_id,
            description,
            receiver,
            ready: Mutex::new(None),
        }
    }

    /// Id assigned to the task at submission
    pub fn task_id(&self) -> u64 {
        self.task_id
    }

    /// Block until the task has run or been discarded
    pub fn wait(self) -> Result<T> {
        if let Some(result) = self.ready.lock().take() {
            return result;
        }
        self.receiver
            .recv()
            .unwrap_or_else(|_| Err(self.discarded()))
    }

    /// Block for at most `timeout`
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::WaitTimeout`] if no result arrived in time; the
    /// handle can be waited on again afterwards.
    pub fn wait_timeout(&self, timeout: Duration) -> Result<T> {
        if let Some(result) = self.ready.lock().take() {
            return result;
        }
        match self.receiver.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                Err(PoolError::wait_timeout(timeout.as_millis() as u64))
            }
            Err(RecvTimeoutError::Disconnected) => Err(self.discarded()),
        }
    }

    /// Poll for the result without blocking
    pub fn try_result(&self) -> Option<Result<T>> {
        if let Some(result) = self.ready.lock().take() {
            return Some(result);
        }
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(self.discarded())),
        }
    }

    /// Returns true once a result (or a discard) is observable
    pub fn is_finished(&self) -> bool {
        let mut ready = self.ready.lock();
        if ready.is_some() {
            return true;
        }
        match self.receiver.try_recv() {
            Ok(result) => {
                *ready = Some(result);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => true,
        }
    }

    fn discarded(&self) -> PoolError {
        PoolError::discarded(format!("Task-{}({})", self.task_id, self.description))
    }
}

impl<T> std::fmt::Debug for TaskHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskHandle")
            .field("task_id", &self.task_id)
            .field("description", &self.description)
            .finish()
    }
}

/// Task that runs a value-producing closure and reports into a handle
pub(crate) struct ResultTask<F, T> {
    closure: Option<F>,
    sender: Sender<Result<T>>,
    name: String,
    task_id: u64,
}

impl<F, T> ResultTask<F, T>
where
    F: FnOnce() -> Result<T> + Send,
    T: Send,
{
    pub(crate) fn new(task_id: u64, closure: F, name: String, sender: Sender<Result<T>>) -> Self {
        Self {
            closure: Some(closure),
            sender,
            name,
            task_id,
        }
    }
}

impl<F, T> Task for ResultTask<F, T>
where
    F: FnOnce() -> Result<T> + Send,
    T: Send,
{
    fn run(&mut self) -> Result<()> {
        let closure = self.closure.take().ok_or_else(|| {
            PoolError::other("ResultTask already executed - cannot execute twice")
        })?;

        // The submitter may have dropped its handle; that is not a failure.
        match catch_unwind(AssertUnwindSafe(closure)) {
            Ok(result) => {
                let outcome = match &result {
                    Ok(_) => Ok(()),
                    Err(e) => Err(PoolError::execution(self.task_id, e.to_string())),
                };
                let _ = self.sender.send(result);
                outcome
            }
            Err(payload) => {
                let _ = self.sender.send(Err(PoolError::execution(
                    self.task_id,
                    format!("task panicked: {}", panic_message(payload.as_ref())),
                )));
                // Re-raised so the runner records a panic, not a failure.
                resume_unwind(payload)
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
