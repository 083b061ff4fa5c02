//! Submission record pairing a task with its id and timestamp

use crate::core::task::{panic_message, BoxedTask, TaskOutcome};
use chrono::{DateTime, Utc};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

/// Generates a unique task ID
pub(crate) fn next_task_id() -> u64 {
    NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed)
}

/// A task as it sits in a shard.
///
/// Created once per submission and consumed exactly once, either by the
/// worker (or caller) that runs it or by the rejection policy that drops it.
/// Ids increase strictly across the whole process.
pub struct TaskWrapper {
    id: u64,
    task: BoxedTask,
    description: String,
    submit_time: DateTime<Utc>,
}

impl TaskWrapper {
    /// Wrap a task, assigning it the next id and the current wall-clock time
    pub fn new(task: BoxedTask) -> Self {
        let description = task.name().to_string();
        Self {
            id: next_task_id(),
            task,
            description,
            submit_time: Utc::now(),
        }
    }

    /// Wrap a task under an id obtained earlier from [`next_task_id`]
    pub(crate) fn with_id(id: u64, task: BoxedTask) -> Self {
        let description = task.name().to_string();
        Self {
            id,
            task,
            description,
            submit_time: Utc::now(),
        }
    }

    /// Unique, strictly increasing task id
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Human-readable description, diagnostics only
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Wall-clock time the task was wrapped
    pub fn submit_time(&self) -> DateTime<Utc> {
        self.submit_time
    }

    /// Ordering key for "oldest queued task" comparisons.
    ///
    /// Wall-clock ties fall back to the id, which follows submission order.
    pub fn age_key(&self) -> (DateTime<Utc>, u64) {
        (self.submit_time, self.id)
    }

    /// Run the task to completion, containing panics
    pub fn run(mut self) -> TaskOutcome {
        match catch_unwind(AssertUnwindSafe(|| self.task.run())) {
            Ok(Ok(())) => TaskOutcome::Completed,
            Ok(Err(e)) => TaskOutcome::Failed(e),
            Err(payload) => TaskOutcome::Panicked(panic_message(payload.as_ref())),
        }
    }
}

impl fmt::Display for TaskWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Task-{}({})", self.id, self.description)
    }
}

impl fmt::Debug for TaskWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskWrapper")
            .field("id", &self.id)
            .field("description", &self.description)
            .field("submit_time", &self.submit_time)
            .finish()
    }
}
