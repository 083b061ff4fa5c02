//! Task trait and related types

use crate::core::error::{PoolError, Result};
use std::fmt;

/// A trait representing a unit of work to be executed by the pool
pub trait Task: Send {
    /// Run the task
    ///
    /// # Errors
    ///
    /// Returns an error if the task body fails. The error is logged by
    /// whoever executed the task and never reaches the submitter.
    fn run(&mut self) -> Result<()>;

    /// Name used in task descriptions and log lines
    fn name(&self) -> &str {
        "Task"
    }
}

impl fmt::Debug for dyn Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Task({})", self.name())
    }
}

/// A boxed task that can be sent across threads
pub type BoxedTask = Box<dyn Task>;

/// Helper to create a task from a closure
pub struct ClosureTask<F>
where
    F: FnOnce() -> Result<()> + Send,
{
    closure: Option<F>,
    name: String,
}

impl<F> ClosureTask<F>
where
    F: FnOnce() -> Result<()> + Send,
{
    /// Create a new closure task
    pub fn new(closure: F) -> Self {
        Self {
            closure: Some(closure),
            name: "ClosureTask".to_string(),
        }
    }

    /// Create a new closure task with a custom name
    pub fn with_name<S: Into<String>>(closure: F, name: S) -> Self {
        Self {
            closure: Some(closure),
            name: name.into(),
        }
    }
}

impl<F> Task for ClosureTask<F>
where
    F: FnOnce() -> Result<()> + Send,
{
    fn run(&mut self) -> Result<()> {
        match self.closure.take() {
            Some(closure) => closure(),
            None => Err(PoolError::other(
                "ClosureTask already executed - cannot execute twice",
            )),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// How a single task execution ended
#[derive(Debug)]
pub enum TaskOutcome {
    /// The task returned `Ok(())`
    Completed,
    /// The task returned an error
    Failed(PoolError),
    /// The task panicked; the payload message is kept for logging
    Panicked(String),
}

impl TaskOutcome {
    /// Returns true if the task body finished without error or panic
    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Completed)
    }
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
