//! Queue abstractions consumed by workers.
//!
//! The pool owns a fixed array of [`Shard`]s, one per potential worker.
//! Workers never see the array; they poll a single [`TaskSource`], which lets
//! the worker loop be driven by a scripted source in tests.

mod shard;

pub use shard::Shard;

use crate::core::TaskWrapper;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

/// Result of a bounded wait for work.
#[derive(Debug)]
pub enum ShardPoll {
    /// A task was dequeued.
    Task(TaskWrapper),
    /// Nothing arrived within the timeout.
    TimedOut,
    /// The caller's stop flag was raised while waiting.
    Stopped,
}

impl ShardPoll {
    /// Returns true if the poll produced a task.
    pub fn is_task(&self) -> bool {
        matches!(self, ShardPoll::Task(_))
    }
}

/// Something a worker can block on for its next task.
pub trait TaskSource: Send + Sync {
    /// Wait up to `timeout` for a task.
    ///
    /// Implementations must return [`ShardPoll::Stopped`] promptly once
    /// `stop` is set and the source is woken.
    fn poll_task(&self, timeout: Duration, stop: &AtomicBool) -> ShardPoll;
}
