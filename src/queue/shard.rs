//! Bounded blocking deque of wrapped tasks.

use super::{ShardPoll, TaskSource};
use crate::core::TaskWrapper;
use chrono::{DateTime, Utc};
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// A bounded FIFO shard with a fixed capacity.
///
/// Any thread may offer into a shard; the bound worker(s) take from the
/// front. The rejection path may also pull an arbitrary task out by id.
/// Every operation holds the shard lock only for its own duration.
///
/// # Example
///
/// ```rust
/// use rust_elastic_pool::queue::Shard;
/// use rust_elastic_pool::core::{ClosureTask, TaskWrapper};
///
/// let shard = Shard::new(0, 1);
/// assert!(shard.offer(TaskWrapper::new(Box::new(ClosureTask::new(|| Ok(()))))).is_ok());
///
/// // Shard is now full - the wrapper is handed back
/// let rejected = shard.offer(TaskWrapper::new(Box::new(ClosureTask::new(|| Ok(())))));
/// assert!(rejected.is_err());
/// ```
pub struct Shard {
    index: usize,
    capacity: usize,
    items: Mutex<VecDeque<TaskWrapper>>,
    available: Condvar,
}

impl Shard {
    /// Creates a new shard with the specified capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn new(index: usize, capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be greater than 0");
        Self {
            index,
            capacity,
            items: Mutex::new(VecDeque::with_capacity(capacity)),
            available: Condvar::new(),
        }
    }

    /// Position of this shard in the pool's shard array.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of queued tasks.
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    /// Returns true if no task is queued.
    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// Non-blocking enqueue at the back; hands the wrapper back when full.
    pub fn offer(&self, wrapper: TaskWrapper) -> Result<(), TaskWrapper> {
        let mut items = self.items.lock();
        if items.len() >= self.capacity {
            return Err(wrapper);
        }
        items.push_back(wrapper);
        drop(items);
        self.available.notify_one();
        Ok(())
    }

    /// Blocking dequeue bounded by `timeout`.
    ///
    /// `stop` is checked under the shard lock, so a [`wake_all`](Self::wake_all)
    /// issued after raising the flag cannot be missed.
    pub fn poll_timeout(&self, timeout: Duration, stop: &AtomicBool) -> ShardPoll {
        let deadline = Instant::now().checked_add(timeout);
        let mut items = self.items.lock();
        let mut timed_out = false;
        loop {
            if stop.load(Ordering::Acquire) {
                return ShardPoll::Stopped;
            }
            if let Some(wrapper) = items.pop_front() {
                return ShardPoll::Task(wrapper);
            }
            if timed_out {
                return ShardPoll::TimedOut;
            }
            match deadline {
                Some(deadline) => {
                    timed_out = self.available.wait_until(&mut items, deadline).timed_out();
                }
                None => self.available.wait(&mut items),
            }
        }
    }

    /// Wake every thread blocked in [`poll_timeout`](Self::poll_timeout).
    pub fn wake_all(&self) {
        let _items = self.items.lock();
        self.available.notify_all();
    }

    /// Age key of the task at the front, which is the oldest in this shard.
    pub fn oldest(&self) -> Option<(DateTime<Utc>, u64)> {
        self.items.lock().front().map(TaskWrapper::age_key)
    }

    /// Remove the task with the given id, wherever it sits.
    ///
    /// Returns `None` if a worker already took it.
    pub fn remove(&self, id: u64) -> Option<TaskWrapper> {
        let mut items = self.items.lock();
        let position = items.iter().position(|w| w.id() == id)?;
        items.remove(position)
    }

    /// Remove and return every queued task.
    pub fn drain(&self) -> Vec<TaskWrapper> {
        self.items.lock().drain(..).collect()
    }
}

impl TaskSource for Shard {
    fn poll_task(&self, timeout: Duration, stop: &AtomicBool) -> ShardPoll {
        self.poll_timeout(timeout, stop)
    }
}

impl std::fmt::Debug for Shard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shard")
            .field("index", &self.index)
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .finish()
    }
}
