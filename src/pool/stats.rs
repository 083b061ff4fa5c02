//! Pool-wide counters and serializable snapshots

use crate::core::TaskOutcome;
use crossbeam_utils::CachePadded;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Monotonic counters shared by the pool, its workers and submitters.
///
/// Every counter only ever grows; reads are relaxed snapshots suitable for
/// monitoring, not for control decisions.
#[derive(Debug, Default)]
pub struct PoolCounters {
    /// Tasks accepted into a shard
    submitted: CachePadded<AtomicU64>,
    /// Tasks that ran to the end, successfully or not
    completed: CachePadded<AtomicU64>,
    /// Completed tasks that returned an error or panicked
    failed: AtomicU64,
    /// Completed tasks that panicked
    panicked: AtomicU64,
    /// Tasks handed to the rejection policy
    rejected: AtomicU64,
    /// Tasks executed inline on the submitting thread
    caller_runs: AtomicU64,
    /// Queued tasks evicted by `DiscardOldest`
    evicted: AtomicU64,
    /// Total time spent running tasks (microseconds)
    total_processing_time_us: AtomicU64,
}

impl PoolCounters {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a task accepted into a shard.
    pub fn record_submission(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a finished task and how long it ran.
    pub fn record_outcome(&self, outcome: &TaskOutcome, elapsed: Duration) {
        self.completed.fetch_add(1, Ordering::Relaxed);
        match outcome {
            TaskOutcome::Completed => {}
            TaskOutcome::Failed(_) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
            }
            TaskOutcome::Panicked(_) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                self.panicked.fetch_add(1, Ordering::Relaxed);
            }
        }
        self.total_processing_time_us
            .fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);
    }

    /// Records a rejection.
    pub fn record_rejection(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a task run by its submitter.
    pub fn record_caller_run(&self) {
        self.caller_runs.fetch_add(1, Ordering::Relaxed);
    }

    /// Records an eviction by `DiscardOldest`.
    pub fn record_eviction(&self) {
        self.evicted.fetch_add(1, Ordering::Relaxed);
    }

    /// Gets the number of tasks accepted into shards.
    pub fn submitted(&self) -> u64 {
        self.submitted.load(Ordering::Relaxed)
    }

    /// Gets the number of tasks that finished running.
    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    /// Gets the number of finished tasks that failed or panicked.
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Gets the number of finished tasks that panicked.
    pub fn panicked(&self) -> u64 {
        self.panicked.load(Ordering::Relaxed)
    }

    /// Gets the number of rejections.
    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    /// Gets the number of tasks run inline by submitters.
    pub fn caller_runs(&self) -> u64 {
        self.caller_runs.load(Ordering::Relaxed)
    }

    /// Gets the number of queued tasks evicted to make room.
    pub fn evicted(&self) -> u64 {
        self.evicted.load(Ordering::Relaxed)
    }

    /// Get average processing time per task in microseconds
    pub fn average_processing_time_us(&self) -> f64 {
        let total = self.total_processing_time_us.load(Ordering::Relaxed);
        let count = self.completed();
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    }
}

/// A point-in-time view of the pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolStats {
    /// Live workers
    pub active_workers: usize,
    /// High-water mark of live workers
    pub largest_pool_size: usize,
    /// Queued tasks per shard
    pub shard_lengths: Vec<usize>,
    /// Sum of `shard_lengths`
    pub queued: usize,
    /// Tasks accepted into shards
    pub submitted: u64,
    /// Tasks that finished running
    pub completed: u64,
    /// Finished tasks that failed or panicked
    pub failed: u64,
    /// Finished tasks that panicked
    pub panicked: u64,
    /// Tasks handed to the rejection policy
    pub rejected: u64,
    /// Tasks run inline by submitters
    pub caller_runs: u64,
    /// Queued tasks evicted by `DiscardOldest`
    pub evicted: u64,
    /// Average task run time in microseconds
    pub average_processing_time_us: f64,
    /// Shutdown has been requested
    pub shutdown: bool,
    /// Every worker has exited after shutdown
    pub terminated: bool,
}

impl PoolStats {
    /// Render as a single JSON line
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
    }
}

impl std::fmt::Display for PoolStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Active: {}, Queue: {}, Completed: {}, Rejected: {}",
            self.active_workers, self.queued, self.completed, self.rejected
        )
    }
}
