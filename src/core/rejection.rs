//! Rejection policies applied when the pool is saturated.
//!
//! A policy is chosen once, at construction, and never changes. The pool
//! dispatches on it in exactly one place when a task can be neither queued
//! nor given a freshly grown worker.
//!
//! - [`RejectionPolicy::Abort`]: return [`PoolError::Rejected`] to the caller (default)
//! - [`RejectionPolicy::CallerRuns`]: run the task inline on the submitting thread
//! - [`RejectionPolicy::Discard`]: drop the new task silently
//! - [`RejectionPolicy::DiscardOldest`]: evict the oldest queued task and queue the new one
//!
//! [`PoolError::Rejected`]: crate::core::PoolError::Rejected

use crate::core::error::PoolError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Strategy for tasks the pool cannot accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionPolicy {
    /// Surface a rejection error to the submitter.
    #[default]
    Abort,

    /// Run the task on the submitting thread, throttling the caller.
    ///
    /// Once the pool is shut down this behaves like `Discard`.
    CallerRuns,

    /// Drop the task without telling the submitter.
    Discard,

    /// Drop the oldest queued task and queue the new one in its shard.
    ///
    /// Once the pool is shut down this behaves like `Discard`.
    DiscardOldest,
}

impl RejectionPolicy {
    /// All policies, in declaration order.
    pub const ALL: [RejectionPolicy; 4] = [
        RejectionPolicy::Abort,
        RejectionPolicy::CallerRuns,
        RejectionPolicy::Discard,
        RejectionPolicy::DiscardOldest,
    ];

    /// Returns true if the submitter is told about rejections.
    pub fn surfaces_errors(&self) -> bool {
        matches!(self, RejectionPolicy::Abort)
    }

    /// Stable snake_case name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionPolicy::Abort => "abort",
            RejectionPolicy::CallerRuns => "caller_runs",
            RejectionPolicy::Discard => "discard",
            RejectionPolicy::DiscardOldest => "discard_oldest",
        }
    }
}

impl fmt::Display for RejectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RejectionPolicy {
    type Err = PoolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "abort" => Ok(RejectionPolicy::Abort),
            "caller_runs" => Ok(RejectionPolicy::CallerRuns),
            "discard" => Ok(RejectionPolicy::Discard),
            "discard_oldest" => Ok(RejectionPolicy::DiscardOldest),
            other => Err(PoolError::invalid_config(
                "rejection_policy",
                format!("unknown policy '{}'", other),
            )),
        }
    }
}
