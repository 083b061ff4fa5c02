//! Convenient re-exports for common types and traits

pub use crate::core::{
    BoxedTask, ClosureTask, PoolError, RejectionPolicy, Result, Task, TaskOutcome,
};
pub use crate::pool::{ElasticPool, PoolConfig, PoolStats, TaskHandle, ThreadFactory};
