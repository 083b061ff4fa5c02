//! The elastic pool, its workers and supporting types

pub mod config;
pub mod elastic_pool;
pub mod factory;
pub mod handle;
pub mod stats;
pub mod worker;

pub use config::PoolConfig;
pub use elastic_pool::{ElasticPool, REASON_SATURATED, REASON_SHUTDOWN};
pub use factory::{NamedThreadFactory, ThreadFactory, WorkerBody};
pub use handle::TaskHandle;
pub use stats::{PoolCounters, PoolStats};
pub use worker::{Worker, WorkerControl, WorkerState};
