//! # Rust Elastic Pool
//!
//! An elastic, sharded thread pool with bounded per-worker queues and
//! pluggable saturation policies.
//!
//! ## Features
//!
//! - **Sharded Queues**: One bounded queue per potential worker, filled round-robin
//! - **Elastic Sizing**: Grows from `core` towards `max` under load, shrinks back on idle
//! - **Rejection Policies**: `Abort`, `CallerRuns`, `Discard` and `DiscardOldest`
//! - **Result Handles**: `submit` returns a [`TaskHandle`] for the task's value
//! - **Graceful Shutdown**: `shutdown`, `shutdown_now` and `await_termination`
//! - **Panic Safety**: A panicking task never takes its worker down
//!
//! ## Quick Start
//!
//! ```rust
//! use rust_elastic_pool::prelude::*;
//! use std::time::Duration;
//!
//! # fn main() -> Result<()> {
//! let pool = ElasticPool::new(2, 4, 1, Duration::from_secs(5), 16, RejectionPolicy::CallerRuns)?;
//!
//! for i in 0..10 {
//!     pool.execute(move || {
//!         println!("Task {} executing", i);
//!         Ok(())
//!     })?;
//! }
//!
//! pool.shutdown();
//! pool.await_termination(Duration::from_secs(5));
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use rust_elastic_pool::prelude::*;
//! use std::time::Duration;
//!
//! # fn main() -> Result<()> {
//! let config = PoolConfig::new(2, 8)
//!     .with_min_spare_threads(1)
//!     .with_keep_alive(Duration::from_secs(30))
//!     .with_shard_capacity(128)
//!     .with_rejection_policy(RejectionPolicy::Abort)
//!     .with_pool_name("ingest");
//!
//! let pool = ElasticPool::with_config(config)?;
//! assert_eq!(pool.pool_name(), "ingest");
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom Tasks
//!
//! ```rust
//! use rust_elastic_pool::prelude::*;
//!
//! struct Resize {
//!     path: String,
//! }
//!
//! impl Task for Resize {
//!     fn run(&mut self) -> Result<()> {
//!         println!("Resizing: {}", self.path);
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &str {
//!         "Resize"
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! # let pool = ElasticPool::with_config(PoolConfig::new(1, 2))?;
//! pool.execute_task(Resize {
//!     path: "cover.png".to_string(),
//! })?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Statistics
//!
//! ```rust
//! use rust_elastic_pool::prelude::*;
//!
//! # fn main() -> Result<()> {
//! # let pool = ElasticPool::with_config(PoolConfig::new(1, 2))?;
//! # pool.submit(|| Ok(()))?.wait()?;
//! let stats = pool.stats();
//! println!("{}", stats);
//! println!("{}", stats.to_json());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod pool;
pub mod prelude;
pub mod queue;
pub mod telemetry;

pub use core::{BoxedTask, ClosureTask, PoolError, RejectionPolicy, Result, Task, TaskOutcome};
pub use pool::{ElasticPool, PoolConfig, PoolStats, TaskHandle, ThreadFactory};
