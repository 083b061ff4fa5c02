//! Configuration for the elastic pool.

use crate::core::{PoolError, RejectionPolicy, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Sizing, idle and saturation settings for an [`ElasticPool`].
///
/// # Example
///
/// ```rust
/// use rust_elastic_pool::prelude::*;
/// use std::time::Duration;
///
/// let config = PoolConfig::new(2, 4)
///     .with_min_spare_threads(1)
///     .with_keep_alive(Duration::from_secs(5))
///     .with_shard_capacity(5)
///     .with_rejection_policy(RejectionPolicy::CallerRuns)
///     .with_pool_name("normal");
/// assert!(config.validate().is_ok());
/// ```
///
/// [`ElasticPool`]: crate::pool::ElasticPool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Name used as the worker thread name prefix
    pub pool_name: String,
    /// Workers kept alive while the pool runs
    pub core_pool_size: usize,
    /// Hard ceiling on workers; also the number of shards
    pub max_pool_size: usize,
    /// Spare workers the pool tries to keep; clamped to `core_pool_size`
    pub min_spare_threads: usize,
    /// Idle wait before a surplus worker retires
    pub keep_alive: Duration,
    /// Capacity of every shard
    pub shard_capacity: usize,
    /// What to do with tasks the pool cannot accept
    pub rejection_policy: RejectionPolicy,
}

impl Default for PoolConfig {
    fn default() -> Self {
        let core = num_cpus::get();
        Self {
            pool_name: "pool".to_string(),
            core_pool_size: core,
            max_pool_size: core * 2,
            min_spare_threads: 1,
            keep_alive: Duration::from_secs(60),
            shard_capacity: 64,
            rejection_policy: RejectionPolicy::default(),
        }
    }
}

impl PoolConfig {
    /// Create a configuration with explicit core and max sizes
    #[must_use]
    pub fn new(core_pool_size: usize, max_pool_size: usize) -> Self {
        Self {
            core_pool_size,
            max_pool_size,
            ..Default::default()
        }
    }

    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| PoolError::invalid_config("json", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Set the pool name
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_pool_name<S: Into<String>>(mut self, name: S) -> Self {
        self.pool_name = name.into();
        self
    }

    /// Set the minimum number of spare workers
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_min_spare_threads(mut self, spare: usize) -> Self {
        self.min_spare_threads = spare;
        self
    }

    /// Set the idle keep-alive for surplus workers
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_keep_alive(mut self, keep_alive: Duration) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    /// Set the per-shard capacity
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_shard_capacity(mut self, capacity: usize) -> Self {
        self.shard_capacity = capacity;
        self
    }

    /// Set the rejection policy
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_rejection_policy(mut self, policy: RejectionPolicy) -> Self {
        self.rejection_policy = policy;
        self
    }

    /// Spare-thread target actually used by the pool
    pub fn effective_min_spare(&self) -> usize {
        self.min_spare_threads.min(self.core_pool_size)
    }

    /// Total number of tasks the shards can hold
    pub fn total_capacity(&self) -> usize {
        self.max_pool_size.saturating_mul(self.shard_capacity)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.pool_name.is_empty() {
            return Err(PoolError::invalid_config(
                "pool_name",
                "Pool name must not be empty",
            ));
        }
        if self.max_pool_size == 0 {
            return Err(PoolError::invalid_config(
                "max_pool_size",
                "Maximum pool size must be greater than 0",
            ));
        }
        if self.max_pool_size < self.core_pool_size {
            return Err(PoolError::invalid_config(
                "max_pool_size",
                format!(
                    "Maximum pool size {} is smaller than core pool size {}",
                    self.max_pool_size, self.core_pool_size
                ),
            ));
        }
        if self.shard_capacity == 0 {
            return Err(PoolError::invalid_config(
                "shard_capacity",
                "Shard capacity must be greater than 0",
            ));
        }
        if self.keep_alive.is_zero() {
            return Err(PoolError::invalid_config(
                "keep_alive",
                "Keep-alive must be non-zero",
            ));
        }
        Ok(())
    }
}
