//! Error types for the elastic pool

/// Result type for pool operations
pub type Result<T> = std::result::Result<T, PoolError>;

/// Errors that can occur in the elastic pool
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PoolError {
    /// Invalid configuration with parameter
    #[error("Invalid configuration for '{parameter}': {message}")]
    InvalidConfig {
        /// Configuration parameter name
        parameter: String,
        /// Error message
        message: String,
    },

    /// Task was rejected by the abort policy
    #[error("Task {task} rejected: {reason}")]
    Rejected {
        /// Description of the rejected task
        task: String,
        /// Why the pool could not accept it
        reason: String,
    },

    /// Task execution failed with task details
    #[error("Task execution failed (task_id: {task_id}): {message}")]
    ExecutionError {
        /// ID of the failed task
        task_id: u64,
        /// Error message
        message: String,
    },

    /// Task was dropped without running
    #[error("Task {task} was discarded before it could run")]
    Discarded {
        /// Description of the discarded task
        task: String,
    },

    /// Waiting on a task handle timed out
    #[error("Timed out after {timeout_ms}ms waiting for task result")]
    WaitTimeout {
        /// Timeout duration in milliseconds
        timeout_ms: u64,
    },

    /// Failed to spawn a worker thread with details
    #[error("Failed to spawn worker thread #{worker_id}: {message}")]
    SpawnError {
        /// ID of the worker that failed to spawn
        worker_id: usize,
        /// Error message
        message: String,
        /// Source IO error
        #[source]
        source: Option<std::io::Error>,
    },

    /// General error
    #[error("{0}")]
    Other(String),
}

impl PoolError {
    /// Create an invalid config error
    pub fn invalid_config(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        PoolError::InvalidConfig {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create a rejection error
    pub fn rejected(task: impl Into<String>, reason: impl Into<String>) -> Self {
        PoolError::Rejected {
            task: task.into(),
            reason: reason.into(),
        }
    }

    /// Create an execution error
    pub fn execution(task_id: u64, message: impl Into<String>) -> Self {
        PoolError::ExecutionError {
            task_id,
            message: message.into(),
        }
    }

    /// Create a discarded error
    pub fn discarded(task: impl Into<String>) -> Self {
        PoolError::Discarded { task: task.into() }
    }

    /// Create a wait timeout error
    pub fn wait_timeout(timeout_ms: u64) -> Self {
        PoolError::WaitTimeout { timeout_ms }
    }

    /// Create a spawn error
    pub fn spawn(worker_id: usize, message: impl Into<String>) -> Self {
        PoolError::SpawnError {
            worker_id,
            message: message.into(),
            source: None,
        }
    }

    /// Create a spawn error with source
    pub fn spawn_with_source(
        worker_id: usize,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        PoolError::SpawnError {
            worker_id,
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        PoolError::Other(msg.into())
    }

    /// Returns true if this error came from the rejection policy
    pub fn is_rejection(&self) -> bool {
        matches!(self, PoolError::Rejected { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = PoolError::rejected("Task-1(ClosureTask)", "pool is shutting down");
        assert!(matches!(err, PoolError::Rejected { .. }));
        assert!(err.is_rejection());

        let err = PoolError::invalid_config("max_pool_size", "must be greater than 0");
        assert!(matches!(err, PoolError::InvalidConfig { .. }));
        assert!(!err.is_rejection());

        let err = PoolError::execution(7, "boom");
        assert!(matches!(err, PoolError::ExecutionError { task_id: 7, .. }));
    }

    #[test]
    fn test_error_display() {
        let err = PoolError::rejected("Task-3(Sleep)", "all shards full and max size reached");
        assert_eq!(
            err.to_string(),
            "Task Task-3(Sleep) rejected: all shards full and max size reached"
        );

        let err = PoolError::wait_timeout(250);
        assert_eq!(
            err.to_string(),
            "Timed out after 250ms waiting for task result"
        );

        let err = PoolError::discarded("Task-9(ClosureTask)");
        assert_eq!(
            err.to_string(),
            "Task Task-9(ClosureTask) was discarded before it could run"
        );
    }

    #[test]
    fn test_spawn_error_with_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::WouldBlock, "no more threads");
        let err = PoolError::spawn_with_source(5, "Cannot create thread", io_err);

        assert!(matches!(err, PoolError::SpawnError { .. }));
        assert!(err.to_string().contains("worker thread #5"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
