//! Thread creation for pool workers

use crate::core::{PoolError, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

/// Loop body handed to a factory; runs one worker to completion.
pub type WorkerBody = Box<dyn FnOnce() + Send + 'static>;

/// Produces and starts the thread that runs a worker loop.
///
/// The pool names every worker and calls the factory while holding its
/// internal lock, so implementations must not call back into the pool.
pub trait ThreadFactory: Send + Sync {
    /// Start `body` on a new thread called `name`
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::SpawnError`] if the thread could not be created
    fn spawn(&self, worker_id: usize, name: String, body: WorkerBody)
        -> Result<thread::JoinHandle<()>>;
}

/// Default factory backed by [`std::thread::Builder`].
#[derive(Debug, Default)]
pub struct NamedThreadFactory {
    stack_size: Option<usize>,
    created: AtomicU64,
}

impl NamedThreadFactory {
    /// Create a factory using the platform default stack size
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a factory whose threads get `stack_size` bytes of stack
    pub fn with_stack_size(stack_size: usize) -> Self {
        Self {
            stack_size: Some(stack_size),
            created: AtomicU64::new(0),
        }
    }

    /// Number of threads this factory has started
    pub fn threads_created(&self) -> u64 {
        self.created.load(Ordering::Relaxed)
    }
}

impl ThreadFactory for NamedThreadFactory {
    fn spawn(
        &self,
        worker_id: usize,
        name: String,
        body: WorkerBody,
    ) -> Result<thread::JoinHandle<()>> {
        log::debug!(target: "elastic_pool", "creating a new thread '{}'", name);

        let mut builder = thread::Builder::new().name(name);
        if let Some(size) = self.stack_size {
            builder = builder.stack_size(size);
        }

        let handle = builder
            .spawn(body)
            .map_err(|e| PoolError::spawn_with_source(worker_id, "thread spawn failed", e))?;
        self.created.fetch_add(1, Ordering::Relaxed);
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawned_thread_is_named() {
        let factory = NamedThreadFactory::new();
        let (tx, rx) = crossbeam_channel::bounded(1);

        let handle = factory
            .spawn(
                1,
                "demo-worker-1".to_string(),
                Box::new(move || {
                    let name = thread::current().name().map(str::to_string);
                    tx.send(name).unwrap();
                }),
            )
            .expect("Failed to spawn thread");

        handle.join().expect("Thread panicked");
        assert_eq!(rx.recv().unwrap().as_deref(), Some("demo-worker-1"));
        assert_eq!(factory.threads_created(), 1);
    }

    #[test]
    fn test_stack_size_factory_runs_body() {
        let factory = NamedThreadFactory::with_stack_size(256 * 1024);
        let handle = factory
            .spawn(2, "small-stack".to_string(), Box::new(|| {}))
            .expect("Failed to spawn thread");
        handle.join().expect("Thread panicked");
        assert_eq!(factory.threads_created(), 1);
    }
}
