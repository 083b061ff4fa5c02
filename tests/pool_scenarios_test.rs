//! End-to-end scenarios for the elastic pool

use crossbeam_channel::{bounded, Receiver};
use rust_elastic_pool::pool::{NamedThreadFactory, ThreadFactory, WorkerBody};
use rust_elastic_pool::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const WAIT: Duration = Duration::from_secs(10);

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn wait_for(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + WAIT;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    condition()
}

/// Submit `count` tasks that block on `latch` until its sender is dropped.
fn submit_blocking(pool: &ElasticPool, latch: &Receiver<()>, count: usize) -> Vec<Result<()>> {
    (0..count)
        .map(|_| {
            let latch = latch.clone();
            pool.execute(move || {
                let _ = latch.recv_timeout(WAIT);
                Ok(())
            })
        })
        .collect()
}

#[test]
fn test_normal_load_grows_then_shrinks() {
    init_logging();
    let pool = ElasticPool::new(
        2,
        4,
        1,
        Duration::from_millis(300),
        5,
        RejectionPolicy::CallerRuns,
    )
    .expect("Failed to create pool");
    assert_eq!(pool.active_worker_count(), 2);

    let completed = Arc::new(AtomicUsize::new(0));
    for _ in 0..8 {
        let completed = Arc::clone(&completed);
        pool.execute(move || {
            thread::sleep(Duration::from_millis(150));
            completed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .expect("CallerRuns never errors");
    }

    assert!(pool.largest_pool_size() > 2);
    assert!(wait_for(|| completed.load(Ordering::SeqCst) == 8));
    assert!(wait_for(|| pool.active_worker_count() == 2));
    assert_eq!(pool.completed_count(), 8);
    assert_eq!(pool.rejected_count(), 0);
}

#[test]
fn test_abort_saturation_surfaces_error() {
    init_logging();
    let pool = ElasticPool::new(1, 2, 0, Duration::from_secs(5), 2, RejectionPolicy::Abort)
        .expect("Failed to create pool");

    let (gate, latch) = bounded::<()>(0);
    // Shards hold 4, workers can hold 2 more
    let results = submit_blocking(&pool, &latch, 2 * 2 + 2 + 1);

    let rejections: Vec<_> = results.iter().filter_map(|r| r.as_ref().err()).collect();
    assert!(!rejections.is_empty());
    for error in &rejections {
        match error {
            PoolError::Rejected { reason, .. } => {
                assert_eq!(reason, rust_elastic_pool::pool::REASON_SATURATED)
            }
            other => panic!("Unexpected error: {:?}", other),
        }
    }
    assert_eq!(pool.rejected_count(), rejections.len() as u64);
    assert_eq!(pool.active_worker_count(), 2);
    drop(gate);
}

#[test]
fn test_discard_saturation_is_silent() {
    init_logging();
    let pool = ElasticPool::new(1, 2, 0, Duration::from_secs(5), 2, RejectionPolicy::Discard)
        .expect("Failed to create pool");

    let (gate, latch) = bounded::<()>(0);
    let results = submit_blocking(&pool, &latch, 15);
    assert!(results.iter().all(|r| r.is_ok()));

    let accepted = pool.stats().submitted;
    assert_eq!(accepted + pool.rejected_count(), 15);
    assert!(pool.rejected_count() >= 15 - 6);

    drop(gate);
    assert!(wait_for(|| pool.completed_count() == accepted));
}

#[test]
fn test_discard_oldest_replaces_head_of_queue() {
    init_logging();
    let pool = ElasticPool::new(1, 1, 0, Duration::from_secs(5), 3, RejectionPolicy::DiscardOldest)
        .expect("Failed to create pool");

    let (started_tx, started_rx) = bounded(1);
    let (gate, latch) = bounded::<()>(0);
    pool.execute(move || {
        let _ = started_tx.send(());
        let _ = latch.recv_timeout(WAIT);
        Ok(())
    })
    .expect("Failed to execute");
    started_rx.recv_timeout(WAIT).expect("blocker never started");

    let ran = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let ran = Arc::clone(&ran);
            pool.submit_named(format!("queued-{}", i), move || {
                ran.lock().push(i);
                Ok(i)
            })
            .expect("DiscardOldest never errors")
        })
        .collect();

    // The newest task is queued in place of the oldest
    assert_eq!(pool.total_queued_count(), 3);
    assert_eq!(pool.rejected_count(), 1);

    drop(gate);
    let outcomes: Vec<_> = handles.into_iter().map(|h| h.wait_timeout(WAIT)).collect();
    assert!(matches!(outcomes[0], Err(PoolError::Discarded { .. })));
    for (i, outcome) in outcomes.iter().enumerate().skip(1) {
        assert_eq!(*outcome.as_ref().expect("task should run"), i);
    }
    assert_eq!(*ran.lock(), vec![1, 2, 3]);
}

#[test]
fn test_caller_runs_throttles_submitter() {
    init_logging();
    let pool = ElasticPool::new(1, 1, 0, Duration::from_secs(5), 1, RejectionPolicy::CallerRuns)
        .expect("Failed to create pool");

    let (started_tx, started_rx) = bounded(1);
    let (gate, latch) = bounded::<()>(0);
    pool.execute(move || {
        let _ = started_tx.send(());
        let _ = latch.recv_timeout(WAIT);
        Ok(())
    })
    .expect("Failed to execute");
    started_rx.recv_timeout(WAIT).expect("blocker never started");
    pool.execute(|| Ok(())).expect("Failed to execute");

    let submitter = thread::current().id();
    let handle = pool
        .submit(move || Ok(thread::current().id()))
        .expect("CallerRuns never errors");

    assert_eq!(handle.wait().unwrap(), submitter);
    assert_eq!(pool.rejected_count(), 1);
    assert_eq!(pool.stats().caller_runs, 1);
    drop(gate);
}

#[test]
fn test_shutdown_rejects_and_terminates() {
    init_logging();
    let pool = ElasticPool::new(3, 5, 1, Duration::from_secs(5), 10, RejectionPolicy::Discard)
        .expect("Failed to create pool");

    for _ in 0..8 {
        pool.execute(|| {
            thread::sleep(Duration::from_millis(50));
            Ok(())
        })
        .expect("Failed to execute");
    }

    pool.shutdown();
    assert!(pool.is_shutdown());

    let before = pool.rejected_count();
    pool.execute(|| panic!("must never run")).expect("Discard never errors");
    assert_eq!(pool.rejected_count(), before + 1);

    assert!(pool.await_termination(WAIT));
    assert!(pool.is_terminated());
    assert_eq!(pool.active_worker_count(), 0);
    assert_eq!(pool.failed_count(), 0);
}

#[test]
fn test_shutdown_now_reports_dropped_tasks() {
    init_logging();
    let pool = ElasticPool::new(2, 2, 0, Duration::from_secs(5), 10, RejectionPolicy::Abort)
        .expect("Failed to create pool");

    let (gate, latch) = bounded::<()>(0);
    submit_blocking(&pool, &latch, 2)
        .into_iter()
        .collect::<Result<Vec<_>>>()
        .expect("Failed to execute");
    assert!(wait_for(|| pool.total_queued_count() == 0));

    let ran = Arc::new(AtomicUsize::new(0));
    for _ in 0..6 {
        let ran = Arc::clone(&ran);
        pool.execute(move || {
            ran.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .expect("Failed to execute");
    }

    let queued = pool.total_queued_count();
    assert_eq!(queued, 6);
    assert_eq!(pool.shutdown_now(), queued);
    assert_eq!(pool.shutdown_now(), 0);

    drop(gate);
    assert!(pool.await_termination(WAIT));
    assert_eq!(ran.load(Ordering::SeqCst), 0);
}

/// Counts spawns and delegates to the default factory
struct CountingFactory {
    inner: NamedThreadFactory,
    names: parking_lot::Mutex<Vec<String>>,
}

impl ThreadFactory for CountingFactory {
    fn spawn(
        &self,
        worker_id: usize,
        name: String,
        body: WorkerBody,
    ) -> Result<thread::JoinHandle<()>> {
        self.names.lock().push(name.clone());
        self.inner.spawn(worker_id, name, body)
    }
}

#[test]
fn test_custom_thread_factory_names_workers() {
    init_logging();
    let factory = Arc::new(CountingFactory {
        inner: NamedThreadFactory::new(),
        names: parking_lot::Mutex::new(Vec::new()),
    });
    let config = PoolConfig::new(2, 3).with_pool_name("ingest");
    let pool = ElasticPool::with_factory(config, factory.clone()).expect("Failed to create pool");

    let handle = pool
        .submit(|| Ok(thread::current().name().map(str::to_string)))
        .expect("Failed to submit");
    let name = handle.wait().unwrap().expect("worker threads are named");

    assert!(name.starts_with("ingest-worker-"));
    assert_eq!(
        factory.names.lock()[..2],
        ["ingest-worker-1".to_string(), "ingest-worker-2".to_string()]
    );
}

#[test]
fn test_pool_from_json_config() {
    init_logging();
    let config = PoolConfig::from_json(
        r#"{"pool_name":"json","core_pool_size":1,"max_pool_size":2,"shard_capacity":4,"rejection_policy":"discard_oldest"}"#,
    )
    .expect("Failed to parse config");
    let pool = ElasticPool::with_config(config).expect("Failed to create pool");

    assert_eq!(pool.config().rejection_policy, RejectionPolicy::DiscardOldest);
    assert_eq!(pool.shard_lengths(), vec![0, 0]);
    assert_eq!(pool.submit(|| Ok(5)).unwrap().wait().unwrap(), 5);
}

#[test]
fn test_drop_shuts_pool_down() {
    init_logging();
    let ran = Arc::new(AtomicUsize::new(0));
    {
        let pool = ElasticPool::new(2, 4, 1, Duration::from_secs(5), 8, RejectionPolicy::Abort)
            .expect("Failed to create pool");
        let ran = Arc::clone(&ran);
        pool.submit(move || {
            ran.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .unwrap()
        .wait()
        .unwrap();
    }
    assert_eq!(ran.load(Ordering::SeqCst), 1);
}
