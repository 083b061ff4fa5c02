//! Elastic pool walkthrough
//!
//! Runs three scenarios against the pool:
//! - Normal load under `CallerRuns`, showing growth and shrink-back
//! - Overload with a tiny pool, once per silent rejection policy
//! - Graceful shutdown with long-running tasks still queued
//!
//! Run with `RUST_LOG=info cargo run --example pool_demo` to see the pool's
//! own log lines interleaved with the task output.

use chrono::Local;
use rand::Rng;
use rust_elastic_pool::prelude::*;
use std::thread;
use std::time::{Duration, Instant};

fn now() -> String {
    Local::now().format("%H:%M:%S%.3f").to_string()
}

fn print_separator(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{}", title);
    println!("{}", "=".repeat(60));
}

fn print_stats(pool: &ElasticPool, phase: &str) {
    println!("[Stats-{}] {}", phase, pool.stats());
}

/// A task that sleeps for a fixed time and reports where it ran
struct SimulationTask {
    id: usize,
    duration: Duration,
    label: String,
}

impl SimulationTask {
    fn new(id: usize, duration_ms: u64, kind: &str) -> Self {
        Self {
            id,
            duration: Duration::from_millis(duration_ms),
            label: format!("{}-Task-{}({}ms)", kind, id, duration_ms),
        }
    }
}

impl Task for SimulationTask {
    fn run(&mut self) -> Result<()> {
        let current = thread::current();
        let executor = current.name().unwrap_or("unnamed");
        println!("[{}] {} started in {}", now(), self.label, executor);
        thread::sleep(self.duration);
        println!(
            "[{}] {} completed in {} (took {}ms)",
            now(),
            self.label,
            executor,
            self.duration.as_millis()
        );
        Ok(())
    }

    fn name(&self) -> &str {
        &self.label
    }
}

fn wait_for_termination(pool: &ElasticPool) {
    println!("\nWaiting for {} termination", pool.pool_name());
    if pool.await_termination(Duration::from_secs(10)) {
        println!("{} terminated successfully", pool.pool_name());
    } else {
        println!("{} termination timeout, forcing shutdown", pool.pool_name());
        pool.shutdown_now();
    }
    print_stats(pool, "Terminated");
}

fn demonstrate_normal_operation() -> Result<()> {
    print_separator("Scenario 1: Normal operation");

    let pool = ElasticPool::with_config(
        PoolConfig::new(2, 4)
            .with_min_spare_threads(1)
            .with_keep_alive(Duration::from_secs(5))
            .with_shard_capacity(5)
            .with_rejection_policy(RejectionPolicy::CallerRuns)
            .with_pool_name("NormalPool"),
    )?;
    println!("Created pool: core=2, max=4, minSpare=1, shardCapacity=5");
    print_stats(&pool, "Init");

    println!("\nSubmitting 8 normal tasks");
    for i in 1..=8 {
        pool.execute_task(SimulationTask::new(i, 1500, "Normal"))?;
        thread::sleep(Duration::from_millis(200));
        if i % 3 == 0 {
            print_stats(&pool, "Progress");
        }
    }

    thread::sleep(Duration::from_secs(4));
    print_stats(&pool, "Final");
    println!("Largest pool size: {}", pool.largest_pool_size());

    pool.shutdown();
    wait_for_termination(&pool);
    Ok(())
}

fn demonstrate_overload_handling() -> Result<()> {
    print_separator("Scenario 2: Overload handling");

    let mut rng = rand::thread_rng();
    for policy in [
        RejectionPolicy::CallerRuns,
        RejectionPolicy::Discard,
        RejectionPolicy::DiscardOldest,
        RejectionPolicy::Abort,
    ] {
        println!("\n--- Testing rejection policy: {} ---", policy);
        if policy.surfaces_errors() {
            println!("Rejected submissions return an error to the caller");
        }

        let pool = ElasticPool::with_config(
            PoolConfig::new(2, 3)
                .with_min_spare_threads(0)
                .with_keep_alive(Duration::from_secs(2))
                .with_shard_capacity(2)
                .with_rejection_policy(policy)
                .with_pool_name(format!("OverloadPool-{}", policy)),
        )?;
        print_stats(&pool, "Init");

        println!("Rapidly submitting 15 tasks to create overload");
        for i in 1..=15 {
            let duration_ms = 2000 + rng.gen_range(0..200);
            match pool.execute_task(SimulationTask::new(i, duration_ms, "Overload")) {
                Ok(()) => println!("Submitted task {}", i),
                Err(e) => println!("Task {} rejected with error: {}", i, e),
            }
            if i % 5 == 0 {
                print_stats(&pool, "Overload");
            }
            thread::sleep(Duration::from_millis(50));
        }

        thread::sleep(Duration::from_secs(1));
        print_stats(&pool, "Final");

        let dropped = pool.shutdown_now();
        println!("shutdown_now dropped {} queued tasks", dropped);
        pool.await_termination(Duration::from_secs(5));
    }
    Ok(())
}

fn demonstrate_shutdown() -> Result<()> {
    print_separator("Scenario 3: Shutdown procedures");

    let pool = ElasticPool::with_config(
        PoolConfig::new(3, 5)
            .with_min_spare_threads(1)
            .with_keep_alive(Duration::from_secs(5))
            .with_shard_capacity(10)
            .with_rejection_policy(RejectionPolicy::Discard)
            .with_pool_name("ShutdownPool"),
    )?;

    println!("Submitting long-running tasks");
    for i in 1..=8 {
        pool.execute_task(SimulationTask::new(i, 3000, "Long"))?;
        thread::sleep(Duration::from_millis(100));
    }

    thread::sleep(Duration::from_secs(1));
    print_stats(&pool, "Before shutdown");

    println!("\nInitiating graceful shutdown");
    pool.shutdown();

    let rejected_before = pool.rejected_count();
    pool.execute_task(SimulationTask::new(999, 1000, "AfterShutdown"))?;
    if pool.rejected_count() > rejected_before {
        println!("Task after shutdown was rejected");
    }

    let started = Instant::now();
    while !pool.is_terminated() && started.elapsed() < Duration::from_secs(10) {
        print_stats(&pool, "Shutting down");
        pool.await_termination(Duration::from_secs(1));
    }

    if !pool.is_terminated() {
        println!("Graceful shutdown taking too long, forcing shutdown");
        pool.shutdown_now();
        pool.await_termination(Duration::from_secs(2));
    }

    println!("Final state - Terminated: {}", pool.is_terminated());
    println!("{}", pool.stats().to_json());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    println!("Starting elastic pool demonstration");
    println!("Current time: {}", now());

    demonstrate_normal_operation()?;
    thread::sleep(Duration::from_secs(2));

    demonstrate_overload_handling()?;
    thread::sleep(Duration::from_secs(2));

    demonstrate_shutdown()?;

    print_separator("Demonstration completed successfully");
    Ok(())
}
