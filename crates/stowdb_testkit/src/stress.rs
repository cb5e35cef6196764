//! Stress tests for StowDB.
//!
//! These helpers drive a store under heavy load and concurrent access and
//! count how many operations succeeded.

use crate::fixtures::Person;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use stowdb_codec::Codec;
use stowdb_core::{Store, StoreResult};

/// Result of a stress test run.
#[derive(Debug, Clone)]
pub struct StressTestResult {
    /// Total operations performed.
    pub total_ops: usize,
    /// Successful operations.
    pub successful_ops: usize,
    /// Failed operations.
    pub failed_ops: usize,
    /// Total duration.
    pub duration: Duration,
    /// Operations per second.
    pub ops_per_second: f64,
}

impl StressTestResult {
    /// Creates a new result.
    pub fn new(successful: usize, failed: usize, duration: Duration) -> Self {
        let total = successful + failed;
        let ops_per_second = if duration.as_secs_f64() > 0.0 {
            total as f64 / duration.as_secs_f64()
        } else {
            0.0
        };

        Self {
            total_ops: total,
            successful_ops: successful,
            failed_ops: failed,
            duration,
            ops_per_second,
        }
    }

    /// Prints a summary of the test.
    pub fn print_summary(&self, name: &str) {
        println!("\n=== {name} ===");
        println!("Total operations: {}", self.total_ops);
        println!("Successful: {}", self.successful_ops);
        println!("Failed: {}", self.failed_ops);
        println!("Duration: {:?}", self.duration);
        println!("Throughput: {:.2} ops/sec", self.ops_per_second);
    }
}

/// Configuration for stress tests.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Number of operations to perform.
    pub operations: usize,
    /// Number of concurrent threads (for concurrent tests).
    pub threads: usize,
    /// Number of records to seed before read-heavy tests.
    pub record_count: usize,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            operations: 10_000,
            threads: 4,
            record_count: 1_000,
        }
    }
}

fn stress_person(i: usize) -> Person {
    Person::new(format!("stress-{i}"), u32::try_from(i % 100).unwrap_or(0))
}

#[derive(Default)]
struct Tally {
    successful: AtomicUsize,
    failed: AtomicUsize,
}

impl Tally {
    fn record<T>(&self, result: StoreResult<T>) {
        let counter = if result.is_ok() {
            &self.successful
        } else {
            &self.failed
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn finish(&self, start: Instant) -> StressTestResult {
        StressTestResult::new(
            self.successful.load(Ordering::Relaxed),
            self.failed.load(Ordering::Relaxed),
            start.elapsed(),
        )
    }
}

fn seed<C: Codec>(store: &Store<Person, C>, count: usize) {
    store
        .insert((0..count).map(stress_person))
        .expect("Failed to seed store");
}

/// Run a sequential insert stress test.
pub fn stress_sequential_inserts<C: Codec>(
    store: &Store<Person, C>,
    config: &StressConfig,
) -> StressTestResult {
    let tally = Tally::default();
    let start = Instant::now();

    for i in 0..config.operations {
        tally.record(store.insert([stress_person(i)]));
    }

    tally.finish(start)
}

/// Run a sequential query stress test over a seeded store.
pub fn stress_sequential_reads<C: Codec>(
    store: &Store<Person, C>,
    config: &StressConfig,
) -> StressTestResult {
    seed(store, config.record_count);

    let tally = Tally::default();
    let start = Instant::now();

    for i in 0..config.operations {
        let age = u32::try_from(i % 100).unwrap_or(0);
        tally.record(store.where_(|p| p.age == age));
    }

    tally.finish(start)
}

/// Run a mixed insert/query/drop stress test.
pub fn stress_mixed_operations<C: Codec>(
    store: &Store<Person, C>,
    config: &StressConfig,
) -> StressTestResult {
    let tally = Tally::default();
    let start = Instant::now();

    for i in 0..config.operations {
        match i % 3 {
            // Insert (33%)
            0 => tally.record(store.insert([stress_person(i)])),
            // Query (33%)
            1 => tally.record(store.where_(|p| p.age < 50)),
            // Drop (33%)
            _ => tally.record(store.drop(&[stress_person(i - 2)])),
        }
    }

    tally.finish(start)
}

/// Run a concurrent insert stress test.
///
/// Every thread inserts its share of `config.operations` records; a
/// correct store ends up holding all of them.
pub fn stress_concurrent_inserts<C: Codec>(
    store: Arc<Store<Person, C>>,
    config: &StressConfig,
) -> StressTestResult {
    let tally = Arc::new(Tally::default());
    let ops_per_thread = config.operations / config.threads;
    let start = Instant::now();

    let handles: Vec<_> = (0..config.threads)
        .map(|t| {
            let store = Arc::clone(&store);
            let tally = Arc::clone(&tally);

            thread::spawn(move || {
                for i in 0..ops_per_thread {
                    tally.record(store.insert([stress_person(t * ops_per_thread + i)]));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    tally.finish(start)
}

/// Run a concurrent read/write stress test.
///
/// Half the threads query with `where_` and `uwhere`, the other half age
/// every record with `map`.
pub fn stress_concurrent_readers_writers<C: Codec>(
    store: Arc<Store<Person, C>>,
    config: &StressConfig,
) -> StressTestResult {
    seed(&store, config.record_count);

    let tally = Arc::new(Tally::default());
    let ops_per_thread = config.operations / config.threads;
    let start = Instant::now();

    let handles: Vec<_> = (0..config.threads)
        .map(|t| {
            let store = Arc::clone(&store);
            let tally = Arc::clone(&tally);

            thread::spawn(move || {
                for i in 0..ops_per_thread {
                    if t % 2 == 1 {
                        tally.record(store.map(|p| p.age = p.age.wrapping_add(1)));
                    } else if i % 2 == 0 {
                        tally.record(store.where_(|p| p.age % 2 == 0));
                    } else {
                        tally.record(store.uwhere(|p| p.age % 2 == 1));
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    tally.finish(start)
}
