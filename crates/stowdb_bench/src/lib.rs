//! Benchmark utilities.

#![warn(missing_docs)]

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Record type used by the benchmarks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Sequence number.
    pub id: u64,
    /// Random label.
    pub label: String,
    /// Random score.
    pub score: f64,
    /// Random tags.
    pub tags: Vec<String>,
}

/// Generate random blob data of the specified size.
pub fn random_data(size: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen()).collect()
}

fn random_word(rng: &mut impl Rng, len: usize) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generate `count` random items with sequential ids.
pub fn generate_items(count: usize) -> Vec<Item> {
    let mut rng = rand::thread_rng();
    (0..count as u64)
        .map(|id| Item {
            id,
            label: random_word(&mut rng, 16),
            score: rng.gen_range(0.0..100.0),
            tags: (0..rng.gen_range(0..4))
                .map(|_| random_word(&mut rng, 6))
                .collect(),
        })
        .collect()
}
