//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random records and operation
//! sequences, plus a plain `Vec` model that every store must agree with.

use crate::fixtures::Person;
use proptest::prelude::*;
use stowdb_codec::Codec;
use stowdb_core::{Mode, Store, StoreResult};

/// Strategy for generating either store mode.
pub fn mode_strategy() -> impl Strategy<Value = Mode> {
    prop_oneof![Just(Mode::InMemory), Just(Mode::Strict)]
}

/// Strategy for generating a single person.
///
/// Names come from a small alphabet so duplicates are common.
pub fn person_strategy() -> impl Strategy<Value = Person> {
    (
        prop::string::string_regex("[a-d]{1,3}").expect("Invalid regex"),
        0u32..100,
        prop::option::of(prop::string::string_regex("[a-z]{1,8}@example\\.com").expect("Invalid regex")),
    )
        .prop_map(|(name, age, email)| Person { name, age, email })
}

/// Strategy for generating a batch of people.
pub fn people_strategy(max: usize) -> impl Strategy<Value = Vec<Person>> {
    prop::collection::vec(person_strategy(), 0..max)
}

/// A store operation with a deterministic effect on the collection.
#[derive(Debug, Clone)]
pub enum StoreOperation {
    /// Append people
    Insert(Vec<Person>),
    /// Replace the whole collection
    Fill(Vec<Person>),
    /// Remove one matching record per victim
    Drop(Vec<Person>),
    /// Remove everyone older than the given age
    DropOlderThan(u32),
    /// Add the given number of years to everyone
    Age(u32),
}

impl StoreOperation {
    /// Applies the operation to `store`.
    ///
    /// # Errors
    ///
    /// Propagates any store error.
    pub fn apply<C: Codec>(&self, store: &Store<Person, C>) -> StoreResult<()> {
        match self {
            Self::Insert(people) => store.insert(people.iter().cloned()),
            Self::Fill(people) => store.fill(people),
            Self::Drop(victims) => store.drop(victims).map(|_| ()),
            Self::DropOlderThan(limit) => store.drop_where(|p| p.age > *limit).map(|_| ()),
            Self::Age(years) => store.map(|p| p.age += years),
        }
    }

    /// Applies the operation to a plain vector with the same semantics.
    pub fn apply_to_model(&self, model: &mut Vec<Person>) {
        match self {
            Self::Insert(people) => model.extend(people.iter().cloned()),
            Self::Fill(people) => *model = people.clone(),
            Self::Drop(victims) => {
                for victim in victims {
                    if let Some(index) = model.iter().position(|p| p == victim) {
                        model.swap_remove(index);
                    }
                }
            }
            Self::DropOlderThan(limit) => model.retain(|p| p.age <= *limit),
            Self::Age(years) => model.iter_mut().for_each(|p| p.age += years),
        }
    }
}

/// Strategy for generating store operations.
pub fn store_operation_strategy() -> impl Strategy<Value = StoreOperation> {
    prop_oneof![
        3 => people_strategy(4).prop_map(StoreOperation::Insert),
        1 => people_strategy(3).prop_map(StoreOperation::Fill),
        2 => people_strategy(3).prop_map(StoreOperation::Drop),
        1 => (0u32..100).prop_map(StoreOperation::DropOlderThan),
        1 => (0u32..5).prop_map(StoreOperation::Age),
    ]
}

/// Strategy for generating a sequence of operations.
pub fn operation_sequence_strategy(
    min_ops: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<StoreOperation>> {
    prop::collection::vec(store_operation_strategy(), min_ops..max_ops)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
