//! # StowDB Testkit
//!
//! Test utilities for StowDB.
//!
//! This crate provides:
//! - Sample record types and store fixtures with automatic cleanup
//! - Property-based test generators using proptest
//! - Stress testing utilities for concurrent access
//!
//! ## Usage
//!
//! ```rust
//! use stowdb_testkit::prelude::*;
//!
//! with_temp_store(|store| {
//!     store.insert(sample_people(3)).unwrap();
//!     assert_eq!(store.len().unwrap(), 3);
//! });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod stress;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::stress::*;
}

pub use fixtures::*;
pub use generators::*;
pub use stress::*;
