//! # Chained Map
//!
//! A Rust implementation of a hash map that resolves collisions by separate
//! chaining.
//!
//! `ChainedMap` keeps a bucket array of at least ten chains. After an insert
//! pushes the load factor above 0.75 the array doubles; after a delete drops
//! it below 0.25 the array halves, never going under the minimum. Both
//! directions rebuild the whole array in one pass.
//!
//! Keys supply their own hash through the [`KeyHash`] trait. Integers hash to
//! their own value, so the bucket of a small integer key is predictable; wrap
//! any std [`Hash`](std::hash::Hash) type in [`Hashed`] to use it as a key.
//!
//! ## Basic Usage
//!
//! ```rust
//! use chained_map::{ChainedMap, MapError};
//!
//! // Create a map from initial pairs
//! let mut map = ChainedMap::from_pairs([(1, "one"), (2, "two"), (3, "three")]);
//!
//! // Retrieve values
//! assert_eq!(map.get(&1), Ok(&"one"));
//!
//! // Update values
//! map.set(1, "won");
//! assert_eq!(map.get(&1), Ok(&"won"));
//!
//! // Remove values
//! map.delete(&1).unwrap();
//! assert_eq!(map.get(&1), Err(MapError::KeyNotFound));
//!
//! // Iterate in bucket order
//! assert_eq!(map.keys(), vec![&2, &3]);
//! assert_eq!(map.to_string(), r#"[(2, "two"), (3, "three")]"#);
//! ```
//!
//! ## Resizing
//!
//! ```rust
//! use chained_map::ChainedMap;
//!
//! let mut map = ChainedMap::new();
//! for key in 0..7 {
//!     map.set(key, key * 2);
//! }
//! assert_eq!(map.max_length(), 10);
//!
//! // The eighth entry crosses 0.75 * 10
//! map.set(7, 14);
//! assert_eq!(map.max_length(), 20);
//! ```
//!
//! ## Equality
//!
//! `==` compares entries position by position in bucket order, so it depends
//! on layout. [`Unordered`] compares contents only.
//!
//! ```rust
//! use chained_map::{ChainedMap, Unordered};
//!
//! let mut a = ChainedMap::new();
//! a.set(0, "zero");
//! a.set(10, "ten");
//!
//! let mut b = ChainedMap::new();
//! b.set(10, "ten");
//! b.set(0, "zero");
//!
//! assert_ne!(a, b);
//! assert!(a.equals_by::<Unordered>(&b));
//! ```

/// Module implementing the separate-chaining hash map
mod chained_map;
/// Comparison strategies for maps
mod equality;
/// Crate error type
mod error;
/// Hashing capability required of keys
mod key_hash;
/// Grow and shrink thresholds
mod policy;
/// Bucket layout diagnostics
mod utils;

pub use chained_map::{ChainedMap, IntoIter, Iter};
pub use equality::{MapEquivalence, Positional, Unordered};
pub use error::{MapError, Result};
pub use key_hash::{Hashed, KeyHash};
pub use policy::{GROW_THRESHOLD, MIN_CAPACITY, ResizePolicy, SHRINK_THRESHOLD};
pub use utils::BucketDiagnostics;
