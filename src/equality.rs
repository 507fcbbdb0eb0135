//! Comparison strategies for `ChainedMap`
//!
//! [`Positional`] compares the flattened entry sequences slot by slot, so two
//! maps holding the same pairs in different bucket layouts are not equal. It
//! backs the `PartialEq` impl. [`Unordered`] compares the maps as sets of
//! pairs and ignores layout.

use crate::{ChainedMap, key_hash::KeyHash};

/// A way of deciding whether two maps are equal
pub trait MapEquivalence {
    /// Returns true if `left` and `right` are equal under this strategy
    fn equivalent<K, V>(left: &ChainedMap<K, V>, right: &ChainedMap<K, V>) -> bool
    where
        K: KeyHash + Eq,
        V: PartialEq;
}

/// Equal lengths and equal entries at every position of the bucket-order
/// traversal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Positional;

impl MapEquivalence for Positional {
    fn equivalent<K, V>(left: &ChainedMap<K, V>, right: &ChainedMap<K, V>) -> bool
    where
        K: KeyHash + Eq,
        V: PartialEq,
    {
        left.len() == right.len() && left.iter().eq(right.iter())
    }
}

/// Equal lengths and every key of one map mapped to an equal value in the
/// other
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unordered;

impl MapEquivalence for Unordered {
    fn equivalent<K, V>(left: &ChainedMap<K, V>, right: &ChainedMap<K, V>) -> bool
    where
        K: KeyHash + Eq,
        V: PartialEq,
    {
        left.len() == right.len() &&
            left.iter().all(|(key, value)| right.get(key).is_ok_and(|other| other == value))
    }
}
