//! Load-factor thresholds that drive bucket array growth and shrinkage

use crate::error::{MapError, Result};

/// Smallest bucket count a map with the default policy ever has
pub const MIN_CAPACITY: usize = 10;

/// Load factor above which the bucket array doubles
pub const GROW_THRESHOLD: f64 = 0.75;

/// Load factor below which the bucket array halves
pub const SHRINK_THRESHOLD: f64 = 0.25;

/// Decides when a [`ChainedMap`](crate::ChainedMap) resizes and to what.
///
/// The default policy keeps at least [`MIN_CAPACITY`] buckets, doubles once
/// `len > 0.75 * capacity` after an insert and halves once
/// `len < 0.25 * capacity` after a delete.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizePolicy {
    /// Floor for the bucket count
    min_capacity: usize,
    /// Grow when the load factor rises above this
    grow_threshold: f64,
    /// Shrink when the load factor falls below this
    shrink_threshold: f64,
}

impl Default for ResizePolicy {
    fn default() -> Self {
        Self {
            min_capacity: MIN_CAPACITY,
            grow_threshold: GROW_THRESHOLD,
            shrink_threshold: SHRINK_THRESHOLD,
        }
    }
}

impl ResizePolicy {
    /// Creates a policy with custom thresholds.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidPolicy`] when `min_capacity` is zero, a
    /// threshold is not a positive finite number, or `2 * shrink_threshold`
    /// exceeds `grow_threshold` (a halved table would immediately grow again).
    #[allow(clippy::arithmetic_side_effects)]
    pub fn new(min_capacity: usize, grow_threshold: f64, shrink_threshold: f64) -> Result<Self> {
        if min_capacity == 0 {
            return Err(MapError::InvalidPolicy("min_capacity must be at least 1"));
        }
        if !grow_threshold.is_finite() || grow_threshold <= 0.0 {
            return Err(MapError::InvalidPolicy("grow_threshold must be positive and finite"));
        }
        if !shrink_threshold.is_finite() || shrink_threshold <= 0.0 {
            return Err(MapError::InvalidPolicy("shrink_threshold must be positive and finite"));
        }
        if shrink_threshold * 2.0 > grow_threshold {
            return Err(MapError::InvalidPolicy(
                "shrink_threshold must be at most half of grow_threshold",
            ));
        }

        Ok(Self { min_capacity, grow_threshold, shrink_threshold })
    }

    /// Returns the bucket count floor
    #[must_use]
    pub fn min_capacity(&self) -> usize {
        self.min_capacity
    }

    /// Returns the grow threshold
    #[must_use]
    pub fn grow_threshold(&self) -> f64 {
        self.grow_threshold
    }

    /// Returns the shrink threshold
    #[must_use]
    pub fn shrink_threshold(&self) -> f64 {
        self.shrink_threshold
    }

    /// Bucket count for a map about to receive `pairs` entries: the floor,
    /// doubled until `pairs` no longer exceeds the grow threshold.
    #[must_use]
    pub fn initial_capacity(&self, pairs: usize) -> usize {
        let mut capacity = self.min_capacity;
        while self.exceeds_grow(pairs, capacity) && capacity < usize::MAX {
            capacity = capacity.saturating_mul(2);
        }
        capacity
    }

    /// Whether `len` entries in `capacity` buckets call for doubling
    #[must_use]
    pub fn should_grow(&self, len: usize, capacity: usize) -> bool {
        self.exceeds_grow(len, capacity)
    }

    /// Whether `len` entries in `capacity` buckets call for halving
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn should_shrink(&self, len: usize, capacity: usize) -> bool {
        capacity > self.min_capacity && (len as f64) < capacity as f64 * self.shrink_threshold
    }

    /// Capacity after a grow step
    #[must_use]
    pub fn grown(&self, capacity: usize) -> usize {
        capacity.saturating_mul(2)
    }

    /// Capacity after a shrink step, never below the floor
    #[must_use]
    pub fn shrunk(&self, capacity: usize) -> usize {
        (capacity / 2).max(self.min_capacity)
    }

    /// Strict comparison against the grow threshold
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    fn exceeds_grow(&self, len: usize, capacity: usize) -> bool {
        len as f64 > capacity as f64 * self.grow_threshold
    }
}
