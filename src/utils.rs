//! Utility functions and traits for inspecting `ChainedMap` bucket layout

use crate::ChainedMap;

/// Extension trait exposing how entries are spread across buckets
pub trait BucketDiagnostics {
    /// Returns the chain length of every bucket, by index
    fn chain_lengths(&self) -> Vec<usize>;

    /// Returns the length of the longest chain
    fn longest_chain(&self) -> usize;

    /// Returns the number of buckets holding no entries
    fn empty_buckets(&self) -> usize;
}

impl<K, V> BucketDiagnostics for ChainedMap<K, V> {
    fn chain_lengths(&self) -> Vec<usize> {
        self.bucket_lengths().collect()
    }

    fn longest_chain(&self) -> usize {
        self.bucket_lengths().max().unwrap_or(0)
    }

    fn empty_buckets(&self) -> usize {
        self.bucket_lengths().filter(|&len| len == 0).count()
    }
}
