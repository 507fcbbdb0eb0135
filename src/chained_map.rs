use std::{
    borrow::Borrow,
    fmt,
    iter::{self, FusedIterator},
    mem, slice, vec,
};

use log::{debug, trace};

use crate::{
    equality::{MapEquivalence, Positional},
    error::{MapError, Result},
    key_hash::KeyHash,
    policy::ResizePolicy,
};

/// A key-value pair stored in a bucket chain
#[derive(Debug, Clone)]
struct Entry<K, V> {
    /// The key in the key-value pair
    key: K,
    /// The value associated with the key
    value: V,
}

/// The chain of entries sharing one bucket index, in insertion order
type Bucket<K, V> = Vec<Entry<K, V>>;

/// A hash map resolving collisions by separate chaining.
///
/// Every bucket holds the entries whose hash maps to its index, in the order
/// they were inserted. The bucket array doubles after an insert pushes the
/// load factor above the grow threshold and halves after a delete drops it
/// below the shrink threshold (see [`ResizePolicy`]). Each resize rebuilds the
/// whole array.
///
/// Iteration walks buckets by index and each chain front to back. That order
/// depends on the current capacity, so it is not insertion order and it
/// changes across resizes. [`PartialEq`] compares maps position by position
/// in that order; use [`ChainedMap::equals_by`] with
/// [`Unordered`](crate::Unordered) for layout-independent comparison.
///
/// Note: This implementation is not thread-safe.
#[derive(Clone)]
pub struct ChainedMap<K, V> {
    /// Bucket chains; the length of this vector is the capacity
    buckets: Vec<Bucket<K, V>>,
    /// Current number of entries across all chains
    len: usize,
    /// Grow and shrink thresholds
    policy: ResizePolicy,
}

impl<K, V> Default for ChainedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> ChainedMap<K, V> {
    /// Creates an empty map with the default [`ResizePolicy`]
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(ResizePolicy::default())
    }

    /// Creates an empty map sized at the policy's minimum capacity
    #[must_use]
    pub fn with_policy(policy: ResizePolicy) -> Self {
        Self { buckets: empty_buckets(policy.min_capacity()), len: 0, policy }
    }

    /// Returns the number of entries in the map
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the map holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of buckets
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the number of buckets. Alias of [`ChainedMap::capacity`].
    #[must_use]
    pub fn max_length(&self) -> usize {
        self.capacity()
    }

    /// Returns `len / capacity`
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }

    /// Returns the resize policy in effect
    #[must_use]
    pub fn policy(&self) -> &ResizePolicy {
        &self.policy
    }

    /// Returns an iterator over the entries in bucket order
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter { buckets: self.buckets.iter(), chain: slice::Iter::default(), remaining: self.len }
    }

    /// Returns every key in bucket order
    #[must_use]
    pub fn keys(&self) -> Vec<&K> {
        self.iter().map(|(key, _)| key).collect()
    }

    /// Returns every value in bucket order
    #[must_use]
    pub fn values(&self) -> Vec<&V> {
        self.iter().map(|(_, value)| value).collect()
    }

    /// Returns every entry in bucket order
    #[must_use]
    pub fn items(&self) -> Vec<(&K, &V)> {
        self.iter().collect()
    }

    /// Chain length of every bucket, by index
    pub(crate) fn bucket_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.buckets.iter().map(Vec::len)
    }
}

impl<K, V> ChainedMap<K, V>
where
    K: KeyHash + Eq,
{
    /// Builds a map from `pairs`, inserting them in order.
    ///
    /// The bucket array is presized so the pair count alone stays under the
    /// grow threshold. Later duplicates overwrite earlier ones.
    #[must_use]
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self::from_pairs_with_policy(pairs, ResizePolicy::default())
    }

    /// Builds a map from `pairs` under a custom [`ResizePolicy`]
    #[must_use]
    pub fn from_pairs_with_policy<I>(pairs: I, policy: ResizePolicy) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let pairs: Vec<(K, V)> = pairs.into_iter().collect();
        let capacity = policy.initial_capacity(pairs.len());
        trace!("presizing chained map to {capacity} buckets for {} pairs", pairs.len());

        let mut map = Self { buckets: empty_buckets(capacity), len: 0, policy };
        for (key, value) in pairs {
            map.set(key, value);
        }
        map
    }

    /// Gets the bucket index for a key
    fn bucket_index<Q: KeyHash + ?Sized>(&self, key: &Q) -> usize {
        bucket_index_for(key.key_hash(), self.capacity())
    }

    /// Finds the bucket index and chain position holding `key`
    fn locate<Q>(&self, key: &Q) -> Option<(usize, usize)>
    where
        K: Borrow<Q>,
        Q: KeyHash + Eq + ?Sized,
    {
        let index = self.bucket_index(key);
        let position = self.buckets.get(index)?.iter().position(|entry| entry.key.borrow() == key)?;
        Some((index, position))
    }

    /// Sets the value for `key`, creating the mapping if absent
    pub fn set(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    /// Inserts a key-value pair, returning the previous value for `key`.
    ///
    /// An existing entry is updated in place and keeps its chain position. A
    /// new entry goes to the end of its chain and may trigger a grow.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let index = self.bucket_index(&key);
        let bucket = self.buckets.get_mut(index)?;

        if let Some(entry) = bucket.iter_mut().find(|entry| entry.key == key) {
            return Some(mem::replace(&mut entry.value, value));
        }

        bucket.push(Entry { key, value });
        self.len = self.len.saturating_add(1);

        if self.policy.should_grow(self.len, self.capacity()) {
            self.resize(self.policy.grown(self.capacity()));
        }

        None
    }

    /// Retrieves the value for `key`
    ///
    /// # Errors
    ///
    /// Returns [`MapError::KeyNotFound`] if `key` has no mapping.
    pub fn get<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: KeyHash + Eq + ?Sized,
    {
        let index = self.bucket_index(key);
        self.buckets
            .get(index)
            .and_then(|bucket| bucket.iter().find(|entry| entry.key.borrow() == key))
            .map(|entry| &entry.value)
            .ok_or(MapError::KeyNotFound)
    }

    /// Retrieves a mutable reference to the value for `key`
    ///
    /// # Errors
    ///
    /// Returns [`MapError::KeyNotFound`] if `key` has no mapping.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: KeyHash + Eq + ?Sized,
    {
        let index = self.bucket_index(key);
        self.buckets
            .get_mut(index)
            .and_then(|bucket| bucket.iter_mut().find(|entry| entry.key.borrow() == key))
            .map(|entry| &mut entry.value)
            .ok_or(MapError::KeyNotFound)
    }

    /// Returns true if `key` has a mapping
    #[must_use]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: KeyHash + Eq + ?Sized,
    {
        self.locate(key).is_some()
    }

    /// Removes the mapping for `key` and returns its value.
    ///
    /// The rest of the chain keeps its relative order. May trigger a shrink.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::KeyNotFound`] if `key` has no mapping.
    pub fn remove<Q>(&mut self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: KeyHash + Eq + ?Sized,
    {
        let (index, position) = self.locate(key).ok_or(MapError::KeyNotFound)?;
        let entry = self
            .buckets
            .get_mut(index)
            .filter(|bucket| position < bucket.len())
            .map(|bucket| bucket.remove(position))
            .ok_or(MapError::KeyNotFound)?;
        self.len = self.len.saturating_sub(1);

        if self.policy.should_shrink(self.len, self.capacity()) {
            self.resize(self.policy.shrunk(self.capacity()));
        }

        Ok(entry.value)
    }

    /// Removes the mapping for `key`
    ///
    /// # Errors
    ///
    /// Returns [`MapError::KeyNotFound`] if `key` has no mapping.
    pub fn delete<Q>(&mut self, key: &Q) -> Result<()>
    where
        K: Borrow<Q>,
        Q: KeyHash + Eq + ?Sized,
    {
        self.remove(key)?;
        Ok(())
    }

    /// Compares two maps with the given [`MapEquivalence`] strategy
    #[must_use]
    pub fn equals_by<S>(&self, other: &Self) -> bool
    where
        S: MapEquivalence,
        V: PartialEq,
    {
        S::equivalent(self, other)
    }

    /// Rebuilds the bucket array at `new_capacity`, re-chaining entries in
    /// their current iteration order
    fn resize(&mut self, new_capacity: usize) {
        debug!(
            "resizing chained map from {} to {new_capacity} buckets ({} entries)",
            self.capacity(),
            self.len
        );

        let old_buckets = mem::replace(&mut self.buckets, empty_buckets(new_capacity));
        for entry in old_buckets.into_iter().flatten() {
            let index = bucket_index_for(entry.key.key_hash(), new_capacity);
            if let Some(bucket) = self.buckets.get_mut(index) {
                bucket.push(entry);
            }
        }
    }
}

/// Allocates `capacity` empty chains
fn empty_buckets<K, V>(capacity: usize) -> Vec<Bucket<K, V>> {
    iter::repeat_with(Vec::new).take(capacity).collect()
}

/// Maps a signed hash into `0..capacity` using the Euclidean remainder, so
/// negative hashes never produce an out-of-range index
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn bucket_index_for(hash: i64, capacity: usize) -> usize {
    let modulus = i128::from(capacity.max(1) as u64);
    i128::from(hash).rem_euclid(modulus) as usize
}

impl<K, V> PartialEq for ChainedMap<K, V>
where
    K: KeyHash + Eq,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.equals_by::<Positional>(other)
    }
}

impl<K, V> Eq for ChainedMap<K, V>
where
    K: KeyHash + Eq,
    V: Eq,
{
}

impl<K, V> Extend<(K, V)> for ChainedMap<K, V>
where
    K: KeyHash + Eq,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for ChainedMap<K, V>
where
    K: KeyHash + Eq,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self::from_pairs(iter)
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for ChainedMap<K, V>
where
    K: KeyHash + Eq,
{
    fn from(pairs: [(K, V); N]) -> Self {
        Self::from_pairs(pairs)
    }
}

impl<K, V> From<Vec<(K, V)>> for ChainedMap<K, V>
where
    K: KeyHash + Eq,
{
    fn from(pairs: Vec<(K, V)>) -> Self {
        Self::from_pairs(pairs)
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for ChainedMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainedMap")
            .field("capacity", &self.capacity())
            .field("len", &self.len)
            .field("entries", &self.items())
            .finish()
    }
}

/// Renders the flattened entries, e.g. `[(1, "one"), (2, "two")]`
impl<K: fmt::Debug, V: fmt::Debug> fmt::Display for ChainedMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Iterator over the entries of a [`ChainedMap`] in bucket order
#[derive(Debug)]
pub struct Iter<'a, K, V> {
    /// Buckets not yet visited
    buckets: slice::Iter<'a, Bucket<K, V>>,
    /// Remainder of the chain being walked
    chain: slice::Iter<'a, Entry<K, V>>,
    /// Entries left to yield
    remaining: usize,
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self { buckets: self.buckets.clone(), chain: self.chain.clone(), remaining: self.remaining }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.chain.next() {
                self.remaining = self.remaining.saturating_sub(1);
                return Some((&entry.key, &entry.value));
            }
            self.chain = self.buckets.next()?.iter();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// Owning iterator over the entries of a [`ChainedMap`].
///
/// The chains are flattened when the iterator is created.
#[derive(Debug)]
pub struct IntoIter<K, V> {
    /// Flattened entries in bucket order
    entries: vec::IntoIter<Entry<K, V>>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next().map(|Entry { key, value }| (key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K, V> IntoIterator for ChainedMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let entries: Vec<Entry<K, V>> = self.buckets.into_iter().flatten().collect();
        IntoIter { entries: entries.into_iter() }
    }
}

impl<'a, K, V> IntoIterator for &'a ChainedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::{collection::vec, prelude::*};
    use std::collections::HashMap;

    #[derive(Debug, Clone)]
    enum Op {
        Set(i32, u8),
        Delete(i32),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (-64..64_i32, any::<u8>()).prop_map(|(key, value)| Op::Set(key, value)),
            2 => (-64..64_i32).prop_map(Op::Delete),
        ]
    }

    proptest! {
        #[test]
        fn test_matches_std_model(ops in vec(op(), 0..400)) {
            let mut map = ChainedMap::new();
            let mut model = HashMap::new();

            for op in ops {
                match op {
                    Op::Set(key, value) => {
                        map.set(key, value);
                        model.insert(key, value);
                    }
                    Op::Delete(key) => {
                        let expected = model.remove(&key).ok_or(MapError::KeyNotFound);
                        prop_assert_eq!(map.remove(&key), expected);
                    }
                }

                prop_assert_eq!(map.len(), model.len());
                prop_assert_eq!(map.items().len(), map.len());
                prop_assert!(map.capacity() >= 10);
                prop_assert!(!map.policy().should_grow(map.len(), map.capacity()));
                prop_assert_eq!(map.bucket_lengths().sum::<usize>(), map.len());
            }

            for (key, value) in &model {
                prop_assert_eq!(map.get(key), Ok(value));
            }
        }

        #[test]
        fn test_projections_agree(pairs in vec((any::<i16>(), any::<u16>()), 0..200)) {
            let map = ChainedMap::from_pairs(pairs);
            let items = map.items();
            let keys = map.keys();
            let values = map.values();

            prop_assert_eq!(items.len(), map.len());
            prop_assert_eq!(keys.len(), items.len());
            prop_assert_eq!(values.len(), items.len());
            for ((key, value), (item_key, item_value)) in keys.iter().zip(&values).zip(&items) {
                prop_assert_eq!(key, item_key);
                prop_assert_eq!(value, item_value);
            }
        }

        #[test]
        fn test_colliding_keys_are_independent(base in -1000..1000_i64, a in any::<u8>(), b in any::<u8>()) {
            let mut map = ChainedMap::new();
            let other = base + 10;
            map.set(base, a);
            map.set(other, b);

            prop_assert_eq!(map.get(&base), Ok(&a));
            prop_assert_eq!(map.get(&other), Ok(&b));

            map.delete(&base).unwrap();
            prop_assert!(!map.contains(&base));
            prop_assert_eq!(map.get(&other), Ok(&b));
        }
    }
}
