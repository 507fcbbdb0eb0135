//! Hashing capability required of `ChainedMap` keys
//!
//! Keys produce a signed 64-bit hash. Integer keys hash to their own value so
//! small integers land in predictable buckets; everything else is mixed
//! through std's `DefaultHasher`, which is deterministic across runs.

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

/// A total, deterministic hash over a key.
///
/// The value may be negative; [`ChainedMap`](crate::ChainedMap) normalizes it
/// into the bucket range itself. Implementations must agree with `Eq`: equal
/// keys hash equally. Types related through [`Borrow`](std::borrow::Borrow)
/// (`String` and `str`, `Box<T>` and `T`) must hash identically so borrowed
/// lookups find owned keys.
pub trait KeyHash {
    /// Returns the hash of `self`
    fn key_hash(&self) -> i64;
}

/// Integers narrower than 64 bits widen losslessly
macro_rules! widening_key_hash {
    ($($ty:ty),* $(,)?) => {
        $(
            impl KeyHash for $ty {
                fn key_hash(&self) -> i64 {
                    i64::from(*self)
                }
            }
        )*
    };
}

/// Integers at least as wide as 64 bits wrap into `i64`
macro_rules! wrapping_key_hash {
    ($($ty:ty),* $(,)?) => {
        $(
            impl KeyHash for $ty {
                #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                fn key_hash(&self) -> i64 {
                    *self as i64
                }
            }
        )*
    };
}

widening_key_hash!(i8, i16, i32, u8, u16, u32);
wrapping_key_hash!(u64, usize, isize, i128, u128);

impl KeyHash for i64 {
    fn key_hash(&self) -> i64 {
        *self
    }
}

impl KeyHash for bool {
    fn key_hash(&self) -> i64 {
        i64::from(*self)
    }
}

impl KeyHash for char {
    fn key_hash(&self) -> i64 {
        i64::from(u32::from(*self))
    }
}

impl KeyHash for () {
    fn key_hash(&self) -> i64 {
        0
    }
}

impl KeyHash for str {
    fn key_hash(&self) -> i64 {
        std_hash(self)
    }
}

impl KeyHash for String {
    fn key_hash(&self) -> i64 {
        self.as_str().key_hash()
    }
}

impl<T: KeyHash + ?Sized> KeyHash for &T {
    fn key_hash(&self) -> i64 {
        (**self).key_hash()
    }
}

impl<T: KeyHash + ?Sized> KeyHash for Box<T> {
    fn key_hash(&self) -> i64 {
        (**self).key_hash()
    }
}

impl<T: KeyHash> KeyHash for Option<T> {
    fn key_hash(&self) -> i64 {
        self.as_ref().map_or(0, KeyHash::key_hash)
    }
}

impl<T: KeyHash> KeyHash for [T] {
    fn key_hash(&self) -> i64 {
        self.iter().fold(0, |acc, item| combine(acc, item.key_hash()))
    }
}

impl<T: KeyHash> KeyHash for Vec<T> {
    fn key_hash(&self) -> i64 {
        self.as_slice().key_hash()
    }
}

impl<A: KeyHash, B: KeyHash> KeyHash for (A, B) {
    fn key_hash(&self) -> i64 {
        combine(self.0.key_hash(), self.1.key_hash())
    }
}

impl<A: KeyHash, B: KeyHash, C: KeyHash> KeyHash for (A, B, C) {
    fn key_hash(&self) -> i64 {
        combine(combine(self.0.key_hash(), self.1.key_hash()), self.2.key_hash())
    }
}

/// Adapts any [`Hash`] type into a map key.
///
/// ```rust
/// use chained_map::{ChainedMap, Hashed};
///
/// #[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// let mut map = ChainedMap::new();
/// map.set(Hashed(Point { x: 1, y: 2 }), "a");
/// assert_eq!(map.get(&Hashed(Point { x: 1, y: 2 })), Ok(&"a"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Hashed<T>(pub T);

impl<T: Hash> KeyHash for Hashed<T> {
    fn key_hash(&self) -> i64 {
        std_hash(&self.0)
    }
}

/// Hashes through `DefaultHasher` and reinterprets the bits as signed
#[allow(clippy::cast_possible_wrap)]
fn std_hash<T: Hash + ?Sized>(value: &T) -> i64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish() as i64
}

/// Order-dependent mix of two hashes
fn combine(acc: i64, next: i64) -> i64 {
    acc.wrapping_mul(31).wrapping_add(next)
}
