//! Error type shared by every fallible `ChainedMap` operation

use thiserror::Error;

/// Errors returned by [`ChainedMap`](crate::ChainedMap) and
/// [`ResizePolicy`](crate::ResizePolicy)
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MapError {
    /// The requested key has no mapping
    #[error("key not found")]
    KeyNotFound,

    /// A resize policy was rejected at construction
    #[error("invalid resize policy: {0}")]
    InvalidPolicy(&'static str),
}

/// Result alias used throughout the crate
pub type Result<T, E = MapError> = std::result::Result<T, E>;
