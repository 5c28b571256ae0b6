//! Error types for the twincache library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when cache construction parameters are invalid
//!   (negative capacity, unknown policy name).
//! - [`InvariantError`]: Returned by `check_invariants` methods when an
//!   internal structure is inconsistent.
//!
//! Lookups never fail: a miss is `None`, not an error.
//!
//! ## Example Usage
//!
//! ```
//! use twincache::error::ConfigError;
//! use twincache::policy::lru::LruCache;
//!
//! let cache: Result<LruCache<u64, String>, ConfigError> = LruCache::try_new(16);
//! assert!(cache.is_ok());
//!
//! let bad = LruCache::<u64, String>::try_new(-1);
//! assert!(bad.is_err());
//! ```

use thiserror::Error;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal cache invariants are violated.
///
/// Produced by `check_invariants` on the data structures and engines
/// (e.g. [`LruCache::check_invariants`](crate::policy::lru::LruCache::check_invariants)).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache configuration parameters are invalid.
///
/// Produced by fallible constructors such as
/// [`LfuCache::try_new`](crate::policy::lfu::LfuCache::try_new) and
/// [`CachePolicy::from_str`](crate::builder::CachePolicy).
///
/// # Example
///
/// ```
/// use twincache::policy::lfu::LfuCache;
///
/// let err = LfuCache::<u64, u64>::try_new(-5i64).unwrap_err();
/// assert!(err.to_string().contains("capacity"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Converts a caller-supplied capacity into `usize`, rejecting negative or
/// unrepresentable values.
pub(crate) fn capacity_from<C>(capacity: C) -> Result<usize, ConfigError>
where
    C: TryInto<usize> + Copy + std::fmt::Display,
{
    capacity.try_into().map_err(|_| {
        ConfigError::new(format!(
            "capacity must be a non-negative integer that fits in usize, got {capacity}"
        ))
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- InvariantError ---------------------------------------------------

    #[test]
    fn invariant_display_shows_message() {
        let err = InvariantError::new("list length mismatch");
        assert_eq!(err.to_string(), "list length mismatch");
    }

    #[test]
    fn invariant_message_accessor() {
        let err = InvariantError::new("test");
        assert_eq!(err.message(), "test");
    }

    #[test]
    fn invariant_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<InvariantError>();
    }

    // -- ConfigError ------------------------------------------------------

    #[test]
    fn config_display_shows_message() {
        let err = ConfigError::new("unknown policy");
        assert_eq!(err.to_string(), "unknown policy");
    }

    #[test]
    fn config_clone_and_eq() {
        let a = ConfigError::new("x");
        let b = a.clone();
        assert_eq!(a, b);
    }

    #[test]
    fn config_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<ConfigError>();
    }

    // -- capacity_from ----------------------------------------------------

    #[test]
    fn capacity_from_accepts_non_negative() {
        assert_eq!(capacity_from(0i32), Ok(0));
        assert_eq!(capacity_from(42i64), Ok(42));
        assert_eq!(capacity_from(7usize), Ok(7));
    }

    #[test]
    fn capacity_from_rejects_negative() {
        let err = capacity_from(-1i32).unwrap_err();
        assert!(err.message().contains("capacity"));
        assert!(err.message().contains("-1"));
    }
}
