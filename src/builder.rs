//! Runtime policy selection.
//!
//! [`CacheBuilder`] produces a [`Cache`] that hides which engine sits
//! behind it, so callers can pick LRU or LFU from configuration.
//!
//! ## Example
//!
//! ```rust
//! use twincache::builder::{CacheBuilder, CacheConfig, CachePolicy};
//! use twincache::traits::CoreCache;
//!
//! let mut cache = CacheBuilder::new(100).build::<u64, String>();
//! assert_eq!(cache.policy(), CachePolicy::Lru);
//! cache.put(1, "hello".to_string());
//! assert_eq!(cache.get(&1), Some(&"hello".to_string()));
//!
//! let config = CacheConfig {
//!     capacity: 2,
//!     policy: "lfu".parse().unwrap(),
//! };
//! let cache = CacheBuilder::from_config(&config).build::<u64, u64>();
//! assert_eq!(cache.policy(), CachePolicy::Lfu);
//! ```

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use tracing::debug;

use crate::error::{ConfigError, capacity_from};
use crate::policy::lfu::LfuCache;
use crate::policy::lru::LruCache;
use crate::traits::CoreCache;

/// Available eviction policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Least Recently Used eviction.
    #[default]
    Lru,
    /// Least Frequently Used eviction, LRU among equal frequencies.
    Lfu,
}

impl fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CachePolicy::Lru => f.write_str("lru"),
            CachePolicy::Lfu => f.write_str("lfu"),
        }
    }
}

impl FromStr for CachePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lru" => Ok(CachePolicy::Lru),
            "lfu" => Ok(CachePolicy::Lfu),
            other => Err(ConfigError::new(format!(
                "unknown cache policy {other:?}, expected \"lru\" or \"lfu\""
            ))),
        }
    }
}

/// Plain settings for building a cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    pub capacity: usize,
    pub policy: CachePolicy,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            policy: CachePolicy::Lru,
        }
    }
}

/// Cache wrapper with a policy chosen at runtime.
pub struct Cache<K, V> {
    inner: CacheInner<K, V>,
}

enum CacheInner<K, V> {
    Lru(LruCache<K, V>),
    Lfu(LfuCache<K, V>),
}

impl<K, V> Cache<K, V> {
    /// Returns the policy of the wrapped engine.
    pub fn policy(&self) -> CachePolicy {
        match &self.inner {
            CacheInner::Lru(_) => CachePolicy::Lru,
            CacheInner::Lfu(_) => CachePolicy::Lfu,
        }
    }
}

impl<K, V> CoreCache<K, V> for Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn get(&mut self, key: &K) -> Option<&V> {
        match &mut self.inner {
            CacheInner::Lru(lru) => lru.get(key),
            CacheInner::Lfu(lfu) => lfu.get(key),
        }
    }

    fn put(&mut self, key: K, value: V) {
        match &mut self.inner {
            CacheInner::Lru(lru) => lru.put(key, value),
            CacheInner::Lfu(lfu) => lfu.put(key, value),
        }
    }

    fn peek(&self, key: &K) -> Option<&V> {
        match &self.inner {
            CacheInner::Lru(lru) => lru.peek(key),
            CacheInner::Lfu(lfu) => lfu.peek(key),
        }
    }

    fn contains(&self, key: &K) -> bool {
        match &self.inner {
            CacheInner::Lru(lru) => lru.contains(key),
            CacheInner::Lfu(lfu) => lfu.contains(key),
        }
    }

    fn len(&self) -> usize {
        match &self.inner {
            CacheInner::Lru(lru) => lru.len(),
            CacheInner::Lfu(lfu) => lfu.len(),
        }
    }

    fn capacity(&self) -> usize {
        match &self.inner {
            CacheInner::Lru(lru) => lru.capacity(),
            CacheInner::Lfu(lfu) => lfu.capacity(),
        }
    }
}

impl<K, V> fmt::Debug for Cache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            CacheInner::Lru(lru) => f.debug_tuple("Cache").field(lru).finish(),
            CacheInner::Lfu(lfu) => f.debug_tuple("Cache").field(lfu).finish(),
        }
    }
}

/// Builder for creating cache instances.
///
/// Defaults to [`CachePolicy::Lru`] unless a policy is set or taken from a
/// [`CacheConfig`].
#[derive(Debug, Clone, Copy)]
pub struct CacheBuilder {
    capacity: usize,
    policy: CachePolicy,
}

impl CacheBuilder {
    /// Create a new cache builder with the specified capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            policy: CachePolicy::default(),
        }
    }

    /// Like [`CacheBuilder::new`], but accepts any integer type.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for negative capacities.
    pub fn try_new<C>(capacity: C) -> Result<Self, ConfigError>
    where
        C: TryInto<usize> + Copy + fmt::Display,
    {
        Ok(Self::new(capacity_from(capacity)?))
    }

    /// Takes both capacity and policy from `config`.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self {
            capacity: config.capacity,
            policy: config.policy,
        }
    }

    pub fn policy(mut self, policy: CachePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Build a cache with the configured policy.
    ///
    /// ```rust
    /// use twincache::builder::{CacheBuilder, CachePolicy};
    /// use twincache::traits::CoreCache;
    ///
    /// let lru = CacheBuilder::new(100).build::<u64, String>();
    /// let lfu = CacheBuilder::new(100)
    ///     .policy(CachePolicy::Lfu)
    ///     .build::<u64, String>();
    /// assert_eq!(lru.capacity(), lfu.capacity());
    /// assert_eq!(lfu.policy(), CachePolicy::Lfu);
    /// ```
    pub fn build<K, V>(self) -> Cache<K, V>
    where
        K: Eq + Hash + Clone,
    {
        debug!(policy = %self.policy, capacity = self.capacity, "building cache");
        let inner = match self.policy {
            CachePolicy::Lru => CacheInner::Lru(LruCache::new(self.capacity)),
            CachePolicy::Lfu => CacheInner::Lfu(LfuCache::new(self.capacity)),
        };

        Cache { inner }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLICIES: [CachePolicy; 2] = [CachePolicy::Lru, CachePolicy::Lfu];

    #[test]
    fn test_all_policies_basic_ops() {
        for policy in POLICIES {
            let mut cache = CacheBuilder::new(10).policy(policy).build::<u64, String>();
            assert_eq!(cache.policy(), policy);

            cache.put(1, "one".to_string());
            cache.put(2, "two".to_string());

            assert_eq!(cache.get(&1), Some(&"one".to_string()));
            assert_eq!(cache.get(&2), Some(&"two".to_string()));
            assert_eq!(cache.get(&3), None);

            assert!(cache.contains(&1));
            assert!(!cache.contains(&99));

            assert_eq!(cache.len(), 2);
            assert!(!cache.is_empty());

            cache.put(1, "ONE".to_string());
            assert_eq!(cache.peek(&1), Some(&"ONE".to_string()));
            assert_eq!(cache.len(), 2);
        }
    }

    #[test]
    fn test_capacity_enforcement() {
        let mut cache = CacheBuilder::new(2)
            .policy(CachePolicy::Lru)
            .build::<u64, String>();

        cache.put(1, "one".to_string());
        cache.put(2, "two".to_string());
        cache.put(3, "three".to_string()); // Should evict key 1

        assert_eq!(cache.len(), 2);
        assert!(!cache.contains(&1));
        assert!(cache.contains(&2));
        assert!(cache.contains(&3));
    }

    #[test]
    fn test_policies_pick_different_victims() {
        let mut lru = CacheBuilder::new(2)
            .policy(CachePolicy::Lru)
            .build::<u8, u8>();
        let mut lfu = CacheBuilder::new(2)
            .policy(CachePolicy::Lfu)
            .build::<u8, u8>();
        for cache in [&mut lru, &mut lfu] {
            cache.put(1, 1);
            cache.get(&1);
            cache.get(&1);
            cache.put(2, 2);
            cache.get(&2);
            cache.put(3, 3);
        }
        assert!(!lru.contains(&1));
        assert!(lfu.contains(&1));
        assert!(!lfu.contains(&2));
    }

    #[test]
    fn test_from_config_selects_configured_policy() {
        let config = CacheConfig {
            capacity: 2,
            policy: CachePolicy::Lfu,
        };
        let mut cache = CacheBuilder::from_config(&config).build::<u8, u8>();
        assert_eq!(cache.policy(), CachePolicy::Lfu);
        assert_eq!(cache.capacity(), 2);

        // LFU keeps the twice-read key where LRU would drop it
        cache.put(1, 1);
        cache.get(&1);
        cache.put(2, 2);
        cache.put(3, 3);
        assert!(cache.contains(&1));
        assert!(!cache.contains(&2));
    }

    #[test]
    fn test_policy_setter_overrides_config() {
        let config = CacheConfig {
            capacity: 4,
            policy: CachePolicy::Lfu,
        };
        let cache = CacheBuilder::from_config(&config)
            .policy(CachePolicy::Lru)
            .build::<u8, u8>();
        assert_eq!(cache.policy(), CachePolicy::Lru);
        assert_eq!(cache.capacity(), 4);
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("lru".parse::<CachePolicy>(), Ok(CachePolicy::Lru));
        assert_eq!(" LFU ".parse::<CachePolicy>(), Ok(CachePolicy::Lfu));
        assert!("arc".parse::<CachePolicy>().is_err());
        for policy in POLICIES {
            assert_eq!(policy.to_string().parse::<CachePolicy>(), Ok(policy));
        }
    }

    #[test]
    fn test_config_and_try_new() {
        let config = CacheConfig::default();
        assert_eq!(config.capacity, 1000);
        assert_eq!(config.policy, CachePolicy::Lru);

        let cache = CacheBuilder::from_config(&config).build::<u8, u8>();
        assert_eq!(cache.capacity(), 1000);
        assert_eq!(cache.policy(), CachePolicy::Lru);

        assert!(CacheBuilder::try_new(-5).is_err());
        let cache = CacheBuilder::try_new(0u64)
            .unwrap()
            .policy(CachePolicy::Lfu)
            .build::<u8, u8>();
        assert_eq!(cache.capacity(), 0);
        assert!(format!("{cache:?}").starts_with("Cache(LfuCache"));
    }
}
