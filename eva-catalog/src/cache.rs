//! Lookup cache for single-product requests.
//!
//! Bounded LRU map from composed keys to resources, with an optional maximum entry age.
//! Only id and handle lookups go through the cache; search always hits EVA.
//!
//! The cache is shared by concurrent lookups. Its lock is never held across a network
//! call, so two concurrent misses on the same key both fetch and the later insert wins.
//! Both inserts carry equivalent data.

use std::{
    fmt,
    num::NonZeroUsize,
    sync::{Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};

use lru::LruCache;
use tracing::debug;

use crate::resource::Resource;

/// Default maximum number of cached resources.
pub const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(512) {
    Some(capacity) => capacity,
    None => NonZeroUsize::MIN,
};

/// Key under which a lookup result is cached.
///
/// Id and handle lookups live in separate namespaces, so an entry stored by one is never
/// returned by the other even when the identifier is the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKey<'a> {
    /// Lookup by product id (`product-<id>`).
    ProductId(&'a str),
    /// Lookup by product handle (`product-handle-<handle>`).
    ProductHandle(&'a str),
}

impl fmt::Display for CacheKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProductId(id) => write!(f, "product-{id}"),
            Self::ProductHandle(handle) => write!(f, "product-handle-{handle}"),
        }
    }
}

#[derive(Debug)]
struct CachedResource {
    resource: Resource,
    stored_at: Instant,
}

/// Bounded resource cache.
///
/// # Examples
///
/// ```
/// use std::num::NonZeroUsize;
///
/// use eva_catalog::{
///     cache::{CacheKey, LookupCache},
///     resource::Resource,
/// };
///
/// let cache = LookupCache::new(NonZeroUsize::new(2).unwrap(), None);
/// let resource = Resource { id: "1".into(), title: "Tee".into(), handle: None, image: None };
///
/// cache.insert(CacheKey::ProductId("1"), resource.clone());
/// assert_eq!(cache.get(CacheKey::ProductId("1")), Some(resource));
/// assert_eq!(cache.get(CacheKey::ProductHandle("1")), None);
/// ```
#[derive(Debug)]
pub struct LookupCache {
    entries: Mutex<LruCache<String, CachedResource>>,
    ttl: Option<Duration>,
}

impl Default for LookupCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, None)
    }
}

impl LookupCache {
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// Entries older than `ttl` are treated as misses; `None` keeps entries until they
    /// are evicted by capacity.
    #[must_use]
    pub fn new(capacity: NonZeroUsize, ttl: Option<Duration>) -> Self {
        Self { entries: Mutex::new(LruCache::new(capacity)), ttl }
    }

    // Entries are replaced whole, so a poisoned map is still consistent.
    fn lock(&self) -> MutexGuard<'_, LruCache<String, CachedResource>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the cached resource, refreshing its recency.
    pub fn get(&self, key: CacheKey<'_>) -> Option<Resource> {
        let key = key.to_string();
        let mut entries = self.lock();

        let expired = match entries.peek(&key) {
            None => {
                debug!(%key, "cache miss");
                return None;
            }
            Some(entry) => self.ttl.is_some_and(|ttl| entry.stored_at.elapsed() >= ttl),
        };

        if expired {
            debug!(%key, "cache entry expired");
            entries.pop(&key);
            return None;
        }

        debug!(%key, "cache hit");
        entries.get(&key).map(|entry| entry.resource.clone())
    }

    /// Stores a resource, evicting the least recently used entry when full.
    pub fn insert(&self, key: CacheKey<'_>, resource: Resource) {
        let key = key.to_string();
        let mut entries = self.lock();
        if let Some((evicted, _)) =
            entries.push(key.clone(), CachedResource { resource, stored_at: Instant::now() })
            && evicted != key
        {
            debug!(key = %evicted, "cache entry evicted");
        }
    }

    /// Number of cached entries, including expired ones not yet dropped.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Maximum number of entries.
    #[must_use]
    pub fn capacity(&self) -> NonZeroUsize {
        self.lock().cap()
    }

    /// Maximum entry age, if any.
    #[must_use]
    pub const fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }
}


#[cfg(test)]
#[path = "cache/tests/proptest_cache.rs"]
mod proptest_cache;
