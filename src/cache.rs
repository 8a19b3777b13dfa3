//! Route resolution caching.
//!
//! This module provides [`ResolveCache`], an LRU cache of route table lookups
//! keyed by `(config, path)`. It is gated behind the `cache` feature flag and
//! uses the [`lru`] crate internally.
//!
//! Misses are cached too: an unmatched path keeps resolving to the not-found
//! page without re-scanning the table. Only the table match is cached; hooks
//! still run on every navigation, so nothing observable is skipped.
//!
//! [`CacheStats`] tracks hits, misses, and invalidations so you can monitor
//! cache effectiveness at runtime.
//!
//! # Examples
//!
//! ```
//! use frame_navigator::cache::ResolveCache;
//! use frame_navigator::ConfigId;
//!
//! let mut cache = ResolveCache::new();
//! assert!(cache.get(ConfigId::ROOT, "/about").is_none());
//! cache.insert(ConfigId::ROOT, "/about", None);
//!
//! assert_eq!(cache.get(ConfigId::ROOT, "/about"), Some(None));
//! assert_eq!(cache.stats().hits, 1);
//! assert_eq!(cache.stats().misses, 1);
//! ```

use crate::config::ConfigId;
use crate::pattern::PatternMatch;
use crate::{debug_log, trace_log};
use lru::LruCache;
use std::num::NonZeroUsize;

/// Cached outcome of matching a path: entry index and captures, or `None`.
pub type CachedMatch = Option<(usize, PatternMatch)>;

/// Counters tracking cache hit/miss rates and invalidations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of lookups answered from the cache.
    pub hits: usize,
    /// Number of lookups that had to scan the route table.
    pub misses: usize,
    /// Number of full cache invalidations (via [`ResolveCache::clear`]).
    pub invalidations: usize,
}

impl CacheStats {
    /// Return the hit rate as a value in `0.0..=1.0`.
    ///
    /// Returns `0.0` if no lookups have been performed.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU cache for route table matches.
///
/// Default capacity is 1000 entries. The session clears it whenever it is
/// (re)opened.
#[derive(Debug)]
pub struct ResolveCache {
    entries: LruCache<(ConfigId, String), CachedMatch>,
    stats: CacheStats,
}

impl ResolveCache {
    pub const DEFAULT_CAPACITY: usize = 1000;

    /// Create a cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a cache with a custom capacity. Zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(cap),
            stats: CacheStats::default(),
        }
    }

    /// Look up a cached match. The outer `Option` is `None` on a cache miss.
    pub fn get(&mut self, config: ConfigId, path: &str) -> Option<CachedMatch> {
        if let Some(entry) = self.entries.get(&(config, path.to_string())) {
            self.stats.hits += 1;
            trace_log!("Resolve cache hit for {} '{}'", config, path);
            Some(entry.clone())
        } else {
            self.stats.misses += 1;
            trace_log!("Resolve cache miss for {} '{}'", config, path);
            None
        }
    }

    pub fn insert(&mut self, config: ConfigId, path: &str, matched: CachedMatch) {
        self.entries.push((config, path.to_string()), matched);
    }

    /// Drop every entry and increment the invalidation counter.
    pub fn clear(&mut self) {
        let len = self.entries.len();
        self.entries.clear();
        self.stats.invalidations += 1;
        debug_log!(
            "Resolve cache cleared: {} entries removed ({} total invalidations, hit rate: {:.1}%)",
            len,
            self.stats.invalidations,
            self.stats.hit_rate() * 100.0
        );
    }

    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ResolveCache {
    fn default() -> Self {
        Self::new()
    }
}
