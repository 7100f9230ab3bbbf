//! Per-table partition listing cache.
//!
//! Entries are keyed by `database.table` and hold the sorted full-key list
//! behind an `Arc`, so every hit hands out the same listing. Without a TTL an
//! entry lives until it is invalidated or the cache is dropped; nothing
//! written through the client refreshes it.

use crate::catalog::types::PartitionKey;
use crate::config::CacheConfig;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared, immutable partition listing.
pub type PartitionListing = Arc<Vec<PartitionKey>>;

/// A cached value with expiration tracking.
#[derive(Debug, Clone)]
struct CachedValue<T> {
    value: T,
    cached_at: Instant,
    /// Time-to-live, `None` never expires
    ttl: Option<Duration>,
}

impl<T> CachedValue<T> {
    fn new(value: T, ttl: Option<Duration>) -> Self {
        Self {
            value,
            cached_at: Instant::now(),
            ttl,
        }
    }

    fn is_expired(&self) -> bool {
        self.ttl.is_some_and(|ttl| self.cached_at.elapsed() >= ttl)
    }
}

/// Cache statistics for monitoring.
#[derive(Debug, Default)]
pub struct CacheStats {
    /// Total cache hits
    pub hits: AtomicU64,
    /// Total cache misses
    pub misses: AtomicU64,
    /// Total invalidations
    pub invalidations: AtomicU64,
    /// Total refreshes
    pub refreshes: AtomicU64,
    /// Entries dropped to honour `max_tables`
    pub evictions: AtomicU64,
}

impl CacheStats {
    /// Get the hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    fn record_invalidation(&self) {
        self.invalidations.fetch_add(1, Ordering::Relaxed);
    }

    fn record_refresh(&self) {
        self.refreshes.fetch_add(1, Ordering::Relaxed);
    }

    fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }
}

/// Summary of cache state for monitoring.
#[derive(Debug, Clone)]
pub struct CacheSummary {
    /// Tables with a live (unexpired) listing
    pub cached_tables: usize,
    /// Partition keys held across live listings
    pub cached_partitions: usize,
    /// Current hit rate
    pub hit_rate: f64,
    /// Total cache hits
    pub total_hits: u64,
    /// Total cache misses
    pub total_misses: u64,
}

/// Partition listing cache.
///
/// Thread-safe cache using RwLock for concurrent read access
/// with exclusive write access for updates.
pub struct PartitionCache {
    ttl: Option<Duration>,
    max_tables: Option<usize>,
    entries: RwLock<HashMap<String, CachedValue<PartitionListing>>>,
    stats: CacheStats,
}

impl PartitionCache {
    /// Create a cache that keeps entries for its whole lifetime.
    pub fn new() -> Self {
        Self::with_config(&CacheConfig::default())
    }

    /// Create a cache with custom configuration.
    pub fn with_config(config: &CacheConfig) -> Self {
        Self {
            ttl: config.ttl(),
            max_tables: config.max_tables,
            entries: RwLock::new(HashMap::new()),
            stats: CacheStats::default(),
        }
    }

    /// Get the cached listing for a table if valid.
    pub fn get(&self, table_key: &str) -> Option<PartitionListing> {
        let guard = self.entries.read();
        if let Some(cached) = guard.get(table_key) {
            if !cached.is_expired() {
                self.stats.record_hit();
                return Some(Arc::clone(&cached.value));
            }
        }
        self.stats.record_miss();
        None
    }

    /// Store a listing and return the shared handle now in the cache.
    pub fn insert(&self, table_key: &str, partitions: Vec<PartitionKey>) -> PartitionListing {
        let listing = Arc::new(partitions);
        let mut guard = self.entries.write();

        guard.retain(|_, cached| !cached.is_expired());

        if let Some(max) = self.max_tables {
            while guard.len() >= max && !guard.contains_key(table_key) {
                let oldest = guard
                    .iter()
                    .min_by_key(|(_, cached)| cached.cached_at)
                    .map(|(key, _)| key.clone());
                match oldest {
                    Some(key) => {
                        guard.remove(&key);
                        self.stats.record_eviction();
                    }
                    None => break,
                }
            }
        }

        guard.insert(
            table_key.to_string(),
            CachedValue::new(Arc::clone(&listing), self.ttl),
        );
        self.stats.record_refresh();
        listing
    }

    /// Drop one table's listing. Returns whether an entry was present.
    pub fn invalidate(&self, table_key: &str) -> bool {
        let removed = self.entries.write().remove(table_key).is_some();
        if removed {
            self.stats.record_invalidation();
        }
        removed
    }

    /// Invalidate all cached data.
    pub fn invalidate_all(&self) {
        self.entries.write().clear();
        self.stats.record_invalidation();
    }

    /// Get cache statistics.
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Get a summary of cache state.
    pub fn summary(&self) -> CacheSummary {
        let guard = self.entries.read();
        let live = guard.values().filter(|c| !c.is_expired());
        let (cached_tables, cached_partitions) =
            live.fold((0, 0), |(tables, parts), c| (tables + 1, parts + c.value.len()));

        CacheSummary {
            cached_tables,
            cached_partitions,
            hit_rate: self.stats.hit_rate(),
            total_hits: self.stats.hits.load(Ordering::Relaxed),
            total_misses: self.stats.misses.load(Ordering::Relaxed),
        }
    }
}

impl Default for PartitionCache {
    fn default() -> Self {
        Self::new()
    }
}
