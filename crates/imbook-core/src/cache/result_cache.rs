//! In-memory result cache for resolved lookups
//!
//! Entries are whole `Vec<BookRecord>` snapshots written once and replaced on
//! the next `put`. Expiry is checked lazily on `get`; capacity is enforced on
//! `put` by evicting the least recently used entries until both the entry
//! count and the aggregate serialized size fit.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use lru::LruCache;

use crate::config::CacheConfig;
use crate::deduplication::normalize_query;
use crate::domain::BookRecord;

/// Cache key, partitioned by lookup kind
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Normalized ISBN; holds exactly one record
    Isbn(String),
    /// Lower-cased, whitespace-collapsed keyword query
    Query(String),
}

impl CacheKey {
    /// Key for an already normalized ISBN
    pub fn isbn(normalized_isbn: &str) -> Self {
        CacheKey::Isbn(normalized_isbn.to_string())
    }

    /// Key for a raw keyword query
    pub fn query(text: &str) -> Self {
        CacheKey::Query(normalize_query(text))
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Isbn(isbn) => write!(f, "isbn_{}", isbn),
            CacheKey::Query(query) => f.write_str(query),
        }
    }
}

#[derive(Debug)]
struct CacheEntry {
    records: Vec<BookRecord>,
    created_at: Instant,
    size_bytes: usize,
}

/// Recency-ordered entries plus their aggregate size
///
/// The `LruCache` itself is unbounded; count and byte bounds are enforced
/// together by [`ResultCache::evict`].
struct Inner {
    entries: LruCache<CacheKey, CacheEntry>,
    total_bytes: usize,
}

impl Inner {
    fn new() -> Self {
        Self {
            entries: LruCache::unbounded(),
            total_bytes: 0,
        }
    }

    fn remove(&mut self, key: &CacheKey) -> Option<CacheEntry> {
        let entry = self.entries.pop(key)?;
        self.total_bytes -= entry.size_bytes;
        Some(entry)
    }
}

/// Snapshot of cache counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
    pub total_bytes: usize,
}

/// Thread-safe TTL + LRU cache of resolved records
pub struct ResultCache {
    inner: Mutex<Inner>,
    ttl: Duration,
    max_entries: usize,
    max_bytes: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::from_config(&CacheConfig::default())
    }
}

impl ResultCache {
    pub fn new(ttl: Duration, max_entries: usize, max_bytes: usize) -> Self {
        Self {
            inner: Mutex::new(Inner::new()),
            ttl,
            max_entries,
            max_bytes,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.ttl(), config.max_entries, config.max_bytes)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up a key, evicting it if it has outlived the TTL
    pub fn get(&self, key: &CacheKey) -> Option<Vec<BookRecord>> {
        let mut inner = self.lock();

        let fresh = match inner.entries.peek(key) {
            Some(entry) => entry.created_at.elapsed() < self.ttl,
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
        };

        if !fresh {
            inner.remove(key);
            self.misses.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(key = %key, "cache entry expired");
            return None;
        }

        self.hits.fetch_add(1, Ordering::Relaxed);
        // `get` promotes the entry to most recently used
        inner.entries.get(key).map(|entry| entry.records.clone())
    }

    /// Store records under a key, replacing any previous entry
    pub fn put(&self, key: CacheKey, records: Vec<BookRecord>) {
        let size_bytes = serialized_size(&records);
        let mut inner = self.lock();
        inner.remove(&key);

        if size_bytes > self.max_bytes {
            tracing::debug!(key = %key, size_bytes, max_bytes = self.max_bytes, "entry exceeds cache size bound, not cached");
            return;
        }

        inner.total_bytes += size_bytes;
        inner.entries.put(
            key,
            CacheEntry {
                records,
                created_at: Instant::now(),
                size_bytes,
            },
        );

        self.evict(&mut inner);
    }

    /// Pop least recently used entries until both bounds hold
    fn evict(&self, inner: &mut Inner) {
        while inner.entries.len() > self.max_entries || inner.total_bytes > self.max_bytes {
            let Some((victim, entry)) = inner.entries.pop_lru() else {
                break;
            };
            inner.total_bytes -= entry.size_bytes;
            tracing::debug!(key = %victim, "evicted least recently used cache entry");
        }
    }

    /// Creation time of a live entry, ignoring expiry
    pub fn created_at(&self, key: &CacheKey) -> Option<Instant> {
        self.lock().entries.peek(key).map(|entry| entry.created_at)
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.lock().entries.contains(key)
    }

    /// Drop every expired entry
    pub fn purge_expired(&self) -> usize {
        let mut inner = self.lock();
        let expired: Vec<CacheKey> = inner
            .entries
            .iter()
            .filter(|(_, entry)| entry.created_at.elapsed() >= self.ttl)
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            inner.remove(key);
        }
        expired.len()
    }

    pub fn clear(&self) {
        *self.lock() = Inner::new();
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn total_bytes(&self) -> usize {
        self.lock().total_bytes
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: inner.entries.len(),
            total_bytes: inner.total_bytes,
        }
    }
}

/// Serialized JSON size of a record list
pub fn serialized_size(records: &[BookRecord]) -> usize {
    serde_json::to_vec(records).map(|bytes| bytes.len()).unwrap_or(0)
}
