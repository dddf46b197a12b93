use log::debug;
use lru::LruCache;
use parking_lot::Mutex;
use std::fmt;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    #[error("cache unavailable: {0}")]
    Unavailable(String),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Cache key for an "open at" query. Built from the query text as received, so
/// the same instant string always lands on the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn for_instant(raw: &str) -> Self {
        Self(format!("open:{}", raw.trim()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Memoizes open-entity lists per query instant.
pub trait QueryCache: Send + Sync {
    fn get(&self, key: &CacheKey) -> CacheResult<Option<Vec<String>>>;
    fn put(&self, key: &CacheKey, names: &[String]) -> CacheResult<()>;
    fn invalidate_all(&self) -> CacheResult<()>;
}

struct CachedNames {
    names: Vec<String>,
    stored_at: Instant,
}

/// In-process cache: least-recently-used eviction plus a per-entry TTL.
pub struct MemoryQueryCache {
    entries: Mutex<LruCache<CacheKey, CachedNames>>,
    ttl: Duration,
}

impl MemoryQueryCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryQueryCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL)
    }
}

impl QueryCache for MemoryQueryCache {
    fn get(&self, key: &CacheKey) -> CacheResult<Option<Vec<String>>> {
        let mut entries = self.entries.lock();
        let expired = match entries.get(key) {
            Some(cached) if cached.stored_at.elapsed() < self.ttl => {
                return Ok(Some(cached.names.clone()));
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            debug!("cache entry {key} expired");
            entries.pop(key);
        }
        Ok(None)
    }

    fn put(&self, key: &CacheKey, names: &[String]) -> CacheResult<()> {
        self.entries.lock().put(
            key.clone(),
            CachedNames {
                names: names.to_vec(),
                stored_at: Instant::now(),
            },
        );
        Ok(())
    }

    fn invalidate_all(&self) -> CacheResult<()> {
        self.entries.lock().clear();
        Ok(())
    }
}
