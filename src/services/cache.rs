// src/services/cache.rs
// DOCUMENTATION: Cache backend contract and the in-process TTL store
// PURPOSE: Hold serialized restaurant lists per spatial key

use crate::errors::CacheError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Spatial keys held at once unless configured otherwise
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// Cache-aside backend contract
/// DOCUMENTATION: Any call may fail with a connectivity error; callers must
/// degrade past it. Concurrent writers to one key are last-write-wins.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set_with_expiry(
        &self,
        key: &str,
        value: String,
        ttl: Duration,
    ) -> Result<(), CacheError>;

    /// Cheap health check, consulted once per query
    async fn is_available(&self) -> bool;
}

/// Cache entry with expiration
#[derive(Clone, Debug)]
struct CacheEntry<T> {
    data: T,
    expires_at: Instant,
}

impl<T> CacheEntry<T> {
    fn new(data: T, ttl: Duration) -> Self {
        Self {
            data,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// Process-wide geo cache store
/// DOCUMENTATION: Opened at startup and closed at shutdown. While closed,
/// every backend call fails with CacheError::Unavailable.
/// Each entry holds a whole candidate list, so the key count is capped at
/// `max_entries`.
pub struct GeoCacheStore {
    store: Arc<RwLock<HashMap<String, CacheEntry<String>>>>,
    default_ttl: Duration,
    max_entries: usize,
    evictions: AtomicU64,
    open: AtomicBool,
}

impl GeoCacheStore {
    /// Create an open store with default TTL
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            store: Arc::new(RwLock::new(HashMap::new())),
            default_ttl: Duration::from_secs(ttl_seconds),
            max_entries: DEFAULT_MAX_ENTRIES,
            evictions: AtomicU64::new(0),
            open: AtomicBool::new(true),
        }
    }

    /// Set the maximum number of spatial keys
    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = max.max(1);
        self
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    #[cfg(test)]
    pub fn open(&self) {
        self.open.store(true, Ordering::SeqCst);
        log::info!("Geo cache opened");
    }

    /// Stop serving; entries are kept but unreachable until reopened
    pub fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
        log::info!("Geo cache closed");
    }

    fn ensure_open(&self) -> Result<(), CacheError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(CacheError::Unavailable("geo cache is closed".to_string()))
        }
    }

    /// Get cached value
    pub async fn get_entry(&self, key: &str) -> Option<String> {
        let store = self.store.read().await;

        match store.get(key) {
            Some(entry) if !entry.is_expired() => {
                log::debug!("Cache HIT for key: {}", key);
                Some(entry.data.clone())
            }
            Some(_) => {
                log::debug!("Cache EXPIRED for key: {}", key);
                None
            }
            None => {
                log::debug!("Cache MISS for key: {}", key);
                None
            }
        }
    }

    /// Set cached value with default TTL
    #[cfg(test)]
    pub async fn set(&self, key: String, value: String) {
        self.set_with_ttl(key, value, self.default_ttl).await;
    }

    /// Set cached value with custom TTL
    /// DOCUMENTATION: A new key on a full store first drops expired entries,
    /// then the live entry closest to expiry
    pub async fn set_with_ttl(&self, key: String, value: String, ttl: Duration) {
        let mut store = self.store.write().await;

        if !store.contains_key(&key) && store.len() >= self.max_entries {
            store.retain(|_, entry| !entry.is_expired());

            if store.len() >= self.max_entries {
                let victim = store
                    .iter()
                    .min_by_key(|(_, entry)| entry.expires_at)
                    .map(|(k, _)| k.clone());
                if let Some(victim) = victim {
                    store.remove(&victim);
                    self.evictions.fetch_add(1, Ordering::Relaxed);
                    log::debug!("Cache EVICT for key: {}", victim);
                }
            }
        }

        log::debug!("Cache SET for key: {} (TTL: {}s)", key, ttl.as_secs());
        store.insert(key, CacheEntry::new(value, ttl));
    }

    /// Clear expired entries
    pub async fn cleanup(&self) {
        let mut store = self.store.write().await;
        let before_count = store.len();
        store.retain(|_, entry| !entry.is_expired());
        let after_count = store.len();

        if before_count > after_count {
            log::info!(
                "Cache cleanup: removed {} expired entries ({} remaining)",
                before_count - after_count,
                after_count
            );
        }
    }

    /// Get cache statistics
    pub async fn stats(&self) -> CacheStats {
        let store = self.store.read().await;
        let total = store.len();
        let expired = store.values().filter(|e| e.is_expired()).count();

        CacheStats {
            available: self.is_open(),
            total_entries: total,
            expired_entries: expired,
            active_entries: total - expired,
            max_entries: self.max_entries,
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    /// Clear all cache entries
    pub async fn clear(&self) -> usize {
        let mut store = self.store.write().await;
        let count = store.len();
        store.clear();
        log::info!("Cache cleared: {} entries removed", count);
        count
    }
}

#[async_trait]
impl CacheBackend for GeoCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.ensure_open()?;
        Ok(self.get_entry(key).await)
    }

    async fn set_with_expiry(
        &self,
        key: &str,
        value: String,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        self.ensure_open()?;
        self.set_with_ttl(key.to_string(), value, ttl).await;
        Ok(())
    }

    async fn is_available(&self) -> bool {
        self.is_open()
    }
}

/// Cache statistics
#[derive(Debug, Serialize, Deserialize)]
pub struct CacheStats {
    pub available: bool,
    pub total_entries: usize,
    pub expired_entries: usize,
    pub active_entries: usize,
    pub max_entries: usize,
    /// Live entries dropped to make room
    pub evictions: u64,
}

/// Start background cleanup task
/// DOCUMENTATION: Periodically removes expired entries
pub fn start_cleanup_task(cache: Arc<GeoCacheStore>, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds));

        loop {
            interval.tick().await;
            cache.cleanup().await;
        }
    });
}
