// src/config/cache.rs
// DOCUMENTATION: Geo cache handle initialization
// PURPOSE: Open the process-wide cache at startup and schedule expiry sweeps

use crate::config::Config;
use crate::services::{start_cleanup_task, GeoCacheStore};
use std::sync::Arc;

/// Initialize the geo cache
/// DOCUMENTATION: Called once during application startup in main.rs.
/// main closes the returned handle after the server stops.
pub fn init_cache(config: &Config) -> Arc<GeoCacheStore> {
    let cache = Arc::new(
        GeoCacheStore::new(config.cache_ttl_seconds).with_max_entries(config.cache_max_entries),
    );
    log::info!(
        "Initialized geo cache (TTL: {}s, max keys: {}, geohash precision: {})",
        config.cache_ttl_seconds,
        config.cache_max_entries,
        config.geohash_precision
    );

    start_cleanup_task(cache.clone(), config.cache_cleanup_interval);
    log::info!(
        "Started cache cleanup task (interval: {}s)",
        config.cache_cleanup_interval
    );

    cache
}
