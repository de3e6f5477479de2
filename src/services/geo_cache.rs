// src/services/geo_cache.rs
// DOCUMENTATION: Cache-aside proximity lookup
// PURPOSE: Serve nearby restaurants from the geo cache, falling back to the store

use crate::db::RestaurantSource;
use crate::errors::{CacheError, QEatsError};
use crate::models::{RestaurantRecord, RestaurantView};
use crate::services::{CacheBackend, ProximityFilter, ProximityQuery, SpatialKey};
use chrono::NaiveTime;
use std::sync::Arc;
use std::time::Duration;

/// Cache-aside layer over the restaurant store
/// DOCUMENTATION: Entries hold the UNFILTERED candidate list for a spatial
/// key. Filtering always happens per query because it depends on the
/// caller's clock and radius, not only on the key.
pub struct GeoCache {
    backend: Arc<dyn CacheBackend>,
    source: Arc<dyn RestaurantSource>,
    precision: usize,
    ttl: Duration,
}

impl GeoCache {
    pub fn new(
        backend: Arc<dyn CacheBackend>,
        source: Arc<dyn RestaurantSource>,
        precision: usize,
        ttl: Duration,
    ) -> Self {
        Self {
            backend,
            source,
            precision,
            ttl,
        }
    }

    /// Restaurants open at `current_time` and strictly within `radius_km`
    ///
    /// Only a failing store makes this return an error; every cache problem
    /// degrades to a direct store read.
    pub async fn find_nearby(
        &self,
        latitude: f64,
        longitude: f64,
        current_time: NaiveTime,
        radius_km: f64,
    ) -> Result<Vec<RestaurantView>, QEatsError> {
        let key = SpatialKey::encode(latitude, longitude, self.precision);
        let candidates = self.load_candidates(&key).await?;

        let query = ProximityQuery::new(latitude, longitude, current_time, radius_km);
        let views = ProximityFilter::admitted_views(&candidates, &query);

        log::info!(
            "Nearby lookup {}: {} candidates, {} admitted (radius {} km)",
            key,
            candidates.len(),
            views.len(),
            radius_km
        );

        Ok(views)
    }

    async fn load_candidates(&self, key: &SpatialKey) -> Result<Vec<RestaurantRecord>, QEatsError> {
        if !self.backend.is_available().await {
            log::warn!("Geo cache unavailable, reading restaurants from store");
            return self.source.fetch_all().await;
        }

        match self.read_cached(key).await {
            Ok(Some(records)) => return Ok(records),
            Ok(None) => {}
            Err(CacheError::Unavailable(e)) => {
                log::warn!("Geo cache unreachable for {}: {}; skipping cache", key, e);
                return self.source.fetch_all().await;
            }
            Err(e) => {
                log::warn!("Geo cache read failed for {}: {}; treating as miss", key, e);
            }
        }

        let records = self.source.fetch_all().await?;
        self.write_back(key, &records).await;
        Ok(records)
    }

    async fn read_cached(
        &self,
        key: &SpatialKey,
    ) -> Result<Option<Vec<RestaurantRecord>>, CacheError> {
        match self.backend.get(key.as_str()).await? {
            Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }

    /// Failures are logged only; the caller is served regardless
    async fn write_back(&self, key: &SpatialKey, records: &[RestaurantRecord]) {
        let payload = match serde_json::to_string(records) {
            Ok(payload) => payload,
            Err(e) => {
                log::warn!("Could not serialize restaurants for {}: {}", key, e);
                return;
            }
        };

        if let Err(e) = self
            .backend
            .set_with_expiry(key.as_str(), payload, self.ttl)
            .await
        {
            log::warn!("Geo cache write failed for {}: {}", key, e);
        }
    }
}
