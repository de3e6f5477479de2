// src/services/restaurant_service.rs
// DOCUMENTATION: Business logic for restaurant lookups
// PURPOSE: Intermediary between handlers and the geo cache / search aggregator

use crate::config::Config;
use crate::db::RestaurantSource;
use crate::errors::QEatsError;
use crate::models::{GetRestaurantsRequest, GetRestaurantsResponse};
use crate::services::{
    CacheBackend, GeoCache, SearchAggregator, SearchStrategy, ServingRadiusPolicy,
};
use chrono::NaiveTime;
use std::sync::Arc;
use std::time::Duration;

pub struct RestaurantService {
    geo_cache: GeoCache,
    aggregator: SearchAggregator,
    strategy: SearchStrategy,
}

impl RestaurantService {
    pub fn new(geo_cache: GeoCache, aggregator: SearchAggregator, strategy: SearchStrategy) -> Self {
        Self {
            geo_cache,
            aggregator,
            strategy,
        }
    }

    /// Wire the service from configuration and shared handles
    pub fn from_config(
        config: &Config,
        source: Arc<dyn RestaurantSource>,
        cache: Arc<dyn CacheBackend>,
    ) -> Self {
        let geo_cache = GeoCache::new(
            cache,
            Arc::clone(&source),
            config.geohash_precision,
            Duration::from_secs(config.cache_ttl_seconds),
        );
        let aggregator = SearchAggregator::new(source, config.search_workers);

        Self::new(geo_cache, aggregator, config.search_strategy)
    }

    /// Restaurants open and within the serving radius for `current_time`
    pub async fn find_all_restaurants_close_by(
        &self,
        request: &GetRestaurantsRequest,
        current_time: NaiveTime,
    ) -> Result<GetRestaurantsResponse, QEatsError> {
        let radius_km = ServingRadiusPolicy::radius_for(current_time);
        log::info!("Coverage radius: {} km", radius_km);

        let restaurants = self
            .geo_cache
            .find_nearby(request.latitude, request.longitude, current_time, radius_km)
            .await?;

        Ok(GetRestaurantsResponse { restaurants })
    }

    /// Free-text search across names, attributes and items
    pub async fn find_restaurants_by_search_query(
        &self,
        request: &GetRestaurantsRequest,
        current_time: NaiveTime,
    ) -> Result<GetRestaurantsResponse, QEatsError> {
        let radius_km = ServingRadiusPolicy::radius_for(current_time);
        log::info!("Coverage radius: {} km", radius_km);

        let text = request.search_for.as_deref().unwrap_or_default();
        let restaurants = self
            .aggregator
            .search(
                self.strategy,
                request.latitude,
                request.longitude,
                text,
                current_time,
                radius_km,
            )
            .await?;

        Ok(GetRestaurantsResponse { restaurants })
    }
}
