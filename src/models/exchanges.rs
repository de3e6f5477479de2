// src/models/exchanges.rs
// DOCUMENTATION: Request/response envelopes for the restaurants API
// PURPOSE: Parse and validate query strings, wrap result lists

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::RestaurantView;

/// Query parameters for GET /qeats/v1/restaurants
/// DOCUMENTATION: e.g. ?latitude=28.4900591&longitude=77.536386&searchFor=tamil
/// Coordinates are range-checked here so the geo layer never sees invalid input
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GetRestaurantsRequest {
    #[validate(custom = "finite_coordinate", range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(custom = "finite_coordinate", range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    /// Free text; when present the request becomes a search
    #[serde(rename = "searchFor")]
    pub search_for: Option<String>,
}

/// NaN slips past both range bounds, so it is rejected separately
fn finite_coordinate(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::new("finite"))
    }
}

#[cfg(test)]
impl GetRestaurantsRequest {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            search_for: None,
        }
    }

    pub fn with_search(mut self, search_for: impl Into<String>) -> Self {
        self.search_for = Some(search_for.into());
        self
    }
}

/// Response body for both nearby and search requests
#[derive(Debug, Serialize, Deserialize)]
pub struct GetRestaurantsResponse {
    pub restaurants: Vec<RestaurantView>,
}
