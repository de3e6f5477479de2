// src/models/restaurant.rs
// DOCUMENTATION: Core data structures for restaurants
// PURPOSE: Store records, cached payloads and the caller-facing projection

use chrono::NaiveTime;
use geo_types::Point;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A dish served by a restaurant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub name: String,

    /// Free-form tags such as "spicy" or "vegan"
    #[serde(default)]
    pub attributes: Vec<String>,
}

/// Represents a complete restaurant record from the store
/// DOCUMENTATION: Read-only to this service. This is also the shape that is
/// serialized into the geo cache, so every field must round-trip through JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantRecord {
    /// Unique identifier
    pub restaurant_id: String,

    pub name: String,

    pub city: Option<String>,

    pub image_url: Option<String>,

    /// Degrees, WGS84
    pub latitude: f64,
    pub longitude: f64,

    /// Local time of day, no date component
    pub opens_at: NaiveTime,
    pub closes_at: NaiveTime,

    /// Cuisine tags, in store order
    #[serde(default)]
    pub attributes: Vec<String>,

    #[serde(default)]
    pub menu_items: Vec<MenuItem>,
}

impl RestaurantRecord {
    /// Position as a geo point (x = longitude, y = latitude)
    pub fn location(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }

    /// Convert RestaurantRecord to RestaurantView for API
    /// DOCUMENTATION: Explicit field-by-field projection; menu items stay internal
    pub fn to_view(&self) -> RestaurantView {
        RestaurantView {
            restaurant_id: self.restaurant_id.clone(),
            name: self.name.clone(),
            city: self.city.clone(),
            image_url: self.image_url.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            opens_at: self.opens_at,
            closes_at: self.closes_at,
            attributes: self.attributes.clone(),
        }
    }
}

/// Response DTO for a single restaurant
/// DOCUMENTATION: Immutable per-request projection of RestaurantRecord.
/// Two views are the same restaurant iff their identifiers match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantView {
    pub restaurant_id: String,
    pub name: String,
    pub city: Option<String>,
    pub image_url: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub opens_at: NaiveTime,
    pub closes_at: NaiveTime,
    pub attributes: Vec<String>,
}

impl PartialEq for RestaurantView {
    fn eq(&self, other: &Self) -> bool {
        self.restaurant_id == other.restaurant_id
    }
}

impl Eq for RestaurantView {}

impl Hash for RestaurantView {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.restaurant_id.hash(state);
    }
}
