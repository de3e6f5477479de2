// src/services/proximity.rs
// DOCUMENTATION: Open-now and within-radius admission
// PURPOSE: Decide which candidate records a caller may see

use crate::models::{RestaurantRecord, RestaurantView};
use chrono::NaiveTime;
use geo_types::Point;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Per-request admission criteria
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub current_time: NaiveTime,
    pub radius_km: f64,
}

impl ProximityQuery {
    pub fn new(latitude: f64, longitude: f64, current_time: NaiveTime, radius_km: f64) -> Self {
        Self {
            latitude,
            longitude,
            current_time,
            radius_km,
        }
    }

    pub fn admits(&self, record: &RestaurantRecord) -> bool {
        ProximityFilter::is_admitted(
            record,
            self.current_time,
            self.latitude,
            self.longitude,
            self.radius_km,
        )
    }
}

/// Admission filter
pub struct ProximityFilter;

impl ProximityFilter {
    /// Open strictly after opening and strictly before closing.
    /// Hours that wrap past midnight (opens_at > closes_at) never match.
    pub fn is_open_now(record: &RestaurantRecord, time: NaiveTime) -> bool {
        time > record.opens_at && time < record.closes_at
    }

    /// Calculate distance between two points in kilometers
    /// Uses Haversine formula
    pub fn distance_km(from: Point<f64>, to: Point<f64>) -> f64 {
        let (lat1, lon1) = (from.y(), from.x());
        let (lat2, lon2) = (to.y(), to.x());

        let d_lat = (lat2 - lat1).to_radians();
        let d_lon = (lon2 - lon1).to_radians();

        let a = (d_lat / 2.0).sin().powi(2)
            + (lat1.to_radians().cos()) * (lat2.to_radians().cos()) * (d_lon / 2.0).sin().powi(2);

        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c
    }

    /// Open now AND strictly closer than `radius_km`
    pub fn is_admitted(
        record: &RestaurantRecord,
        current_time: NaiveTime,
        origin_lat: f64,
        origin_lon: f64,
        radius_km: f64,
    ) -> bool {
        if !Self::is_open_now(record, current_time) {
            return false;
        }

        Self::distance_km(Point::new(origin_lon, origin_lat), record.location()) < radius_km
    }

    /// Filter then project, keeping input order
    pub fn admitted_views(records: &[RestaurantRecord], query: &ProximityQuery) -> Vec<RestaurantView> {
        records
            .iter()
            .filter(|r| query.admits(r))
            .map(|r| r.to_view())
            .collect()
    }
}
