// src/services/serving_radius.rs
// DOCUMENTATION: Time-of-day serving radius
// PURPOSE: Shrink the delivery area during rush hours

use chrono::NaiveTime;

pub const PEAK_HOURS_RADIUS_KM: f64 = 3.0;
pub const NORMAL_HOURS_RADIUS_KM: f64 = 5.0;

/// Closed (start, end) windows as (hour, minute) pairs
const PEAK_WINDOWS: [((u32, u32), (u32, u32)); 3] = [
    ((8, 0), (10, 0)),
    ((13, 0), (14, 0)),
    ((19, 0), (21, 0)),
];

/// Serving radius policy
/// DOCUMENTATION: Times are already local to the caller; no zone handling
pub struct ServingRadiusPolicy;

impl ServingRadiusPolicy {
    /// True when `time` falls inside a peak window, both endpoints included
    pub fn is_peak_hour(time: NaiveTime) -> bool {
        PEAK_WINDOWS.iter().any(|&((sh, sm), (eh, em))| {
            let start = NaiveTime::from_hms_opt(sh, sm, 0);
            let end = NaiveTime::from_hms_opt(eh, em, 0);
            match (start, end) {
                (Some(start), Some(end)) => time >= start && time <= end,
                _ => false,
            }
        })
    }

    /// Effective search radius in kilometers for `time`
    pub fn radius_for(time: NaiveTime) -> f64 {
        if Self::is_peak_hour(time) {
            PEAK_HOURS_RADIUS_KM
        } else {
            NORMAL_HOURS_RADIUS_KM
        }
    }
}
