// src/services/spatial_key.rs
// DOCUMENTATION: Geohash encoding of coordinates into cache keys
// PURPOSE: Nearby origins share one cache entry; distant origins never do

use std::fmt;

/// Geohash alphabet (no a, i, l, o)
const BASE32: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// 7 characters gives cells of roughly 150m x 150m
pub const DEFAULT_PRECISION: usize = 7;

/// Longest geohash that still fits in 64 interleaved bits
pub const MAX_PRECISION: usize = 12;

/// Fixed-precision spatial cache key
/// DOCUMENTATION: Pure function of (latitude, longitude, precision). Callers
/// must range-check coordinates before encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpatialKey(String);

impl SpatialKey {
    /// Encode a coordinate pair as a geohash of `precision` characters
    ///
    /// Bits alternate longitude/latitude, longitude first, each bit halving
    /// the remaining interval. Every 5 bits become one base32 character.
    pub fn encode(latitude: f64, longitude: f64, precision: usize) -> Self {
        let mut lat_range = (-90.0_f64, 90.0_f64);
        let mut lon_range = (-180.0_f64, 180.0_f64);
        let mut hash = String::with_capacity(precision);

        let mut even_bit = true;
        let mut bits = 0;
        let mut index = 0usize;

        while hash.len() < precision {
            let (range, value) = if even_bit {
                (&mut lon_range, longitude)
            } else {
                (&mut lat_range, latitude)
            };

            let mid = (range.0 + range.1) / 2.0;
            index <<= 1;
            if value >= mid {
                index |= 1;
                range.0 = mid;
            } else {
                range.1 = mid;
            }

            even_bit = !even_bit;
            bits += 1;

            if bits == 5 {
                hash.push(BASE32[index] as char);
                bits = 0;
                index = 0;
            }
        }

        SpatialKey(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpatialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
