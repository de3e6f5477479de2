// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod cache;
pub mod geo_cache;
pub mod proximity;
pub mod restaurant_service;
pub mod search;
pub mod serving_radius;
pub mod spatial_key;

pub use cache::*;
pub use geo_cache::*;
pub use proximity::*;
pub use restaurant_service::*;
pub use search::*;
pub use serving_radius::*;
pub use spatial_key::*;
