// src/db/mod.rs
// DOCUMENTATION: Database module organization
// PURPOSE: Source-of-truth contract and its PostgreSQL implementation

pub mod repository;

pub use repository::*;

use crate::errors::QEatsError;
use crate::models::RestaurantRecord;
use async_trait::async_trait;

/// Source-of-truth for restaurant records
/// DOCUMENTATION: Every lookup returns a possibly-empty list, never an
/// optional list. Text matching is case-insensitive.
#[async_trait]
pub trait RestaurantSource: Send + Sync {
    /// Full scan of every record with usable coordinates
    async fn fetch_all(&self) -> Result<Vec<RestaurantRecord>, QEatsError>;

    async fn fetch_by_name_exact(&self, text: &str) -> Result<Vec<RestaurantRecord>, QEatsError>;

    async fn fetch_by_name_containing(
        &self,
        text: &str,
    ) -> Result<Vec<RestaurantRecord>, QEatsError>;

    /// Records having at least one attribute equal to `text`
    async fn fetch_by_attribute_exact(
        &self,
        text: &str,
    ) -> Result<Vec<RestaurantRecord>, QEatsError>;

    async fn fetch_by_attribute_containing(
        &self,
        text: &str,
    ) -> Result<Vec<RestaurantRecord>, QEatsError>;
}
