// src/db/repository.rs
// DOCUMENTATION: Database access layer - all SQL queries
// PURPOSE: Implement RestaurantSource on top of PostgreSQL

use crate::db::RestaurantSource;
use crate::errors::QEatsError;
use crate::models::{MenuItem, RestaurantRecord};
use async_trait::async_trait;
use chrono::NaiveTime;
use serde_json::Value;
use sqlx::{FromRow, PgPool};

/// Shared SELECT for every restaurant lookup
/// DOCUMENTATION: Menu items are folded into a JSON array per restaurant so a
/// single round-trip yields complete records. Rows without coordinates are
/// never returned.
const SELECT_RESTAURANTS: &str = r#"
    SELECT
        r.restaurant_id, r.name, r.city, r.image_url,
        r.latitude, r.longitude,
        r.opens_at, r.closes_at,
        COALESCE(r.attributes, ARRAY[]::TEXT[]) AS attributes,
        COALESCE(
            (SELECT json_agg(json_build_object(
                        'name', m.name,
                        'attributes', COALESCE(m.attributes, ARRAY[]::TEXT[]))
                    ORDER BY m.name)
             FROM menu_items m
             WHERE m.restaurant_id = r.restaurant_id),
            '[]'::json
        ) AS menu_items
    FROM restaurants r
    WHERE r.latitude IS NOT NULL AND r.longitude IS NOT NULL
"#;

/// Internal struct for mapping database rows to RestaurantRecord
#[derive(Debug, FromRow)]
struct RestaurantRow {
    pub restaurant_id: String,
    pub name: String,
    pub city: Option<String>,
    pub image_url: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub opens_at: NaiveTime,
    pub closes_at: NaiveTime,
    pub attributes: Vec<String>,
    pub menu_items: Value,
}

impl RestaurantRow {
    fn to_record(self) -> RestaurantRecord {
        let menu_items: Vec<MenuItem> = serde_json::from_value(self.menu_items)
            .unwrap_or_else(|e| {
                log::warn!(
                    "Ignoring unreadable menu for restaurant {}: {}",
                    self.restaurant_id,
                    e
                );
                Vec::new()
            });

        RestaurantRecord {
            restaurant_id: self.restaurant_id,
            name: self.name,
            city: self.city,
            image_url: self.image_url,
            latitude: self.latitude,
            longitude: self.longitude,
            opens_at: self.opens_at,
            closes_at: self.closes_at,
            attributes: self.attributes,
            menu_items,
        }
    }
}

/// Escape LIKE wildcards so user text matches literally
fn like_pattern(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// RestaurantRepository: All database operations for restaurants
/// DOCUMENTATION: Owns a pool handle so it can be shared as a trait object
#[derive(Clone)]
pub struct RestaurantRepository {
    pool: PgPool,
}

impl RestaurantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run SELECT_RESTAURANTS with an optional extra predicate bound to $1
    async fn fetch_where(
        &self,
        predicate: Option<&str>,
        arg: Option<String>,
        label: &str,
    ) -> Result<Vec<RestaurantRecord>, QEatsError> {
        let sql = match predicate {
            Some(p) => format!("{} AND {} ORDER BY r.restaurant_id", SELECT_RESTAURANTS, p),
            None => format!("{} ORDER BY r.restaurant_id", SELECT_RESTAURANTS),
        };

        let mut query = sqlx::query_as::<_, RestaurantRow>(&sql);
        if let Some(arg) = arg {
            query = query.bind(arg);
        }

        let rows = query.fetch_all(&self.pool).await.map_err(|e| {
            log::error!("Restaurant query '{}' failed: {}", label, e);
            QEatsError::SourceFetch(e.to_string())
        })?;

        log::debug!("Restaurant query '{}' returned {} rows", label, rows.len());
        Ok(rows.into_iter().map(|r| r.to_record()).collect())
    }
}

#[async_trait]
impl RestaurantSource for RestaurantRepository {
    async fn fetch_all(&self) -> Result<Vec<RestaurantRecord>, QEatsError> {
        self.fetch_where(None, None, "all").await
    }

    async fn fetch_by_name_exact(&self, text: &str) -> Result<Vec<RestaurantRecord>, QEatsError> {
        self.fetch_where(
            Some("LOWER(r.name) = LOWER($1)"),
            Some(text.to_string()),
            "name_exact",
        )
        .await
    }

    async fn fetch_by_name_containing(
        &self,
        text: &str,
    ) -> Result<Vec<RestaurantRecord>, QEatsError> {
        self.fetch_where(
            Some("r.name ILIKE $1"),
            Some(like_pattern(text)),
            "name_containing",
        )
        .await
    }

    async fn fetch_by_attribute_exact(
        &self,
        text: &str,
    ) -> Result<Vec<RestaurantRecord>, QEatsError> {
        self.fetch_where(
            Some("EXISTS (SELECT 1 FROM unnest(r.attributes) a WHERE LOWER(a) = LOWER($1))"),
            Some(text.to_string()),
            "attribute_exact",
        )
        .await
    }

    async fn fetch_by_attribute_containing(
        &self,
        text: &str,
    ) -> Result<Vec<RestaurantRecord>, QEatsError> {
        self.fetch_where(
            Some("EXISTS (SELECT 1 FROM unnest(r.attributes) a WHERE a ILIKE $1)"),
            Some(like_pattern(text)),
            "attribute_containing",
        )
        .await
    }
}
