// src/config/db.rs
// DOCUMENTATION: Restaurant store connection pool
// PURPOSE: Connect to PostgreSQL and confirm the restaurant tables exist

use crate::config::Config;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// Hide the password part of a connection string for logging
fn redact_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            let credentials = &url[scheme_end + 3..at];
            match credentials.find(':') {
                Some(colon) => format!(
                    "{}{}:***{}",
                    &url[..scheme_end + 3],
                    &credentials[..colon],
                    &url[at..]
                ),
                None => url.to_string(),
            }
        }
        _ => url.to_string(),
    }
}

/// Initialize PostgreSQL connection pool
/// DOCUMENTATION: Called once during application startup in main.rs.
/// A missing `restaurants` table is logged, not fatal: the service still
/// starts and every lookup reports the store as unavailable.
pub async fn init_db_pool(config: &Config) -> Result<PgPool, sqlx::Error> {
    log::info!("Initializing database pool: {}", redact_url(&config.database_url));

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connection_timeout))
        // Connection idle timeout (5 minutes)
        .idle_timeout(Duration::from_secs(300))
        // Connection lifetime (30 minutes before recycle)
        .max_lifetime(Duration::from_secs(1800))
        .connect(&config.database_url)
        .await?;

    let (has_restaurants,): (bool,) =
        sqlx::query_as("SELECT to_regclass('restaurants') IS NOT NULL")
            .fetch_one(&pool)
            .await?;

    if !has_restaurants {
        log::warn!("Table 'restaurants' not found - lookups will fail until it is created");
    }

    log::info!("Database pool initialized successfully");
    Ok(pool)
}
