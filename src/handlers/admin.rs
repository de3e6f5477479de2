// src/handlers/admin.rs
// DOCUMENTATION: Admin handlers for geo cache maintenance
// PURPOSE: Inspect and flush the cache without restarting the service

use crate::config::Config;
use crate::errors::QEatsError;
use crate::services::GeoCacheStore;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::Serialize;
use std::sync::Arc;

/// Response for cache flush endpoint
#[derive(Debug, Serialize)]
pub struct CacheClearResponse {
    pub message: String,
    pub entries_removed: usize,
}

/// GET /admin/cache/stats
/// Entry counts and availability of the geo cache
pub async fn cache_stats(
    config: web::Data<Config>,
    cache: web::Data<Arc<GeoCacheStore>>,
    req: HttpRequest,
) -> Result<impl Responder, QEatsError> {
    verify_admin_token(&req, &config)?;

    let stats = cache.stats().await;
    Ok(HttpResponse::Ok().json(stats))
}

/// DELETE /admin/cache
/// Drop every cached spatial key
///
/// DOCUMENTATION: Cached lists are rebuilt from the store on the next miss,
/// so this is the way to publish restaurant edits before the TTL runs out
pub async fn clear_cache(
    config: web::Data<Config>,
    cache: web::Data<Arc<GeoCacheStore>>,
    req: HttpRequest,
) -> Result<impl Responder, QEatsError> {
    verify_admin_token(&req, &config)?;

    let removed = cache.clear().await;
    log::info!("Admin cleared geo cache ({} entries)", removed);

    Ok(HttpResponse::Ok().json(CacheClearResponse {
        message: "Geo cache cleared".to_string(),
        entries_removed: removed,
    }))
}

/// Verify admin authentication token
/// DOCUMENTATION: Checks X-Admin-Token header against configured token
fn verify_admin_token(req: &HttpRequest, config: &Config) -> Result<(), QEatsError> {
    let token = req
        .headers()
        .get("X-Admin-Token")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            log::warn!("Admin request without token");
            QEatsError::Unauthorized
        })?;

    if token != config.admin_token {
        log::warn!("Admin request with invalid token");
        return Err(QEatsError::Forbidden);
    }

    Ok(())
}

/// Configuration for admin routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/cache/stats", web::get().to(cache_stats))
            .route("/cache", web::delete().to(clear_cache)),
    );
}
