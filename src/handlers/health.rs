// src/handlers/health.rs
// DOCUMENTATION: Health check handler
// PURPOSE: Report service status and whether the geo cache is serving

use crate::services::GeoCacheStore;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use std::sync::Arc;

pub async fn health_check(cache: web::Data<Arc<GeoCacheStore>>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": "qeats-restaurants",
        "version": env!("CARGO_PKG_VERSION"),
        "cache": if cache.is_open() { "available" } else { "degraded" }
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
