// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, restaurant store, geo cache and start HTTP server

mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod services;

#[cfg(test)]
mod test_support;

use actix_web::{middleware::Logger, web, App, HttpServer};
use config::Config;
use db::{RestaurantRepository, RestaurantSource};
use dotenv::dotenv;
use services::RestaurantService;
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Initialize logging before reading settings so parse warnings show up
    env_logger::Builder::new()
        .parse_filters(&config::log_filter())
        .init();

    // 3. Load configuration
    let config = Config::from_env();

    if let Err(e) = config.validate() {
        log::error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    log::info!("Starting qeats-restaurants service...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );
    log::info!(
        "Search strategy: {:?} ({} workers)",
        config.search_strategy,
        config.search_workers
    );

    // 4. Initialize restaurant store
    let pool = match config::init_db_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };
    let source: Arc<dyn RestaurantSource> = Arc::new(RestaurantRepository::new(pool));

    // 5. Open the geo cache (closed again on shutdown)
    let cache = config::init_cache(&config);

    let service = web::Data::new(RestaurantService::from_config(
        &config,
        source,
        cache.clone(),
    ));

    // 6. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let config_data = web::Data::new(config);
    let cache_data = web::Data::new(cache.clone());

    let result = HttpServer::new(move || {
        App::new()
            // Application state (service, config, and cache handle)
            .app_data(service.clone())
            .app_data(config_data.clone())
            .app_data(cache_data.clone())
            // Middleware
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::restaurants_config)
            .configure(handlers::admin_config)
    })
    .bind(&server_addr)?
    .run()
    .await;

    cache.close();
    log::info!("qeats-restaurants stopped");

    result
}
