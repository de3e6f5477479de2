// src/handlers/restaurants.rs
// DOCUMENTATION: HTTP handlers for restaurant lookups
// PURPOSE: Parse requests, call services, return responses

use crate::errors::QEatsError;
use crate::models::GetRestaurantsRequest;
use crate::services::RestaurantService;
use actix_web::{web, HttpResponse, Responder};
use chrono::Local;
use validator::Validate;

/// GET /qeats/v1/restaurants
/// Nearby restaurants, or a search when `searchFor` is given
pub async fn get_restaurants(
    service: web::Data<RestaurantService>,
    query: web::Query<GetRestaurantsRequest>,
) -> Result<impl Responder, QEatsError> {
    let request = query.into_inner();
    if let Err(e) = request.validate() {
        return Err(QEatsError::ValidationError(e.to_string()));
    }

    // Serving hours are evaluated against the server's local clock
    let now = Local::now().time();

    let response = match request.search_for {
        Some(_) => {
            service
                .find_restaurants_by_search_query(&request, now)
                .await?
        }
        None => service.find_all_restaurants_close_by(&request, now).await?,
    };

    log::info!(
        "Returning {} restaurants for ({}, {})",
        response.restaurants.len(),
        request.latitude,
        request.longitude
    );

    Ok(HttpResponse::Ok().json(response))
}

/// Configuration for restaurant routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/qeats/v1").route("/restaurants", web::get().to(get_restaurants)),
    );
}
