//! CyRide routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Create the CyRide router
pub fn cyride_routes() -> Router {
    Router::new()
        .route("/api/cyride/routes", get(handlers::list_routes))
        .route(
            "/api/cyride/routes/favorites",
            get(handlers::favorite_routes),
        )
        .route("/api/cyride/stops", get(handlers::list_stops))
        .route("/api/cyride/stops/nearby", get(handlers::nearby_stops))
        .route("/api/cyride/trips/upcoming", get(handlers::upcoming_trips))
        .route("/api/cyride/vehicles", get(handlers::list_vehicles))
        .route("/api/cyride/route-plan", post(handlers::plan_route))
}
