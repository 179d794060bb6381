//! Dashboard routes

use axum::{routing::get, Router};

use super::handlers;

/// Create the dashboard router
pub fn dashboard_routes() -> Router {
    Router::new().route("/api/dashboard", get(handlers::dashboard))
}
