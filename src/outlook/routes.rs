//! Outlook routes

use axum::{
    routing::{get, patch},
    Router,
};

use super::handlers;

/// Create the Outlook router
pub fn outlook_routes() -> Router {
    Router::new()
        .route(
            "/api/outlook/emails/important",
            get(handlers::important_emails),
        )
        .route("/api/outlook/emails", get(handlers::list_emails))
        .route(
            "/api/outlook/events/upcoming",
            get(handlers::upcoming_events),
        )
        .route("/api/outlook/events", get(handlers::list_events))
        .route(
            "/api/outlook/emails/:email_id/read",
            patch(handlers::mark_email_read),
        )
}
