//! Canvas routes

use axum::{routing::get, Router};

use super::handlers;

/// Create the Canvas router
pub fn canvas_routes() -> Router {
    Router::new()
        .route("/api/canvas/courses", get(handlers::list_courses))
        .route(
            "/api/canvas/courses/:course_id/assignments",
            get(handlers::course_assignments),
        )
        .route(
            "/api/canvas/courses/:course_id/announcements",
            get(handlers::course_announcements),
        )
        .route(
            "/api/canvas/assignments/upcoming",
            get(handlers::upcoming_assignments),
        )
        .route(
            "/api/canvas/announcements/recent",
            get(handlers::recent_announcements),
        )
}
