//! Workday routes

use axum::{
    routing::{get, patch},
    Router,
};

use super::handlers;

/// Create the Workday router
pub fn workday_routes() -> Router {
    Router::new()
        .route("/api/workday/notifications", get(handlers::notifications))
        .route("/api/workday/action-items", get(handlers::action_items))
        .route("/api/workday/tuition-fees", get(handlers::tuition_fees))
        .route("/api/workday/student-record", get(handlers::student_record))
        .route(
            "/api/workday/notifications/:notification_id/read",
            patch(handlers::mark_notification_read),
        )
}
