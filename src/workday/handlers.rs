//! Workday route handlers

use axum::extract::{Extension, Json, Path};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::auth::extractors::AuthedSession;
use crate::common::{response, ApiError, AppState};

/// GET /api/workday/notifications
pub async fn notifications(
    Extension(state): Extension<Arc<AppState>>,
    session: AuthedSession,
) -> Result<Json<Value>, ApiError> {
    Ok(response::ok(state.workday.notifications(&session.user).await))
}

/// GET /api/workday/action-items
pub async fn action_items(
    Extension(state): Extension<Arc<AppState>>,
    session: AuthedSession,
) -> Result<Json<Value>, ApiError> {
    Ok(response::ok(state.workday.action_items(&session.user).await))
}

/// GET /api/workday/tuition-fees
pub async fn tuition_fees(
    Extension(state): Extension<Arc<AppState>>,
    session: AuthedSession,
) -> Result<Json<Value>, ApiError> {
    Ok(response::ok(state.workday.tuition_fees(&session.user).await))
}

/// GET /api/workday/student-record
pub async fn student_record(
    Extension(state): Extension<Arc<AppState>>,
    session: AuthedSession,
) -> Result<Json<Value>, ApiError> {
    Ok(response::ok(
        state.workday.student_record(&session.user).await,
    ))
}

/// PATCH /api/workday/notifications/:notification_id/read
pub async fn mark_notification_read(
    Extension(state): Extension<Arc<AppState>>,
    session: AuthedSession,
    Path(notification_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state
        .workday
        .mark_notification_read(&session.user, &notification_id)
        .await
        .map_err(|e| ApiError::UpstreamWrite(e.to_string()))?;
    Ok(response::ok(
        json!({ "message": "Notification marked as read" }),
    ))
}
