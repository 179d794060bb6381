//! Canvas route handlers

use axum::extract::{Extension, Json, Path};
use serde_json::Value;
use std::sync::Arc;

use crate::auth::extractors::AuthedSession;
use crate::common::{response, ApiError, AppState};

fn parse_course_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::Validation("Invalid course ID".to_string()))
}

/// GET /api/canvas/courses
pub async fn list_courses(
    Extension(state): Extension<Arc<AppState>>,
    _session: AuthedSession,
) -> Result<Json<Value>, ApiError> {
    Ok(response::ok(state.canvas.courses().await))
}

/// GET /api/canvas/courses/:course_id/assignments
pub async fn course_assignments(
    Extension(state): Extension<Arc<AppState>>,
    _session: AuthedSession,
    Path(course_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let course_id = parse_course_id(&course_id)?;
    Ok(response::ok(state.canvas.assignments(course_id).await))
}

/// GET /api/canvas/courses/:course_id/announcements
pub async fn course_announcements(
    Extension(state): Extension<Arc<AppState>>,
    _session: AuthedSession,
    Path(course_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let course_id = parse_course_id(&course_id)?;
    Ok(response::ok(state.canvas.announcements(course_id).await))
}

/// GET /api/canvas/assignments/upcoming
pub async fn upcoming_assignments(
    Extension(state): Extension<Arc<AppState>>,
    _session: AuthedSession,
) -> Result<Json<Value>, ApiError> {
    Ok(response::ok(state.canvas.upcoming_assignments().await))
}

/// GET /api/canvas/announcements/recent
pub async fn recent_announcements(
    Extension(state): Extension<Arc<AppState>>,
    _session: AuthedSession,
) -> Result<Json<Value>, ApiError> {
    Ok(response::ok(state.canvas.recent_announcements().await))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_course_id_parses() {
        assert_eq!(parse_course_id("42").unwrap(), 42);
    }

    #[test]
    fn non_numeric_course_id_is_a_validation_error() {
        assert!(matches!(
            parse_course_id("forty-two"),
            Err(ApiError::Validation(_))
        ));
    }
}
