//! Dashboard route handlers

use axum::extract::{Extension, Json};
use serde_json::Value;
use std::sync::Arc;

use crate::auth::extractors::AuthedSession;
use crate::common::{response, ApiError, AppState};

/// GET /api/dashboard
pub async fn dashboard(
    Extension(state): Extension<Arc<AppState>>,
    session: AuthedSession,
) -> Result<Json<Value>, ApiError> {
    let snapshot = state
        .dashboard
        .build_snapshot(&session.user, &session.access_token)
        .await;
    Ok(response::ok(snapshot))
}
