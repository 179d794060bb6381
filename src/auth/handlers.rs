//! Authentication handlers

use axum::extract::{Extension, Json, Query};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use super::extractors::AuthedSession;
use super::models::{AuthTokens, CallbackRequest, LoginQuery, RefreshRequest};
use crate::common::{response, safe_email_log, ApiError, AppState};

/// GET /auth/login
/// Hands the client the provider authorization URL. The `state` query value
/// is embedded in the URL and echoed back by the provider on callback.
pub async fn login(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<LoginQuery>,
) -> Result<Json<Value>, ApiError> {
    let auth_url = state
        .oauth
        .authorization_url(query.state.as_deref().unwrap_or("default"));
    Ok(response::ok(json!({ "authUrl": auth_url })))
}

/// POST /auth/callback
/// Exchanges the authorization code, derives the canonical identity, and
/// mints a session token. A missing code is a caller error; a rejected code
/// is a provider error.
pub async fn callback(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<CallbackRequest>,
) -> Result<Json<Value>, ApiError> {
    let code = payload
        .code
        .as_deref()
        .filter(|c| !c.is_empty())
        .ok_or(ApiError::MissingCode)?;

    let outcome = state.oauth.exchange_code(code).await?;

    let ttl = Duration::hours(state.config.jwt.ttl_hours);
    let session_token = state
        .token_codec
        .issue(&outcome.user, &outcome.access_token, ttl)?;

    info!(
        user_id = %outcome.user.id,
        email = %safe_email_log(&outcome.user.email),
        "login completed"
    );

    let tokens = AuthTokens {
        access_token: session_token,
        refresh_token: outcome.refresh_token.unwrap_or_default(),
        expires_at: (Utc::now() + ttl).timestamp_millis(),
    };

    Ok(response::ok(
        json!({ "user": outcome.user, "tokens": tokens }),
    ))
}

/// POST /auth/refresh
/// Validates the current session, redeems the supplied upstream refresh
/// token, and re-issues the session token. Sessions without an upstream
/// refresh token cannot be refreshed.
pub async fn refresh(
    Extension(state): Extension<Arc<AppState>>,
    session: AuthedSession,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<Value>, ApiError> {
    let refresh_token = payload
        .refresh_token
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::RefreshUnsupported)?;

    let grant = state.oauth.refresh(refresh_token).await?;

    let ttl = Duration::hours(state.config.jwt.ttl_hours);
    let session_token = state
        .token_codec
        .issue(&session.user, &grant.access_token, ttl)?;

    info!(user_id = %session.user.id, "session refreshed");

    let tokens = AuthTokens {
        access_token: session_token,
        refresh_token: grant
            .refresh_token
            .unwrap_or_else(|| refresh_token.to_string()),
        expires_at: (Utc::now() + ttl).timestamp_millis(),
    };

    Ok(response::ok(
        json!({ "user": session.user, "tokens": tokens }),
    ))
}

/// POST /auth/logout
/// Signals the provider best-effort; local logout (client-side token discard)
/// succeeds regardless.
pub async fn logout(
    Extension(state): Extension<Arc<AppState>>,
    session: AuthedSession,
) -> Result<Json<Value>, ApiError> {
    state.oauth.revoke().await;
    info!(user_id = %session.user.id, "user logged out");
    Ok(response::ok(
        json!({ "message": "Logged out successfully" }),
    ))
}

/// GET /auth/me
pub async fn me(session: AuthedSession) -> Result<Json<Value>, ApiError> {
    Ok(response::ok(json!({ "user": session.user })))
}
