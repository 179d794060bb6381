//! Outlook route handlers

use axum::extract::{Extension, Json, Path, Query};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::auth::extractors::AuthedSession;
use crate::common::{response, ApiError, AppState};

const DEFAULT_EMAIL_LIMIT: u32 = 50;
const MAX_EMAIL_LIMIT: u32 = 100;

#[derive(Debug, Deserialize)]
pub struct EmailsQuery {
    limit: Option<u32>,
    skip: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsQuery {
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
}

fn clamp_limit(limit: Option<u32>) -> u32 {
    limit.unwrap_or(DEFAULT_EMAIL_LIMIT).clamp(1, MAX_EMAIL_LIMIT)
}

/// GET /api/outlook/emails/important
pub async fn important_emails(
    Extension(state): Extension<Arc<AppState>>,
    session: AuthedSession,
) -> Result<Json<Value>, ApiError> {
    Ok(response::ok(
        state.outlook.important_emails(&session.access_token).await,
    ))
}

/// GET /api/outlook/emails?limit=&skip=
pub async fn list_emails(
    Extension(state): Extension<Arc<AppState>>,
    session: AuthedSession,
    Query(query): Query<EmailsQuery>,
) -> Result<Json<Value>, ApiError> {
    let limit = clamp_limit(query.limit);
    let skip = query.skip.unwrap_or(0);
    let emails = state
        .outlook
        .emails(&session.access_token, limit, skip)
        .await;
    let pagination = json!({
        "limit": limit,
        "skip": skip,
        "total": emails.len(),
        "hasNext": emails.len() as u32 == limit,
    });
    Ok(response::ok_paginated(emails, pagination))
}

/// GET /api/outlook/events/upcoming
pub async fn upcoming_events(
    Extension(state): Extension<Arc<AppState>>,
    session: AuthedSession,
) -> Result<Json<Value>, ApiError> {
    Ok(response::ok(
        state.outlook.upcoming_events(&session.access_token).await,
    ))
}

/// GET /api/outlook/events?startDate=&endDate=
pub async fn list_events(
    Extension(state): Extension<Arc<AppState>>,
    session: AuthedSession,
    Query(query): Query<EventsQuery>,
) -> Result<Json<Value>, ApiError> {
    Ok(response::ok(
        state
            .outlook
            .calendar_events(&session.access_token, query.start_date, query.end_date)
            .await,
    ))
}

/// PATCH /api/outlook/emails/:email_id/read
pub async fn mark_email_read(
    Extension(state): Extension<Arc<AppState>>,
    session: AuthedSession,
    Path(email_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state
        .outlook
        .mark_email_read(&session.access_token, &email_id)
        .await
        .map_err(|e| ApiError::UpstreamWrite(e.to_string()))?;
    Ok(response::ok(json!({ "id": email_id, "isRead": true })))
}
