//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;
use tracing::warn;

use super::models::User;
use crate::common::{ApiError, AppState};

/// Authenticated session extractor
///
/// Verifies the bearer token through the token codec and exposes the caller
/// identity plus the bridged upstream access token to handlers. Runs before
/// any handler logic; failures become MISSING_TOKEN / INVALID_TOKEN.
#[derive(Debug)]
pub struct AuthedSession {
    pub user: User,
    pub access_token: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedSession
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(app_state): Extension<Arc<AppState>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::Internal("missing app state".to_string()))?;

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let token = match header {
            Some(value) => value.strip_prefix("Bearer ").unwrap_or(value).to_string(),
            None => {
                warn!("authentication failed: missing Authorization header");
                return Err(ApiError::MissingToken);
            }
        };

        let claims = app_state.token_codec.verify(&token).map_err(|e| {
            warn!(error = %e, "session token verification failed");
            ApiError::from(e)
        })?;

        Ok(AuthedSession {
            user: claims.user,
            access_token: claims.access_token,
        })
    }
}
