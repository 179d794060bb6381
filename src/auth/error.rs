//! Authentication error types

use thiserror::Error;

use crate::common::ApiError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid or expired session token")]
    InvalidToken,

    #[error("token encoding failed: {0}")]
    Encoding(String),

    #[error("authorization code exchange failed: {0}")]
    ExchangeFailed(String),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken => ApiError::InvalidToken,
            AuthError::Encoding(msg) => ApiError::Internal(msg),
            AuthError::ExchangeFailed(msg) => ApiError::ExchangeFailed(msg),
        }
    }
}
