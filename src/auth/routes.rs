//! Authentication routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `GET  /auth/login` - Provider authorization URL
/// - `POST /auth/callback` - OAuth callback code exchange
/// - `POST /auth/refresh` - Re-issue the session token
/// - `POST /auth/logout` - Best-effort provider sign-out
/// - `GET  /auth/me` - Current user identity
pub fn auth_routes() -> Router {
    Router::new()
        .route("/auth/login", get(handlers::login))
        .route("/auth/callback", post(handlers::callback))
        .route("/auth/refresh", post(handlers::refresh))
        .route("/auth/logout", post(handlers::logout))
        .route("/auth/me", get(handlers::me))
}
