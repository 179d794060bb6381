//! # Auth Module
//!
//! Identity and session handling:
//! - Session token codec (issue/verify)
//! - Microsoft Entra ID authorization-code bridge
//! - Bearer-token request extractor
//! - Login/callback/refresh/logout/me routes

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod oauth;
pub mod routes;
pub mod token;

pub use routes::auth_routes;
