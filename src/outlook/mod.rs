//! # Outlook Module
//!
//! Mail and calendar integration backed by Microsoft Graph, using the access
//! token bridged through the caller's session.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::outlook_routes;
