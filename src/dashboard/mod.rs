//! # Dashboard Module
//!
//! Aggregates all four upstreams into a single snapshot with per-section
//! fallbacks, so one failing service degrades its section instead of the
//! whole response.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

#[cfg(test)]
mod tests;

pub use routes::dashboard_routes;
