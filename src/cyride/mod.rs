//! # CyRide Module
//!
//! Transit integration: routes, stops, live vehicles, upcoming trips, and
//! trip planning.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::cyride_routes;
