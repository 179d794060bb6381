//! # Workday Module
//!
//! Student-records integration: notifications, action items, tuition fees,
//! and the academic record.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::workday_routes;
