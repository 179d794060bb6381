//! # Canvas Module
//!
//! Learning-management integration: courses, assignments, announcements, and
//! the composite upcoming/recent views built on top of them.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::canvas_routes;
