// Common module - shared types and utilities across all modules

pub mod config;
pub mod error;
pub mod helpers;
pub mod response;
pub mod state;

// Re-export commonly used types for convenience
pub use error::{set_dev_mode, ApiError, UpstreamError};
pub use helpers::{ensure_success, safe_email_log};
pub use state::AppState;
