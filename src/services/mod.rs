// src/services/mod.rs
//
// Shared infrastructure services used across domain modules

pub mod rate_limit;

// Re-export commonly used types for convenience
pub use rate_limit::RateLimitService;
