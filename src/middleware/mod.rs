//! Middleware module
//!
//! This module contains request extractors and layers shared by the routes

pub mod auth;
pub mod logging;
pub mod rate_limit;

// Re-export commonly used middleware
pub use auth::{CurrentUser, AdminUser, TeacherUser, StudentUser};
pub use logging::{http_trace_layer, track_performance};
pub use rate_limit::{SignInLimiter, RateLimitConfig};
