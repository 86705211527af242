//! Utility modules
//!
//! This module contains error handling, logging setup and small helpers

pub mod errors;
pub mod helpers;
pub mod logging;

pub use errors::{PortalError, Result};
