//! Test helpers module
//!
//! This module provides utilities and helpers for testing the TechMeet service.
//! It includes the hosted backend mock, database helpers, and test context setup.
#![allow(dead_code)]

pub mod backend_mock;
pub mod database_helper;
pub mod test_context;
pub mod test_data;

pub use backend_mock::*;
pub use database_helper::*;
pub use test_context::*;
pub use test_data::*;
