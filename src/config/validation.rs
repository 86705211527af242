//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{PortalError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_database_config(&settings.database)?;
    validate_backend_config(&settings.backend)?;
    validate_auth_config(&settings.auth)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate server configuration
fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(PortalError::Config(
            "Server host is required".to_string()
        ));
    }

    if config.port == 0 {
        return Err(PortalError::Config(
            "Server port must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(PortalError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(PortalError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(PortalError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    if config.acquire_timeout_seconds == 0 {
        return Err(PortalError::Config(
            "Database acquire timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate hosted backend configuration
fn validate_backend_config(config: &super::BackendConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(PortalError::Config(
            "Backend URL is required".to_string()
        ));
    }

    let parsed = url::Url::parse(&config.url)?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(PortalError::Config(
            format!("Backend URL must be http(s), got {}", parsed.scheme())
        ));
    }

    if config.anon_key.is_empty() {
        return Err(PortalError::Config(
            "Backend anon key is required".to_string()
        ));
    }

    if config.jwt_secret.is_empty() {
        return Err(PortalError::Config(
            "Backend JWT secret is required".to_string()
        ));
    }

    if config.provisioning_function.is_empty() {
        return Err(PortalError::Config(
            "Provisioning function name is required".to_string()
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(PortalError::Config(
            "Backend timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate sign-in throttling configuration
fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    if config.max_sign_in_attempts == 0 {
        return Err(PortalError::Config(
            "Max sign-in attempts must be greater than 0".to_string()
        ));
    }

    if config.window_seconds == 0 {
        return Err(PortalError::Config(
            "Sign-in window must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(PortalError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(PortalError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    let valid_formats = ["pretty", "json"];
    if !valid_formats.contains(&config.format.as_str()) {
        return Err(PortalError::Config(
            format!("Invalid log format: {}. Valid formats: {:?}", config.format, valid_formats)
        ));
    }

    Ok(())
}
