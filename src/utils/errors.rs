//! Error handling for TechMeet
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy. Every error is eventually
//! reduced to a user-facing toast by the HTTP layer.

use thiserror::Error;
use uuid::Uuid;

/// Main error type for the TechMeet portal service
#[derive(Error, Debug)]
pub enum PortalError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Hosted auth error: {0}")]
    HostedAuth(#[from] HostedAuthError),

    #[error("Provisioning error: {0}")]
    Provisioning(#[from] ProvisioningError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Profile not found: {user_id}")]
    ProfileNotFound { user_id: Uuid },

    #[error("Pending user not found: {pending_user_id}")]
    PendingUserNotFound { pending_user_id: Uuid },

    #[error("Institute ID not found: {institute_id}")]
    InstituteNotFound { institute_id: Uuid },

    #[error("Class not found: {class_id}")]
    ClassNotFound { class_id: Uuid },

    #[error("Task not found: {task_id}")]
    TaskNotFound { task_id: Uuid },

    #[error("Meeting not found: {meeting_id}")]
    MeetingNotFound { meeting_id: Uuid },

    #[error("Submission not found: {submission_id}")]
    SubmissionNotFound { submission_id: Uuid },

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Hosted auth service specific errors
#[derive(Error, Debug)]
pub enum HostedAuthError {
    #[error("Invalid login credentials")]
    InvalidCredentials,

    #[error("Auth request failed: {0}")]
    RequestFailed(String),

    #[error("Auth service timeout")]
    Timeout,

    #[error("Invalid auth response: {0}")]
    InvalidResponse(String),
}

/// Account provisioning endpoint specific errors
#[derive(Error, Debug)]
pub enum ProvisioningError {
    #[error("Provisioning rejected: {0}")]
    Rejected(String),

    #[error("Provisioning request failed: {0}")]
    RequestFailed(String),

    #[error("Provisioning endpoint timeout")]
    Timeout,

    #[error("Invalid provisioning response: {0}")]
    InvalidResponse(String),

    #[error("Provisioned account {user_id} already belongs to a different profile")]
    Conflict { user_id: Uuid },
}

/// Result type alias for TechMeet operations
pub type Result<T> = std::result::Result<T, PortalError>;

/// Result type alias for provisioning operations
pub type ProvisioningResult<T> = std::result::Result<T, ProvisioningError>;

impl PortalError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            PortalError::Database(_) => false,
            PortalError::Migration(_) => false,
            PortalError::HostedAuth(HostedAuthError::InvalidCredentials) => false,
            PortalError::HostedAuth(_) => true,
            PortalError::Provisioning(ProvisioningError::Rejected(_))
            | PortalError::Provisioning(ProvisioningError::Conflict { .. }) => false,
            PortalError::Provisioning(_) => true,
            PortalError::Config(_) => false,
            PortalError::PermissionDenied(_) => false,
            PortalError::ProfileNotFound { .. } => false,
            PortalError::PendingUserNotFound { .. } => false,
            PortalError::InstituteNotFound { .. } => false,
            PortalError::ClassNotFound { .. } => false,
            PortalError::TaskNotFound { .. } => false,
            PortalError::MeetingNotFound { .. } => false,
            PortalError::SubmissionNotFound { .. } => false,
            PortalError::InvalidStateTransition { .. } => false,
            PortalError::Http(_) => true,
            PortalError::Serialization(_) => false,
            PortalError::Io(_) => true,
            PortalError::UrlParse(_) => false,
            PortalError::Token(_) => false,
            PortalError::Authentication(_) => false,
            PortalError::RateLimitExceeded => true,
            PortalError::InvalidInput(_) => false,
            PortalError::ServiceUnavailable(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PortalError::Database(_) => ErrorSeverity::Critical,
            PortalError::Migration(_) => ErrorSeverity::Critical,
            PortalError::Config(_) => ErrorSeverity::Critical,
            PortalError::PermissionDenied(_) => ErrorSeverity::Warning,
            PortalError::Authentication(_) => ErrorSeverity::Warning,
            PortalError::Token(_) => ErrorSeverity::Warning,
            PortalError::HostedAuth(HostedAuthError::InvalidCredentials) => ErrorSeverity::Warning,
            PortalError::RateLimitExceeded => ErrorSeverity::Warning,
            PortalError::InvalidInput(_) => ErrorSeverity::Info,
            PortalError::InvalidStateTransition { .. } => ErrorSeverity::Info,
            PortalError::ProfileNotFound { .. }
            | PortalError::PendingUserNotFound { .. }
            | PortalError::InstituteNotFound { .. }
            | PortalError::ClassNotFound { .. }
            | PortalError::TaskNotFound { .. }
            | PortalError::MeetingNotFound { .. }
            | PortalError::SubmissionNotFound { .. } => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }

    /// Text shown to the user in the error toast.
    ///
    /// Internal failures are collapsed into a generic message; their details
    /// only go to the log.
    pub fn user_message(&self) -> String {
        match self {
            PortalError::InvalidInput(msg) => msg.clone(),
            PortalError::PermissionDenied(msg) => msg.clone(),
            PortalError::Authentication(msg) => msg.clone(),
            PortalError::HostedAuth(HostedAuthError::InvalidCredentials) => {
                "Invalid login credentials".to_string()
            }
            PortalError::Provisioning(ProvisioningError::Rejected(msg)) => msg.clone(),
            PortalError::Provisioning(ProvisioningError::Conflict { .. }) => {
                "An account with a different profile already exists for this registration.".to_string()
            }
            PortalError::Provisioning(_) => {
                "Failed to create the account. Please try again.".to_string()
            }
            PortalError::Token(_) => "Your session has expired. Please sign in again.".to_string(),
            PortalError::RateLimitExceeded => {
                "Too many attempts. Please wait a moment and try again.".to_string()
            }
            PortalError::PendingUserNotFound { .. } => {
                "This registration request no longer exists.".to_string()
            }
            PortalError::ProfileNotFound { .. } => "Profile not found.".to_string(),
            PortalError::InstituteNotFound { .. } => "Institute ID not found.".to_string(),
            PortalError::ClassNotFound { .. } => "Class not found.".to_string(),
            PortalError::TaskNotFound { .. } => "Task not found.".to_string(),
            PortalError::MeetingNotFound { .. } => "Meeting not found.".to_string(),
            PortalError::SubmissionNotFound { .. } => "Submission not found.".to_string(),
            PortalError::InvalidStateTransition { from, to } => {
                format!("Cannot change status from {} to {}.", from, to)
            }
            PortalError::ServiceUnavailable(msg) => msg.clone(),
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }

    /// HTTP status code used when the error reaches the API boundary
    pub fn status_code(&self) -> u16 {
        match self {
            PortalError::InvalidInput(_) => 400,
            PortalError::InvalidStateTransition { .. } => 409,
            PortalError::Authentication(_)
            | PortalError::Token(_)
            | PortalError::HostedAuth(HostedAuthError::InvalidCredentials) => 401,
            PortalError::PermissionDenied(_) => 403,
            PortalError::ProfileNotFound { .. }
            | PortalError::PendingUserNotFound { .. }
            | PortalError::InstituteNotFound { .. }
            | PortalError::ClassNotFound { .. }
            | PortalError::TaskNotFound { .. }
            | PortalError::MeetingNotFound { .. }
            | PortalError::SubmissionNotFound { .. } => 404,
            PortalError::RateLimitExceeded => 429,
            PortalError::Provisioning(ProvisioningError::Rejected(_)) => 422,
            PortalError::Provisioning(ProvisioningError::Conflict { .. }) => 409,
            PortalError::Provisioning(_) | PortalError::HostedAuth(_) | PortalError::Http(_) => 502,
            PortalError::ServiceUnavailable(_) => 503,
            _ => 500,
        }
    }

    /// Whether a store error is a unique-constraint violation
    pub fn is_unique_violation(&self) -> bool {
        match self {
            PortalError::Database(sqlx::Error::Database(db_err)) => {
                db_err.code().as_deref() == Some("23505")
            }
            _ => false,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_surfaces_its_message() {
        let err = PortalError::InvalidInput("Invalid institute ID".to_string());
        assert_eq!(err.user_message(), "Invalid institute ID");
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.severity(), ErrorSeverity::Info);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_internal_errors_are_masked() {
        let err = PortalError::Config("missing jwt secret".to_string());
        assert_eq!(err.user_message(), "Something went wrong. Please try again.");
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_provisioning_errors() {
        let rejected = PortalError::from(ProvisioningError::Rejected("User already registered".to_string()));
        assert_eq!(rejected.user_message(), "User already registered");
        assert_eq!(rejected.status_code(), 422);
        assert!(!rejected.is_recoverable());

        let conflict = PortalError::from(ProvisioningError::Conflict { user_id: Uuid::nil() });
        assert_eq!(conflict.status_code(), 409);
        assert!(!conflict.is_recoverable());

        let timeout = PortalError::from(ProvisioningError::Timeout);
        assert_eq!(timeout.status_code(), 502);
        assert!(timeout.is_recoverable());
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err = PortalError::PendingUserNotFound { pending_user_id: Uuid::nil() };
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.user_message(), "This registration request no longer exists.");
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(ErrorSeverity::Warning.to_string(), "WARN");
        assert_eq!(ErrorSeverity::Critical.to_string(), "CRITICAL");
    }
}
