//! Registration service implementation
//!
//! Self-registration never creates an account directly. A valid sign-up
//! becomes a pending user that an admin later approves or rejects.

use serde::{Deserialize, Serialize};
use tracing::{info, debug};
use crate::database::DatabaseService;
use crate::models::institute::InstituteId;
use crate::models::pending_user::{PendingUser, CreatePendingUserRequest, RegistrationState};
use crate::models::profile::Role;
use crate::utils::errors::{PortalError, Result};
use crate::utils::helpers::{is_valid_email, normalize_email, normalize_institute_id};
use crate::utils::logging::log_registration_event;

pub const MIN_PASSWORD_LENGTH: usize = 6;

pub const INVALID_INSTITUTE_MESSAGE: &str =
    "Invalid institute ID. Please check with your institution administrator.";

pub const DUPLICATE_EMAIL_MESSAGE: &str =
    "An account or registration request already exists for this email.";

/// Sign-up form as submitted by a visitor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub institute_id: String,
    pub role: Role,
    pub password: String,
    pub confirm_password: String,
}

/// Registration form state: the institute IDs that were active when it was opened
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    active_institutes: Vec<InstituteId>,
}

impl RegistrationForm {
    pub fn new(institutes: Vec<InstituteId>) -> Self {
        Self {
            active_institutes: institutes.into_iter().filter(|i| i.is_active).collect(),
        }
    }

    pub fn institutes(&self) -> &[InstituteId] {
        &self.active_institutes
    }

    /// Find the active institute an identifier refers to, ignoring case and padding
    pub fn match_institute(&self, raw: &str) -> Option<&InstituteId> {
        let wanted = normalize_institute_id(raw);
        if wanted.is_empty() {
            return None;
        }
        self.active_institutes
            .iter()
            .find(|i| normalize_institute_id(&i.institute_id) == wanted)
    }

    /// Resolve the institute of a field-checked sign-up and build the pending
    /// user row it would create
    pub fn resolve(&self, request: &SignUpRequest) -> Result<CreatePendingUserRequest> {
        let institute = self.match_institute(&request.institute_id)
            .ok_or_else(|| PortalError::InvalidInput(INVALID_INSTITUTE_MESSAGE.to_string()))?;

        Ok(CreatePendingUserRequest {
            name: request.name.trim().to_string(),
            email: normalize_email(&request.email),
            institute_id: institute.institute_id.clone(),
            role: request.role,
        })
    }
}

/// Field checks that need no store access; run before `RegistrationForm::resolve`
pub fn validate_fields(request: &SignUpRequest) -> Result<()> {
    let name = request.name.trim();
    let email = normalize_email(&request.email);

    if name.is_empty() || email.is_empty() || request.institute_id.trim().is_empty() || request.password.is_empty() {
        return Err(PortalError::InvalidInput("Please fill in all fields".to_string()));
    }

    if !is_valid_email(&email) {
        return Err(PortalError::InvalidInput("Please enter a valid email address".to_string()));
    }

    if request.password != request.confirm_password {
        return Err(PortalError::InvalidInput("Passwords do not match".to_string()));
    }

    if request.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PortalError::InvalidInput(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }

    if !request.role.is_self_registrable() {
        return Err(PortalError::InvalidInput("Please select student or teacher".to_string()));
    }

    Ok(())
}

/// Registration service for the sign-up side of the approval workflow
#[derive(Clone)]
pub struct RegistrationService {
    db: DatabaseService,
    enabled: bool,
}

impl RegistrationService {
    pub fn new(db: DatabaseService, enabled: bool) -> Self {
        Self { db, enabled }
    }

    /// Load the active institute IDs for a fresh registration form
    pub async fn open_form(&self) -> Result<RegistrationForm> {
        let institutes = self.db.institutes.list_active().await?;
        debug!(count = institutes.len(), "Loaded active institute IDs");
        Ok(RegistrationForm::new(institutes))
    }

    /// Submit a sign-up; on success exactly one pending user exists for it
    pub async fn submit(&self, request: SignUpRequest) -> Result<PendingUser> {
        if !self.enabled {
            return Err(PortalError::ServiceUnavailable("Registration is currently closed".to_string()));
        }

        let create = self.build_pending(&request).await.map_err(|e| {
            if let PortalError::InvalidInput(reason) = &e {
                log_registration_event(&request.email, "rejected_input", Some(reason.as_str()));
            }
            e
        })?;

        if self.db.profiles.count_by_email(&create.email).await? > 0
            || self.db.pending_users.find_by_email(&create.email).await?.is_some()
        {
            log_registration_event(&create.email, "duplicate", None);
            return Err(PortalError::InvalidInput(DUPLICATE_EMAIL_MESSAGE.to_string()));
        }

        let pending = self.db.pending_users.create(create).await.map_err(|e| {
            if e.is_unique_violation() {
                PortalError::InvalidInput(DUPLICATE_EMAIL_MESSAGE.to_string())
            } else {
                e
            }
        })?;

        log_registration_event(&pending.email, "submitted", Some(&pending.institute_id));
        info!(pending_user_id = %pending.id, role = %pending.role, "Registration submitted for approval");
        Ok(pending)
    }

    /// Field checks first, so bad input never reaches the store
    async fn build_pending(&self, request: &SignUpRequest) -> Result<CreatePendingUserRequest> {
        validate_fields(request)?;
        self.open_form().await?.resolve(request)
    }

    /// Where the registration for an email stands
    pub async fn status(&self, email: &str) -> Result<RegistrationState> {
        let email = normalize_email(email);

        if let Some(profile) = self.db.profiles.find_by_email(&email).await? {
            return Ok(RegistrationState::Approved { profile_id: profile.id });
        }

        if let Some(pending) = self.db.pending_users.find_by_email(&email).await? {
            return Ok(RegistrationState::PendingApproval { pending_user_id: pending.id });
        }

        Ok(RegistrationState::Unsubmitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn institute(code: &str, active: bool) -> InstituteId {
        InstituteId {
            id: Uuid::new_v4(),
            institute_id: code.to_string(),
            institute_name: format!("{} Institute", code),
            is_active: active,
            created_at: Utc::now(),
        }
    }

    fn form() -> RegistrationForm {
        RegistrationForm::new(vec![institute("MIT-001", true), institute("OLD-9", false)])
    }

    fn sign_up(institute_id: &str) -> SignUpRequest {
        SignUpRequest {
            name: " Jane Doe ".to_string(),
            email: "Jane@School.EDU".to_string(),
            institute_id: institute_id.to_string(),
            role: Role::Student,
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
        }
    }

    #[test]
    fn test_inactive_institutes_are_dropped() {
        assert_eq!(form().institutes().len(), 1);
        assert!(form().match_institute("OLD-9").is_none());
    }

    #[test]
    fn test_case_insensitive_match_stores_canonical_id() {
        let pending = form().resolve(&sign_up("  mit-001 ")).unwrap();
        assert_eq!(pending.institute_id, "MIT-001");
        assert_eq!(pending.email, "jane@school.edu");
        assert_eq!(pending.name, "Jane Doe");
        assert_eq!(pending.role, Role::Student);
    }

    #[test]
    fn test_unknown_institute_is_rejected() {
        let err = form().resolve(&sign_up("HARVARD")).unwrap_err();
        assert_eq!(err.user_message(), INVALID_INSTITUTE_MESSAGE);
    }

    #[test]
    fn test_password_rules() {
        let mut request = sign_up("MIT-001");
        request.confirm_password = "secret2".to_string();
        assert_eq!(validate_fields(&request).unwrap_err().user_message(), "Passwords do not match");

        request.password = "abc".to_string();
        request.confirm_password = "abc".to_string();
        assert!(validate_fields(&request).unwrap_err().user_message().contains("at least 6"));
    }

    #[test]
    fn test_admin_role_cannot_self_register() {
        let mut request = sign_up("MIT-001");
        request.role = Role::Admin;
        assert!(matches!(validate_fields(&request), Err(PortalError::InvalidInput(_))));
    }

    #[test]
    fn test_missing_fields_and_bad_email() {
        let mut request = sign_up("MIT-001");
        request.name = "   ".to_string();
        assert_eq!(validate_fields(&request).unwrap_err().user_message(), "Please fill in all fields");

        let mut request = sign_up("MIT-001");
        request.email = "not-an-email".to_string();
        assert!(validate_fields(&request).is_err());
        assert!(validate_fields(&sign_up("MIT-001")).is_ok());
    }
}
