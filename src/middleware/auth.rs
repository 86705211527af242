//! Authentication extractors
//!
//! Requests carry the hosted auth service's access token as a bearer token.
//! The extractors verify it, load the caller's profile and enforce the role
//! a route needs.

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap};
use tracing::{debug, warn};
use crate::models::profile::{Profile, Role};
use crate::state::AppState;
use crate::utils::errors::{PortalError, Result};

/// Pull the bearer token out of the Authorization header
pub fn bearer_token(headers: &HeaderMap) -> Result<String> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| PortalError::Authentication("Please sign in to continue".to_string()))?;

    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| PortalError::Authentication("Malformed authorization header".to_string()))?;

    Ok(token.to_string())
}

/// Any signed-in user with a profile
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub profile: Profile,
    pub access_token: String,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = PortalError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let access_token = bearer_token(&parts.headers)?;
        let profile = state.services.auth_service.authenticate(&access_token).await?;
        debug!(user_id = %profile.id, role = %profile.role, "Request authenticated");
        Ok(Self { profile, access_token })
    }
}

fn require_role(user: &CurrentUser, role: Role) -> Result<()> {
    if user.profile.role == role {
        return Ok(());
    }
    warn!(user_id = %user.profile.id, role = %user.profile.role, required = %role, "Role check failed");
    Err(PortalError::PermissionDenied(format!("{} access required", role)))
}

/// Signed-in admin; rejected when the admin panel is disabled
#[derive(Debug, Clone)]
pub struct AdminUser(pub CurrentUser);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = PortalError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        if !state.settings.features.admin_panel {
            return Err(PortalError::ServiceUnavailable("The admin panel is disabled".to_string()));
        }
        let user = CurrentUser::from_request_parts(parts, state).await?;
        require_role(&user, Role::Admin)?;
        Ok(Self(user))
    }
}

/// Signed-in teacher
#[derive(Debug, Clone)]
pub struct TeacherUser(pub CurrentUser);

impl FromRequestParts<AppState> for TeacherUser {
    type Rejection = PortalError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        require_role(&user, Role::Teacher)?;
        Ok(Self(user))
    }
}

/// Signed-in student
#[derive(Debug, Clone)]
pub struct StudentUser(pub CurrentUser);

impl FromRequestParts<AppState> for StudentUser {
    type Rejection = PortalError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        require_role(&user, Role::Student)?;
        Ok(Self(user))
    }
}
