//! Admin dashboard handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use crate::middleware::auth::AdminUser;
use crate::models::institute::{InstituteId, CreateInstituteRequest};
use crate::models::pending_user::PendingUser;
use crate::models::profile::Profile;
use crate::services::admin::{AdminOverview, UserFilter};
use crate::state::AppState;
use crate::utils::errors::Result;
use super::{json_body, parse_id};

/// GET /api/admin/overview
pub async fn overview(State(state): State<AppState>, _admin: AdminUser) -> Result<Json<AdminOverview>> {
    Ok(Json(state.services.admin_service.overview().await?))
}

/// GET /api/admin/users?search=&role=
pub async fn users(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(filter): Query<UserFilter>,
) -> Result<Json<Vec<Profile>>> {
    Ok(Json(state.services.admin_service.users(&filter).await?))
}

/// GET /api/admin/institutes
pub async fn institutes(State(state): State<AppState>, _admin: AdminUser) -> Result<Json<Vec<InstituteId>>> {
    Ok(Json(state.services.admin_service.institutes().await?))
}

/// POST /api/admin/institutes
pub async fn create_institute(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    payload: std::result::Result<Json<CreateInstituteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<InstituteId>)> {
    let body = json_body(payload)?;
    let institute = state.services.admin_service.create_institute(&admin.profile, body).await?;
    Ok((StatusCode::CREATED, Json(institute)))
}

/// POST /api/admin/institutes/{id}/toggle
pub async fn toggle_institute(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<InstituteId>> {
    let id = parse_id(&id)?;
    Ok(Json(state.services.admin_service.toggle_institute(&admin.profile, id).await?))
}

/// GET /api/admin/pending-users
pub async fn pending_users(State(state): State<AppState>, _admin: AdminUser) -> Result<Json<Vec<PendingUser>>> {
    Ok(Json(state.services.admin_service.pending_users().await?))
}

/// POST /api/admin/pending-users/{id}/approve
pub async fn approve(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<Profile>> {
    let pending_user_id = parse_id(&id)?;
    let profile = state.services.approval_service
        .approve(&admin.profile, &admin.access_token, pending_user_id)
        .await?;
    Ok(Json(profile))
}

/// DELETE /api/admin/pending-users/{id}
pub async fn reject(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let pending_user_id = parse_id(&id)?;
    state.services.approval_service.reject(&admin.profile, pending_user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
