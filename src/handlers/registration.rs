//! Registration handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use crate::models::institute::InstituteId;
use crate::models::pending_user::{PendingUser, RegistrationState};
use crate::services::registration::SignUpRequest;
use crate::state::AppState;
use crate::utils::errors::Result;
use super::json_body;

/// Confirmation shown after a sign-up
pub const PENDING_MESSAGE: &str =
    "Registration submitted! Your account is pending admin approval.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationSubmitted {
    pub message: String,
    pub pending_user: PendingUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusQuery {
    pub email: String,
}

/// GET /api/registration/institutes
pub async fn open_form(State(state): State<AppState>) -> Result<Json<Vec<InstituteId>>> {
    let form = state.services.registration_service.open_form().await?;
    Ok(Json(form.institutes().to_vec()))
}

/// POST /api/registration
pub async fn submit(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SignUpRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegistrationSubmitted>)> {
    let request = json_body(payload)?;

    let pending_user = state.services.registration_service.submit(request).await?;
    Ok((StatusCode::CREATED, Json(RegistrationSubmitted {
        message: PENDING_MESSAGE.to_string(),
        pending_user,
    })))
}

/// GET /api/registration/status?email=
pub async fn status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<RegistrationState>> {
    let registration = state.services.registration_service.status(&query.email).await?;
    Ok(Json(registration))
}
