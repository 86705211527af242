//! Sign-in and sign-out handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};
use crate::middleware::auth::bearer_token;
use crate::services::auth::SignedIn;
use crate::state::AppState;
use crate::utils::errors::Result;
use super::json_body;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/auth/sign-in
pub async fn sign_in(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SignInRequest>, JsonRejection>,
) -> Result<Json<SignedIn>> {
    let body = json_body(payload)?;
    let signed_in = state.services.auth_service.sign_in(&body.email, &body.password).await?;
    Ok(Json(signed_in))
}

/// POST /api/auth/admin/sign-in
pub async fn sign_in_admin(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SignInRequest>, JsonRejection>,
) -> Result<Json<SignedIn>> {
    let body = json_body(payload)?;
    let signed_in = state.services.auth_service.sign_in_admin(&body.email, &body.password).await?;
    Ok(Json(signed_in))
}

/// POST /api/auth/sign-out
pub async fn sign_out(State(state): State<AppState>, headers: HeaderMap) -> Result<StatusCode> {
    let token = bearer_token(&headers)?;
    state.services.auth_service.sign_out(&token).await?;
    Ok(StatusCode::NO_CONTENT)
}
