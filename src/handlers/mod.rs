//! HTTP handlers module
//!
//! This module contains the JSON API organized by area:
//! - Auth handlers for sign-in and sign-out
//! - Registration handlers for the sign-up side of the approval workflow
//! - Dashboard handlers for teacher and student actions
//! - Admin handlers for users, institute IDs and pending registrations

pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod registration;

use axum::extract::rejection::JsonRejection;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{middleware, Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;
use uuid::Uuid;
use crate::middleware::{http_trace_layer, track_performance};
use crate::state::AppState;
use crate::utils::errors::{PortalError, Result};
use crate::utils::logging::log_request_error;

/// Error toast shown by the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toast {
    pub title: String,
    pub description: String,
}

impl Toast {
    pub fn error(description: impl Into<String>) -> Self {
        Self { title: "Error".to_string(), description: description.into() }
    }
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        log_request_error(&self);
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(Toast::error(self.user_message()))).into_response()
    }
}

/// Unwrap a JSON body, turning a malformed payload into a toast
pub(crate) fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| PortalError::InvalidInput(e.body_text()))
}

/// Parse a path segment as a row id
pub(crate) fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| PortalError::InvalidInput("Invalid id".to_string()))
}

/// API routes without layers
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/sign-in", post(auth::sign_in))
        .route("/auth/admin/sign-in", post(auth::sign_in_admin))
        .route("/auth/sign-out", post(auth::sign_out))
        .route("/registration/institutes", get(registration::open_form))
        .route("/registration", post(registration::submit))
        .route("/registration/status", get(registration::status))
        .route("/dashboard", get(dashboard::load))
        .route("/classes", post(dashboard::create_class))
        .route("/classes/{id}/members", post(dashboard::add_student))
        .route("/tasks", post(dashboard::create_task))
        .route("/tasks/{id}/submissions", post(dashboard::submit_task))
        .route("/submissions/{id}/review", post(dashboard::review_submission))
        .route("/meetings", post(dashboard::create_meeting))
        .route("/meetings/{id}/start", post(dashboard::start_meeting))
        .route("/meetings/{id}/end", post(dashboard::end_meeting))
        .route("/admin/overview", get(admin::overview))
        .route("/admin/users", get(admin::users))
        .route("/admin/institutes", get(admin::institutes).post(admin::create_institute))
        .route("/admin/institutes/{id}/toggle", post(admin::toggle_institute))
        .route("/admin/pending-users", get(admin::pending_users))
        .route("/admin/pending-users/{id}/approve", post(admin::approve))
        .route("/admin/pending-users/{id}", delete(admin::reject))
}

/// CORS policy for the configured client origins
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// Full application router with state and layers applied
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.settings.server.cors_origins);

    Router::new()
        .route("/health", get(health::health))
        .nest("/api", api_routes())
        .layer(middleware::from_fn(track_performance))
        .layer(cors)
        .layer(http_trace_layer())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_becomes_toast() {
        let response = PortalError::InvalidInput("Passwords do not match".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = PortalError::PendingUserNotFound { pending_user_id: Uuid::nil() }.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_parse_id() {
        assert!(parse_id("not-a-uuid").is_err());
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
    }
}
