//! HTTP surface tests: routing, extractors and error toasts

mod helpers;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use helpers::*;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

async fn send(state: TechMeet::AppState, request: Request<Body>) -> (StatusCode, Value) {
    let response = TechMeet::app(state).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_dashboard_requires_token() {
    let (_backend, state) = offline_state().await;

    let (status, body) = send(state, Request::get("/api/dashboard").body(Body::empty()).unwrap()).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["title"], "Error");
    assert!(body["description"].is_string());
}

#[tokio::test]
async fn test_forged_token_is_unauthorized() {
    let (_backend, state) = offline_state().await;
    let request = Request::get("/api/admin/overview")
        .header(header::AUTHORIZATION, "Bearer not.a.token")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(state, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["title"], "Error");
}

#[tokio::test]
async fn test_mismatched_passwords_toast() {
    let (_backend, state) = offline_state().await;
    let request = post_json("/api/registration", json!({
        "name": "Jane Doe",
        "email": "jane@school.edu",
        "institute_id": "MIT-001",
        "role": "student",
        "password": "secret123",
        "confirm_password": "secret124"
    }));

    let (status, body) = send(state, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "title": "Error", "description": "Passwords do not match" }));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let (_backend, state) = offline_state().await;
    let request = Request::post("/api/registration")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();

    let (status, body) = send(state, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["title"], "Error");
}

#[tokio::test]
async fn test_sign_in_with_bad_credentials() {
    let (backend, state) = offline_state().await;
    backend.mock_sign_in_invalid().await;

    let (status, body) = send(state, post_json("/api/auth/sign-in", json!({
        "email": "jane@school.edu",
        "password": "wrong"
    }))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["title"], "Error");
}

#[tokio::test]
async fn test_sign_out_without_token() {
    let (_backend, state) = offline_state().await;

    let (status, _) = send(state, Request::post("/api/auth/sign-out").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_reports_unreachable_store() {
    let (_backend, state) = offline_state().await;

    let (status, body) = send(state, Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["database"], false);
}

#[tokio::test]
async fn test_unknown_route() {
    let (_backend, state) = offline_state().await;
    let uri = format!("/api/nowhere/{}", Uuid::new_v4());

    let (status, _) = send(state, Request::get(uri.as_str()).body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
