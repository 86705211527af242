//! Mock hosted backend for testing
//!
//! Simulates the hosted auth endpoints and the provisioning function with
//! wiremock, and issues access tokens signed with the test secret.

use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use uuid::Uuid;
use wiremock::{
    matchers::{body_partial_json, header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

pub const TEST_ANON_KEY: &str = "test-anon-key";
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-with-enough-length";
pub const PROVISIONING_PATH: &str = "/functions/v1/create-user";

/// Sign an access token the way the hosted auth service does
pub fn issue_token(user_id: Uuid, email: &str) -> String {
    let claims = json!({
        "sub": user_id,
        "email": email,
        "aud": "authenticated",
        "role": "authenticated",
        "exp": chrono::Utc::now().timestamp() + 3600,
    });
    encode(&Header::default(), &claims, &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()))
        .expect("token encodes")
}

/// Mock hosted backend server
pub struct BackendMockServer {
    pub server: MockServer,
}

impl BackendMockServer {
    pub async fn new() -> Self {
        Self { server: MockServer::start().await }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Password grant succeeds for `email` and returns a session for `user_id`
    pub async fn mock_sign_in_success(&self, email: &str, user_id: Uuid) {
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "password"))
            .and(header("apikey", TEST_ANON_KEY))
            .and(body_partial_json(json!({ "email": email })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": issue_token(user_id, email),
                "token_type": "bearer",
                "expires_in": 3600,
                "refresh_token": "refresh-token",
                "user": { "id": user_id, "email": email }
            })))
            .mount(&self.server)
            .await;
    }

    /// Password grant rejects every credential
    pub async fn mock_sign_in_invalid(&self) {
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid login credentials"
            })))
            .mount(&self.server)
            .await;
    }

    /// Logout succeeds; `expected` is the number of calls the test expects
    pub async fn mock_sign_out(&self, expected: u64) {
        Mock::given(method("POST"))
            .and(path("/auth/v1/logout"))
            .respond_with(ResponseTemplate::new(204))
            .expect(expected)
            .mount(&self.server)
            .await;
    }

    /// Provisioning function creates `user_id`
    pub async fn mock_provision_success(&self, user_id: Uuid) {
        Mock::given(method("POST"))
            .and(path(PROVISIONING_PATH))
            .and(header("apikey", TEST_ANON_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "user_id": user_id
            })))
            .mount(&self.server)
            .await;
    }

    /// Provisioning function fails with an error body
    pub async fn mock_provision_error(&self, status: u16, message: &str) {
        Mock::given(method("POST"))
            .and(path(PROVISIONING_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({ "error": message })))
            .mount(&self.server)
            .await;
    }
}
