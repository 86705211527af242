//! Authentication service implementation
//!
//! This service talks to the hosted auth service for password sign-in and
//! sign-out, verifies the access tokens it issues, and resolves the caller's
//! profile for role checks.

use std::time::Duration;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{info, warn, debug};
use uuid::Uuid;
use crate::config::settings::Settings;
use crate::database::repositories::ProfileRepository;
use crate::middleware::rate_limit::{RateLimitConfig, SignInLimiter};
use crate::models::profile::{Profile, Role};
use crate::utils::errors::{PortalError, HostedAuthError, Result};
use crate::utils::helpers::normalize_email;
use crate::utils::logging::log_api_error;

/// Audience the hosted auth service puts on user access tokens
pub const TOKEN_AUDIENCE: &str = "authenticated";

/// Shown when a non-admin uses the admin sign-in
pub const ADMIN_REQUIRED_MESSAGE: &str = "Access denied. Admin credentials required.";

/// Session returned by the password grant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub user: SessionUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: Option<String>,
}

/// Successful sign-in: the hosted session plus the portal profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedIn {
    pub session: Session,
    pub profile: Profile,
}

/// Claims carried by a hosted access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: Option<String>,
    pub exp: usize,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

/// Authentication service backed by the hosted auth endpoints
#[derive(Clone)]
pub struct AuthService {
    client: Client,
    base_url: String,
    anon_key: String,
    decoding_key: DecodingKey,
    profiles: ProfileRepository,
    limiter: SignInLimiter,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(settings: &Settings, profiles: ProfileRepository) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.backend.timeout_seconds))
            .user_agent(concat!("TechMeet/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.backend.url.trim_end_matches('/').to_string(),
            anon_key: settings.backend.anon_key.clone(),
            decoding_key: DecodingKey::from_secret(settings.backend.jwt_secret.as_bytes()),
            profiles,
            limiter: SignInLimiter::new(RateLimitConfig::from(&settings.auth)),
        })
    }

    /// Sign in with email and password and load the matching profile
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SignedIn> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(PortalError::InvalidInput("Email and password are required".to_string()));
        }

        self.limiter.check(&email)?;
        let session = self.password_grant(&email, password).await?;
        self.limiter.reset(&email);

        let profile = self.profiles.find_by_id(session.user.id).await?
            .ok_or_else(|| {
                warn!(user_id = %session.user.id, "Signed in user has no profile");
                PortalError::Authentication("No profile found for this account".to_string())
            })?;

        info!(user_id = %profile.id, role = %profile.role, "User signed in");
        Ok(SignedIn { session, profile })
    }

    /// Sign in and require the admin role; other sessions are signed out again
    pub async fn sign_in_admin(&self, email: &str, password: &str) -> Result<SignedIn> {
        let signed_in = self.sign_in(email, password).await?;

        if signed_in.profile.role != Role::Admin {
            warn!(user_id = %signed_in.profile.id, "Non-admin attempted admin sign-in");
            if let Err(e) = self.sign_out(&signed_in.session.access_token).await {
                warn!(error = %e, "Failed to sign out rejected admin session");
            }
            return Err(PortalError::PermissionDenied(ADMIN_REQUIRED_MESSAGE.to_string()));
        }

        Ok(signed_in)
    }

    /// End a session at the hosted auth service
    pub async fn sign_out(&self, access_token: &str) -> Result<()> {
        let url = format!("{}/auth/v1/logout", self.base_url);

        let response = self.client
            .post(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(map_transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log_api_error("auth/logout", &format!("HTTP {}", status), Some(&body));
            return Err(HostedAuthError::RequestFailed(format!("HTTP {}: {}", status, body)).into());
        }

        debug!("Session signed out");
        Ok(())
    }

    /// Verify an access token issued by the hosted auth service
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[TOKEN_AUDIENCE]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }

    /// Resolve the profile behind an access token
    pub async fn authenticate(&self, token: &str) -> Result<Profile> {
        let claims = self.verify_token(token)?;

        self.profiles.find_by_id(claims.sub).await?
            .ok_or_else(|| PortalError::Authentication("No profile found for this account".to_string()))
    }

    async fn password_grant(&self, email: &str, password: &str) -> Result<Session> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url);

        let response = self.client
            .post(&url)
            .header("apikey", &self.anon_key)
            .json(&PasswordGrant { email, password })
            .send()
            .await
            .map_err(map_transport_error)?;

        match response.status() {
            status if status.is_success() => {
                let session = response.json::<Session>().await
                    .map_err(|e| HostedAuthError::InvalidResponse(e.to_string()))?;
                Ok(session)
            }
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                debug!(email = email, "Hosted auth rejected credentials");
                Err(HostedAuthError::InvalidCredentials.into())
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                log_api_error("auth/token", &format!("HTTP {}", status), Some(&body));
                Err(HostedAuthError::RequestFailed(format!("HTTP {}: {}", status, body)).into())
            }
        }
    }
}

fn map_transport_error(e: reqwest::Error) -> PortalError {
    if e.is_timeout() {
        HostedAuthError::Timeout.into()
    } else {
        HostedAuthError::RequestFailed(e.to_string()).into()
    }
}
