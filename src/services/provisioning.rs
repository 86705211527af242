//! Account provisioning client
//!
//! Calls the hosted backend function that creates a real account for an
//! approved registration. The call is made with the approving admin's
//! session token; the function answers `{"success": true, "user_id": ..}`
//! or `{"error": ..}`.

use std::time::Duration;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, debug};
use uuid::Uuid;
use crate::config::settings::BackendConfig;
use crate::models::pending_user::PendingUser;
use crate::models::profile::Role;
use crate::utils::errors::{ProvisioningError, ProvisioningResult, Result};
use crate::utils::logging::log_api_error;

/// Body sent to the provisioning function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvisionRequest {
    pub name: String,
    pub email: String,
    pub institute_id: String,
    pub role: Role,
}

impl From<&PendingUser> for ProvisionRequest {
    fn from(pending: &PendingUser) -> Self {
        Self {
            name: pending.name.clone(),
            email: pending.email.clone(),
            institute_id: pending.institute_id.clone(),
            role: pending.role,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProvisionResponse {
    #[serde(default)]
    success: bool,
    user_id: Option<Uuid>,
    error: Option<String>,
}

/// HTTP client for the provisioning function
#[derive(Clone, Debug)]
pub struct ProvisioningClient {
    client: Client,
    endpoint: String,
    anon_key: String,
}

impl ProvisioningClient {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("TechMeet/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/functions/v1/{}",
                config.url.trim_end_matches('/'),
                config.provisioning_function
            ),
            anon_key: config.anon_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Create the account; returns the id of the new user
    pub async fn create_user(&self, access_token: &str, request: &ProvisionRequest) -> ProvisioningResult<Uuid> {
        debug!(email = %request.email, role = %request.role, "Calling provisioning function");

        let response = self.client
            .post(&self.endpoint)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProvisioningError::Timeout
                } else {
                    ProvisioningError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        let text = response.text().await
            .map_err(|e| ProvisioningError::RequestFailed(e.to_string()))?;
        let body = serde_json::from_str::<ProvisionResponse>(&text).ok();

        if let Some(message) = body.as_ref().and_then(|b| b.error.clone()) {
            log_api_error("provisioning", &message, Some(&request.email));
            return Err(ProvisioningError::Rejected(message));
        }

        if !status.is_success() {
            log_api_error("provisioning", &format!("HTTP {}", status), Some(&text));
            return Err(ProvisioningError::RequestFailed(format!("HTTP {}", status)));
        }

        match body {
            Some(ProvisionResponse { success: true, user_id: Some(user_id), .. }) => {
                info!(user_id = %user_id, email = %request.email, "Account provisioned");
                Ok(user_id)
            }
            _ => {
                log_api_error("provisioning", "unexpected response", Some(&text));
                Err(ProvisioningError::InvalidResponse(text))
            }
        }
    }
}
