//! Pending user (registration awaiting approval) model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;
use super::profile::Role;

/// Staging record created on sign-up. Rows are inserted and deleted, never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PendingUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub institute_id: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePendingUserRequest {
    pub name: String,
    pub email: String,
    pub institute_id: String,
    pub role: Role,
}

/// Where a registration stands. Rejected rows are deleted, so a rejected
/// email reads as `Unsubmitted` and may register again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RegistrationState {
    Unsubmitted,
    PendingApproval { pending_user_id: Uuid },
    Approved { profile_id: Uuid },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_state_serialization() {
        let id = Uuid::new_v4();
        let state = RegistrationState::PendingApproval { pending_user_id: id };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["state"], "pending_approval");
        assert_eq!(json["pending_user_id"], id.to_string());

        let json = serde_json::to_value(RegistrationState::Unsubmitted).unwrap();
        assert_eq!(json["state"], "unsubmitted");
    }
}
