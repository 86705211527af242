//! Approval service implementation
//!
//! Admin side of the registration workflow. Approval provisions the account
//! and turns the pending user into a profile; rejection just drops the row.

use tracing::{info, warn};
use uuid::Uuid;
use crate::database::DatabaseService;
use crate::models::pending_user::PendingUser;
use crate::models::profile::{Profile, Role, CreateProfileRequest};
use crate::services::provisioning::{ProvisioningClient, ProvisionRequest};
use crate::utils::errors::{PortalError, ProvisioningError, Result};
use crate::utils::logging::log_admin_action;

#[derive(Clone)]
pub struct ApprovalService {
    db: DatabaseService,
    provisioning: ProvisioningClient,
}

impl ApprovalService {
    pub fn new(db: DatabaseService, provisioning: ProvisioningClient) -> Self {
        Self { db, provisioning }
    }

    /// Approve a pending registration.
    ///
    /// The pending row stays locked until the profile is written, so two
    /// admins approving the same request cannot both provision it. An existing
    /// profile under the provisioned id is never rewritten. Any failure rolls
    /// back and leaves the pending row in place.
    pub async fn approve(&self, admin: &Profile, access_token: &str, pending_user_id: Uuid) -> Result<Profile> {
        ensure_admin(admin)?;

        let mut tx = self.db.pending_users.begin().await?;

        let pending = self.db.pending_users.lock_for_update(&mut tx, pending_user_id).await?
            .ok_or(PortalError::PendingUserNotFound { pending_user_id })?;

        let user_id = self.provisioning
            .create_user(access_token, &ProvisionRequest::from(&pending))
            .await
            .map_err(|e| {
                warn!(pending_user_id = %pending_user_id, error = %e, "Provisioning failed, pending user kept");
                e
            })?;

        let inserted = self.db.profiles.insert_in(&mut tx, CreateProfileRequest {
            id: user_id,
            name: pending.name.clone(),
            email: pending.email.clone(),
            institute_id: pending.institute_id.clone(),
            role: pending.role,
        }).await?;

        let profile = match inserted {
            Some(profile) => profile,
            None => match self.db.profiles.find_by_id_in(&mut tx, user_id).await? {
                // An earlier approval of this registration already wrote the profile.
                Some(existing) if same_account(&existing, &pending) => existing,
                _ => {
                    warn!(user_id = %user_id, pending_user_id = %pending_user_id, "Provisioned id belongs to another profile");
                    return Err(ProvisioningError::Conflict { user_id }.into());
                }
            },
        };

        self.db.pending_users.delete_in(&mut tx, pending_user_id).await?;
        tx.commit().await?;

        log_admin_action(admin.id, "approve_registration", Some(&profile.email), Some(profile.role.as_str()));
        info!(profile_id = %profile.id, pending_user_id = %pending_user_id, "Registration approved");
        Ok(profile)
    }

    /// Reject a pending registration by deleting it
    pub async fn reject(&self, admin: &Profile, pending_user_id: Uuid) -> Result<()> {
        ensure_admin(admin)?;

        if !self.db.pending_users.delete(pending_user_id).await? {
            return Err(PortalError::PendingUserNotFound { pending_user_id });
        }

        log_admin_action(admin.id, "reject_registration", Some(&pending_user_id.to_string()), None);
        Ok(())
    }
}

fn same_account(profile: &Profile, pending: &PendingUser) -> bool {
    profile.email.eq_ignore_ascii_case(&pending.email) && profile.role == pending.role
}

fn ensure_admin(profile: &Profile) -> Result<()> {
    if profile.role == Role::Admin {
        Ok(())
    } else {
        Err(PortalError::PermissionDenied("Admin privileges required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn profile(email: &str, role: Role) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            name: "Jane Doe".to_string(),
            email: email.to_string(),
            institute_id: "MIT-001".to_string(),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn pending(email: &str, role: Role) -> PendingUser {
        PendingUser {
            id: Uuid::new_v4(),
            name: "Jane Doe".to_string(),
            email: email.to_string(),
            institute_id: "MIT-001".to_string(),
            role,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_same_account_needs_email_and_role() {
        let pending = pending("jane@school.edu", Role::Student);
        assert!(same_account(&profile("Jane@School.edu", Role::Student), &pending));
        assert!(!same_account(&profile("jane@school.edu", Role::Teacher), &pending));
        assert!(!same_account(&profile("john@school.edu", Role::Student), &pending));
    }

    #[test]
    fn test_only_admins_pass() {
        assert!(ensure_admin(&profile("root@school.edu", Role::Admin)).is_ok());
        assert!(matches!(
            ensure_admin(&profile("jane@school.edu", Role::Teacher)),
            Err(PortalError::PermissionDenied(_))
        ));
    }
}
