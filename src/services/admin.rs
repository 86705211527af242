//! Admin dashboard service
//!
//! Read side of the admin dashboard plus institute ID management.

use serde::{Deserialize, Serialize};
use tracing::{info, debug};
use uuid::Uuid;
use crate::database::DatabaseService;
use crate::models::class::ClassWithTeacher;
use crate::models::institute::{InstituteId, CreateInstituteRequest};
use crate::models::meeting::{MeetingStatus, MeetingWithNames};
use crate::models::pending_user::PendingUser;
use crate::models::profile::{Profile, Role, RoleFilter};
use crate::models::task::TaskWithNames;
use crate::utils::errors::{PortalError, Result};
use crate::utils::helpers::contains_ignore_case;
use crate::utils::logging::log_admin_action;

/// Search box plus role selector of the user table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserFilter {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub role: RoleFilter,
}

impl UserFilter {
    pub fn matches(&self, profile: &Profile) -> bool {
        let text_match = contains_ignore_case(&profile.name, &self.search)
            || contains_ignore_case(&profile.email, &self.search);
        text_match && self.role.matches(profile.role)
    }
}

/// Keep the profiles a filter selects, preserving order
pub fn filter_profiles(profiles: &[Profile], filter: &UserFilter) -> Vec<Profile> {
    profiles.iter().filter(|p| filter.matches(p)).cloned().collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminStats {
    pub total_users: i64,
    pub students: i64,
    pub teachers: i64,
    pub admins: i64,
    pub total_classes: i64,
    pub active_meetings: i64,
    pub pending_registrations: i64,
}

impl AdminStats {
    pub fn compute(role_counts: &[(Role, i64)], classes: usize, meetings: &[MeetingWithNames], pending: i64) -> Self {
        let count = |role: Role| {
            role_counts.iter().filter(|(r, _)| *r == role).map(|(_, n)| *n).sum::<i64>()
        };

        Self {
            total_users: role_counts.iter().map(|(_, n)| n).sum(),
            students: count(Role::Student),
            teachers: count(Role::Teacher),
            admins: count(Role::Admin),
            total_classes: classes as i64,
            active_meetings: meetings
                .iter()
                .filter(|m| m.meeting.status == MeetingStatus::Active)
                .count() as i64,
            pending_registrations: pending,
        }
    }
}

/// Everything the admin dashboard shows on load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminOverview {
    pub profiles: Vec<Profile>,
    pub classes: Vec<ClassWithTeacher>,
    pub tasks: Vec<TaskWithNames>,
    pub meetings: Vec<MeetingWithNames>,
    pub stats: AdminStats,
}

#[derive(Clone)]
pub struct AdminService {
    db: DatabaseService,
}

impl AdminService {
    pub fn new(db: DatabaseService) -> Self {
        Self { db }
    }

    /// Load the admin dashboard
    pub async fn overview(&self) -> Result<AdminOverview> {
        let (profiles, classes, tasks, meetings, role_counts, pending) = futures::try_join!(
            self.db.profiles.list_all(),
            self.db.classes.list_all_with_teacher(),
            self.db.tasks.list_all_with_names(),
            self.db.meetings.list_all_with_names(),
            self.db.profiles.count_by_role(),
            self.db.pending_users.count(),
        )?;

        let stats = AdminStats::compute(&role_counts, classes.len(), &meetings, pending);
        debug!(users = stats.total_users, classes = stats.total_classes, "Admin overview loaded");

        Ok(AdminOverview { profiles, classes, tasks, meetings, stats })
    }

    /// Profiles matching the user table filter, newest first
    pub async fn users(&self, filter: &UserFilter) -> Result<Vec<Profile>> {
        let profiles = self.db.profiles.list_all().await?;
        Ok(filter_profiles(&profiles, filter))
    }

    /// Pending registrations, oldest first
    pub async fn pending_users(&self) -> Result<Vec<PendingUser>> {
        self.db.pending_users.list().await
    }

    pub async fn institutes(&self) -> Result<Vec<InstituteId>> {
        self.db.institutes.list_all().await
    }

    /// Register a new institute ID
    pub async fn create_institute(&self, admin: &Profile, request: CreateInstituteRequest) -> Result<InstituteId> {
        let request = CreateInstituteRequest {
            institute_id: request.institute_id.trim().to_string(),
            institute_name: request.institute_name.trim().to_string(),
            is_active: request.is_active,
        };

        if request.institute_id.is_empty() || request.institute_name.is_empty() {
            return Err(PortalError::InvalidInput("Institute ID and name are required".to_string()));
        }

        let institute = self.db.institutes.create(request).await.map_err(|e| {
            if e.is_unique_violation() {
                PortalError::InvalidInput("This institute ID already exists".to_string())
            } else {
                e
            }
        })?;

        log_admin_action(admin.id, "create_institute", Some(&institute.institute_id), None);
        Ok(institute)
    }

    /// Flip an institute ID between active and inactive
    pub async fn toggle_institute(&self, admin: &Profile, id: Uuid) -> Result<InstituteId> {
        let institute = self.db.institutes.toggle_active(id).await?
            .ok_or(PortalError::InstituteNotFound { institute_id: id })?;

        log_admin_action(
            admin.id,
            "toggle_institute",
            Some(&institute.institute_id),
            Some(if institute.is_active { "active" } else { "inactive" }),
        );
        info!(institute_id = %institute.institute_id, is_active = institute.is_active, "Institute status changed");
        Ok(institute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;

    fn profile(name: &str, email: &str, role: Role) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            institute_id: "MIT-001".to_string(),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn people() -> Vec<Profile> {
        vec![
            profile("Jane Doe", "jane@school.edu", Role::Student),
            profile("John Smith", "jsmith@school.edu", Role::Teacher),
            profile("Root", "admin@school.edu", Role::Admin),
        ]
    }

    #[test]
    fn test_empty_filter_keeps_everyone() {
        assert_eq!(filter_profiles(&people(), &UserFilter::default()).len(), 3);
    }

    #[test]
    fn test_search_matches_name_or_email() {
        let filter = UserFilter { search: "SMITH".to_string(), role: RoleFilter::All };
        let found = filter_profiles(&people(), &filter);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "John Smith");

        let filter = UserFilter { search: "admin@".to_string(), role: RoleFilter::All };
        assert_eq!(filter_profiles(&people(), &filter)[0].role, Role::Admin);
    }

    #[test]
    fn test_search_term_is_not_trimmed() {
        let filter = UserFilter { search: " ".to_string(), role: RoleFilter::All };
        let found = filter_profiles(&people(), &filter);
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|p| p.name.contains(' ')));

        let filter = UserFilter { search: "doe ".to_string(), role: RoleFilter::All };
        assert!(filter_profiles(&people(), &filter).is_empty());
    }

    #[test]
    fn test_search_and_role_must_both_match() {
        let filter = UserFilter { search: "school.edu".to_string(), role: RoleFilter::Teacher };
        let found = filter_profiles(&people(), &filter);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].role, Role::Teacher);

        let filter = UserFilter { search: "jane".to_string(), role: RoleFilter::Teacher };
        assert!(filter_profiles(&people(), &filter).is_empty());
    }

    #[test]
    fn test_admin_stats() {
        let counts = vec![(Role::Student, 4), (Role::Teacher, 2), (Role::Admin, 1)];
        let stats = AdminStats::compute(&counts, 3, &[], 5);
        assert_eq!(stats.total_users, 7);
        assert_eq!(stats.students, 4);
        assert_eq!(stats.total_classes, 3);
        assert_eq!(stats.active_meetings, 0);
        assert_eq!(stats.pending_registrations, 5);
    }

    proptest! {
        #[test]
        fn filter_selects_exactly_matching_profiles(search in "[a-zA-Z@. ]{0,6}", role_idx in 0usize..4) {
            let role = [RoleFilter::All, RoleFilter::Student, RoleFilter::Teacher, RoleFilter::Admin][role_idx];
            let filter = UserFilter { search: search.clone(), role };
            let all = people();
            let found = filter_profiles(&all, &filter);
            for p in &all {
                let expected = (p.name.to_lowercase().contains(&search.to_lowercase())
                    || p.email.to_lowercase().contains(&search.to_lowercase()))
                    && role.matches(p.role);
                prop_assert_eq!(found.iter().any(|f| f.id == p.id), expected);
            }
        }
    }
}
