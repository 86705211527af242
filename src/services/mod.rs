//! Services module
//!
//! This module contains business logic services

pub mod admin;
pub mod approval;
pub mod auth;
pub mod dashboard;
pub mod provisioning;
pub mod registration;

// Re-export commonly used services
pub use admin::{AdminService, AdminOverview, AdminStats, UserFilter, filter_profiles};
pub use approval::ApprovalService;
pub use auth::{AuthService, Claims, Session, SignedIn};
pub use dashboard::{DashboardService, Dashboard, StudentStats, TeacherStats};
pub use provisioning::{ProvisioningClient, ProvisionRequest};
pub use registration::{RegistrationService, RegistrationForm, SignUpRequest};

use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub auth_service: AuthService,
    pub registration_service: RegistrationService,
    pub approval_service: ApprovalService,
    pub admin_service: AdminService,
    pub dashboard_service: DashboardService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(settings: &Settings, db: DatabaseService) -> Result<Self> {
        let auth_service = AuthService::new(settings, db.profiles.clone())?;
        let provisioning = ProvisioningClient::new(&settings.backend)?;

        Ok(Self {
            auth_service,
            registration_service: RegistrationService::new(db.clone(), settings.features.self_registration),
            approval_service: ApprovalService::new(db.clone(), provisioning),
            admin_service: AdminService::new(db.clone()),
            dashboard_service: DashboardService::new(db),
        })
    }
}
