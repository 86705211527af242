//! Test data helpers
//!
//! Builders for profiles, institute IDs and sign-up forms with fake names
//! and addresses.

use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use uuid::Uuid;
use TechMeet::database::DatabaseService;
use TechMeet::models::{CreateInstituteRequest, CreateProfileRequest, InstituteId, Profile, Role};
use TechMeet::services::SignUpRequest;

pub fn fake_name() -> String {
    Name().fake()
}

/// Unique, lower-cased email
pub fn fake_email() -> String {
    let email: String = SafeEmail().fake();
    format!("{}.{}", &Uuid::new_v4().simple().to_string()[..6], email.to_lowercase())
}

pub fn sign_up(institute_id: &str, role: Role) -> SignUpRequest {
    SignUpRequest {
        name: fake_name(),
        email: fake_email(),
        institute_id: institute_id.to_string(),
        role,
        password: "secret123".to_string(),
        confirm_password: "secret123".to_string(),
    }
}

pub async fn create_institute(db: &DatabaseService, code: &str, active: bool) -> InstituteId {
    db.institutes
        .create(CreateInstituteRequest {
            institute_id: code.to_string(),
            institute_name: format!("{} Institute", code),
            is_active: active,
        })
        .await
        .expect("institute created")
}

pub async fn create_profile(db: &DatabaseService, role: Role) -> Profile {
    db.profiles
        .create(CreateProfileRequest {
            id: Uuid::new_v4(),
            name: fake_name(),
            email: fake_email(),
            institute_id: "MIT-001".to_string(),
            role,
        })
        .await
        .expect("profile created")
}
