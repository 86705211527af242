//! Class model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Class {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub teacher_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Class joined with its teacher's profile, as listed on the admin dashboard
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ClassWithTeacher {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub class: Class,
    pub teacher_name: Option<String>,
    pub teacher_email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ClassMember {
    pub id: Uuid,
    pub class_id: Uuid,
    pub student_id: Uuid,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateClassRequest {
    pub name: String,
    pub description: Option<String>,
}
