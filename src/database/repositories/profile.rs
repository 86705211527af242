//! Profile repository implementation

use sqlx::{PgConnection, PgPool};
use chrono::Utc;
use uuid::Uuid;
use crate::models::profile::{Profile, Role, CreateProfileRequest};
use crate::utils::errors::PortalError;

#[derive(Clone, Debug)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a profile inside a transaction; `None` when the id is already taken
    pub async fn insert_in(&self, conn: &mut PgConnection, request: CreateProfileRequest) -> Result<Option<Profile>, PortalError> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (id, name, email, institute_id, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            ON CONFLICT (id) DO NOTHING
            RETURNING id, name, email, institute_id, role, created_at, updated_at
            "#
        )
        .bind(request.id)
        .bind(request.name)
        .bind(request.email)
        .bind(request.institute_id)
        .bind(request.role)
        .bind(Utc::now())
        .fetch_optional(conn)
        .await?;

        Ok(profile)
    }

    /// Create a new profile
    pub async fn create(&self, request: CreateProfileRequest) -> Result<Profile, PortalError> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (id, name, email, institute_id, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING id, name, email, institute_id, role, created_at, updated_at
            "#
        )
        .bind(request.id)
        .bind(request.name)
        .bind(request.email)
        .bind(request.institute_id)
        .bind(request.role)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Find profile by ID on a transaction's connection
    pub async fn find_by_id_in(&self, conn: &mut PgConnection, id: Uuid) -> Result<Option<Profile>, PortalError> {
        let profile = sqlx::query_as::<_, Profile>(
            "SELECT id, name, email, institute_id, role, created_at, updated_at FROM profiles WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(profile)
    }

    /// Find profile by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, PortalError> {
        let profile = sqlx::query_as::<_, Profile>(
            "SELECT id, name, email, institute_id, role, created_at, updated_at FROM profiles WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Find profile by email, ignoring case
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Profile>, PortalError> {
        let profile = sqlx::query_as::<_, Profile>(
            "SELECT id, name, email, institute_id, role, created_at, updated_at FROM profiles WHERE LOWER(email) = LOWER($1)"
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// List all profiles, newest first
    pub async fn list_all(&self) -> Result<Vec<Profile>, PortalError> {
        let profiles = sqlx::query_as::<_, Profile>(
            "SELECT id, name, email, institute_id, role, created_at, updated_at FROM profiles ORDER BY created_at DESC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(profiles)
    }

    /// Count profiles with an email, ignoring case
    pub async fn count_by_email(&self, email: &str) -> Result<i64, PortalError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM profiles WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Number of profiles per role
    pub async fn count_by_role(&self) -> Result<Vec<(Role, i64)>, PortalError> {
        let counts = sqlx::query_as::<_, (Role, i64)>(
            "SELECT role, COUNT(*) FROM profiles GROUP BY role"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }
}
