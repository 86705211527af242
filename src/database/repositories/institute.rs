//! Institute ID repository implementation

use sqlx::PgPool;
use chrono::Utc;
use uuid::Uuid;
use crate::models::institute::{InstituteId, CreateInstituteRequest};
use crate::utils::errors::PortalError;

#[derive(Clone, Debug)]
pub struct InstituteRepository {
    pool: PgPool,
}

impl InstituteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new institute ID
    pub async fn create(&self, request: CreateInstituteRequest) -> Result<InstituteId, PortalError> {
        let institute = sqlx::query_as::<_, InstituteId>(
            r#"
            INSERT INTO institute_ids (institute_id, institute_name, is_active, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, institute_id, institute_name, is_active, created_at
            "#
        )
        .bind(request.institute_id)
        .bind(request.institute_name)
        .bind(request.is_active)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(institute)
    }

    /// Find institute by row ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<InstituteId>, PortalError> {
        let institute = sqlx::query_as::<_, InstituteId>(
            "SELECT id, institute_id, institute_name, is_active, created_at FROM institute_ids WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(institute)
    }

    /// List every institute ID
    pub async fn list_all(&self) -> Result<Vec<InstituteId>, PortalError> {
        let institutes = sqlx::query_as::<_, InstituteId>(
            "SELECT id, institute_id, institute_name, is_active, created_at FROM institute_ids ORDER BY institute_name ASC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(institutes)
    }

    /// List institute IDs open for registration
    pub async fn list_active(&self) -> Result<Vec<InstituteId>, PortalError> {
        let institutes = sqlx::query_as::<_, InstituteId>(
            "SELECT id, institute_id, institute_name, is_active, created_at FROM institute_ids WHERE is_active = true ORDER BY institute_name ASC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(institutes)
    }

    /// Flip the active flag
    pub async fn toggle_active(&self, id: Uuid) -> Result<Option<InstituteId>, PortalError> {
        let institute = sqlx::query_as::<_, InstituteId>(
            r#"
            UPDATE institute_ids
            SET is_active = NOT is_active
            WHERE id = $1
            RETURNING id, institute_id, institute_name, is_active, created_at
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(institute)
    }
}
