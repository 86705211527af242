//! Pending user repository implementation
//!
//! Pending rows are only ever inserted and deleted.

use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use chrono::Utc;
use uuid::Uuid;
use crate::models::pending_user::{PendingUser, CreatePendingUserRequest};
use crate::utils::errors::PortalError;

#[derive(Clone, Debug)]
pub struct PendingUserRepository {
    pool: PgPool,
}

impl PendingUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Start a transaction on the underlying pool
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, PortalError> {
        Ok(self.pool.begin().await?)
    }

    /// Create a new pending registration
    pub async fn create(&self, request: CreatePendingUserRequest) -> Result<PendingUser, PortalError> {
        let pending = sqlx::query_as::<_, PendingUser>(
            r#"
            INSERT INTO pending_users (name, email, institute_id, role, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, institute_id, role, created_at
            "#
        )
        .bind(request.name)
        .bind(request.email)
        .bind(request.institute_id)
        .bind(request.role)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(pending)
    }

    /// Find pending registration by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<PendingUser>, PortalError> {
        let pending = sqlx::query_as::<_, PendingUser>(
            "SELECT id, name, email, institute_id, role, created_at FROM pending_users WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(pending)
    }

    /// Find pending registration by email, ignoring case
    pub async fn find_by_email(&self, email: &str) -> Result<Option<PendingUser>, PortalError> {
        let pending = sqlx::query_as::<_, PendingUser>(
            "SELECT id, name, email, institute_id, role, created_at FROM pending_users WHERE LOWER(email) = LOWER($1)"
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(pending)
    }

    /// List pending registrations, oldest first
    pub async fn list(&self) -> Result<Vec<PendingUser>, PortalError> {
        let pending = sqlx::query_as::<_, PendingUser>(
            "SELECT id, name, email, institute_id, role, created_at FROM pending_users ORDER BY created_at ASC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(pending)
    }

    /// Lock a pending row for the rest of the transaction
    pub async fn lock_for_update(&self, conn: &mut PgConnection, id: Uuid) -> Result<Option<PendingUser>, PortalError> {
        let pending = sqlx::query_as::<_, PendingUser>(
            "SELECT id, name, email, institute_id, role, created_at FROM pending_users WHERE id = $1 FOR UPDATE"
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(pending)
    }

    /// Delete a pending row inside a transaction; returns whether a row was removed
    pub async fn delete_in(&self, conn: &mut PgConnection, id: Uuid) -> Result<bool, PortalError> {
        let result = sqlx::query("DELETE FROM pending_users WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a pending row; returns whether a row was removed
    pub async fn delete(&self, id: Uuid) -> Result<bool, PortalError> {
        let result = sqlx::query("DELETE FROM pending_users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count pending registrations
    pub async fn count(&self) -> Result<i64, PortalError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM pending_users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
