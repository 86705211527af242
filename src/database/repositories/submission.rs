//! Task submission repository implementation

use sqlx::PgPool;
use chrono::Utc;
use uuid::Uuid;
use crate::models::submission::{Submission, SubmissionStatus, CreateSubmissionRequest};
use crate::utils::errors::PortalError;

#[derive(Clone, Debug)]
pub struct SubmissionRepository {
    pool: PgPool,
}

impl SubmissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a handed-in submission
    pub async fn create_submitted(&self, task_id: Uuid, student_id: Uuid, request: CreateSubmissionRequest) -> Result<Submission, PortalError> {
        let submission = sqlx::query_as::<_, Submission>(
            r#"
            INSERT INTO task_submissions (task_id, student_id, text_response, file_name, file_url, file_size,
                                          status, submitted_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, task_id, student_id, text_response, file_name, file_url, file_size, status,
                      submitted_at, reviewed_at, reviewed_by
            "#
        )
        .bind(task_id)
        .bind(student_id)
        .bind(request.text_response)
        .bind(request.file_name)
        .bind(request.file_url)
        .bind(request.file_size)
        .bind(SubmissionStatus::Submitted)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(submission)
    }

    /// Find submission by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Submission>, PortalError> {
        let submission = sqlx::query_as::<_, Submission>(
            r#"
            SELECT id, task_id, student_id, text_response, file_name, file_url, file_size, status,
                   submitted_at, reviewed_at, reviewed_by
            FROM task_submissions WHERE id = $1
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(submission)
    }

    /// Submissions made by a student
    pub async fn list_by_student(&self, student_id: Uuid) -> Result<Vec<Submission>, PortalError> {
        let submissions = sqlx::query_as::<_, Submission>(
            r#"
            SELECT id, task_id, student_id, text_response, file_name, file_url, file_size, status,
                   submitted_at, reviewed_at, reviewed_by
            FROM task_submissions WHERE student_id = $1 ORDER BY submitted_at DESC NULLS LAST
            "#
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(submissions)
    }

    /// Submissions to tasks created by a teacher
    pub async fn list_for_teacher(&self, teacher_id: Uuid) -> Result<Vec<Submission>, PortalError> {
        let submissions = sqlx::query_as::<_, Submission>(
            r#"
            SELECT s.id, s.task_id, s.student_id, s.text_response, s.file_name, s.file_url, s.file_size,
                   s.status, s.submitted_at, s.reviewed_at, s.reviewed_by
            FROM task_submissions s
            JOIN tasks t ON t.id = s.task_id
            WHERE t.teacher_id = $1
            ORDER BY s.submitted_at DESC NULLS LAST
            "#
        )
        .bind(teacher_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(submissions)
    }

    /// Mark a submitted entry as completed; `None` if it is not in `submitted`
    pub async fn mark_reviewed(&self, id: Uuid, reviewer_id: Uuid) -> Result<Option<Submission>, PortalError> {
        let submission = sqlx::query_as::<_, Submission>(
            r#"
            UPDATE task_submissions
            SET status = $3, reviewed_at = $4, reviewed_by = $5
            WHERE id = $1 AND status = $2
            RETURNING id, task_id, student_id, text_response, file_name, file_url, file_size, status,
                      submitted_at, reviewed_at, reviewed_by
            "#
        )
        .bind(id)
        .bind(SubmissionStatus::Submitted)
        .bind(SubmissionStatus::Completed)
        .bind(Utc::now())
        .bind(reviewer_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(submission)
    }
}
