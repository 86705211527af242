//! Meeting repository implementation

use sqlx::PgPool;
use chrono::Utc;
use uuid::Uuid;
use crate::models::meeting::{Meeting, MeetingWithNames, MeetingStatus, CreateMeetingRequest};
use crate::utils::errors::PortalError;

#[derive(Clone, Debug)]
pub struct MeetingRepository {
    pool: PgPool,
}

impl MeetingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new scheduled meeting
    pub async fn create(&self, teacher_id: Uuid, request: CreateMeetingRequest) -> Result<Meeting, PortalError> {
        let meeting = sqlx::query_as::<_, Meeting>(
            r#"
            INSERT INTO meetings (title, description, class_id, teacher_id, scheduled_at, status,
                                  max_participants, meeting_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING id, title, description, class_id, teacher_id, scheduled_at, started_at, ended_at,
                      status, max_participants, meeting_url, created_at, updated_at
            "#
        )
        .bind(request.title)
        .bind(request.description)
        .bind(request.class_id)
        .bind(teacher_id)
        .bind(request.scheduled_at)
        .bind(MeetingStatus::Scheduled)
        .bind(request.max_participants)
        .bind(request.meeting_url)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(meeting)
    }

    /// Find meeting by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Meeting>, PortalError> {
        let meeting = sqlx::query_as::<_, Meeting>(
            r#"
            SELECT id, title, description, class_id, teacher_id, scheduled_at, started_at, ended_at,
                   status, max_participants, meeting_url, created_at, updated_at
            FROM meetings WHERE id = $1
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(meeting)
    }

    /// Meetings hosted by a teacher
    pub async fn list_by_teacher(&self, teacher_id: Uuid) -> Result<Vec<Meeting>, PortalError> {
        let meetings = sqlx::query_as::<_, Meeting>(
            r#"
            SELECT id, title, description, class_id, teacher_id, scheduled_at, started_at, ended_at,
                   status, max_participants, meeting_url, created_at, updated_at
            FROM meetings WHERE teacher_id = $1 ORDER BY scheduled_at ASC NULLS LAST
            "#
        )
        .bind(teacher_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(meetings)
    }

    /// Meetings of any of the given classes
    pub async fn list_for_classes(&self, class_ids: &[Uuid]) -> Result<Vec<Meeting>, PortalError> {
        let meetings = sqlx::query_as::<_, Meeting>(
            r#"
            SELECT id, title, description, class_id, teacher_id, scheduled_at, started_at, ended_at,
                   status, max_participants, meeting_url, created_at, updated_at
            FROM meetings WHERE class_id = ANY($1) ORDER BY scheduled_at ASC NULLS LAST
            "#
        )
        .bind(class_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(meetings)
    }

    /// Every meeting with teacher and class names, newest first
    pub async fn list_all_with_names(&self) -> Result<Vec<MeetingWithNames>, PortalError> {
        let meetings = sqlx::query_as::<_, MeetingWithNames>(
            r#"
            SELECT m.id, m.title, m.description, m.class_id, m.teacher_id, m.scheduled_at, m.started_at,
                   m.ended_at, m.status, m.max_participants, m.meeting_url, m.created_at, m.updated_at,
                   p.name AS teacher_name, c.name AS class_name
            FROM meetings m
            LEFT JOIN profiles p ON p.id = m.teacher_id
            LEFT JOIN classes c ON c.id = m.class_id
            ORDER BY m.created_at DESC
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(meetings)
    }

    /// Move a meeting from `from` to `to`, stamping started_at / ended_at.
    ///
    /// Returns `None` when the meeting is no longer in `from`.
    pub async fn update_status(&self, id: Uuid, from: MeetingStatus, to: MeetingStatus) -> Result<Option<Meeting>, PortalError> {
        let meeting = sqlx::query_as::<_, Meeting>(
            r#"
            UPDATE meetings
            SET status = $3,
                started_at = CASE WHEN $3 = 'active'::meeting_status THEN $4 ELSE started_at END,
                ended_at = CASE WHEN $3 = 'ended'::meeting_status THEN $4 ELSE ended_at END,
                updated_at = $4
            WHERE id = $1 AND status = $2
            RETURNING id, title, description, class_id, teacher_id, scheduled_at, started_at, ended_at,
                      status, max_participants, meeting_url, created_at, updated_at
            "#
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(meeting)
    }
}
