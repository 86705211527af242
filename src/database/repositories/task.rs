//! Task repository implementation

use sqlx::PgPool;
use chrono::Utc;
use uuid::Uuid;
use crate::models::task::{Task, TaskWithNames, CreateTaskRequest};
use crate::utils::errors::PortalError;

#[derive(Clone, Debug)]
pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new task
    pub async fn create(&self, teacher_id: Uuid, request: CreateTaskRequest) -> Result<Task, PortalError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, class_id, teacher_id, due_date, allow_text_response,
                               allow_file_upload, allowed_file_types, max_file_size, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            RETURNING id, title, description, class_id, teacher_id, due_date, allow_text_response,
                      allow_file_upload, allowed_file_types, max_file_size, created_at, updated_at
            "#
        )
        .bind(request.title)
        .bind(request.description)
        .bind(request.class_id)
        .bind(teacher_id)
        .bind(request.due_date)
        .bind(request.allow_text_response)
        .bind(request.allow_file_upload)
        .bind(request.allowed_file_types)
        .bind(request.max_file_size)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    /// Find task by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, PortalError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, class_id, teacher_id, due_date, allow_text_response,
                   allow_file_upload, allowed_file_types, max_file_size, created_at, updated_at
            FROM tasks WHERE id = $1
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    /// Tasks created by a teacher
    pub async fn list_by_teacher(&self, teacher_id: Uuid) -> Result<Vec<Task>, PortalError> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, class_id, teacher_id, due_date, allow_text_response,
                   allow_file_upload, allowed_file_types, max_file_size, created_at, updated_at
            FROM tasks WHERE teacher_id = $1 ORDER BY created_at DESC
            "#
        )
        .bind(teacher_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    /// Tasks belonging to any of the given classes, soonest due first
    pub async fn list_for_classes(&self, class_ids: &[Uuid]) -> Result<Vec<Task>, PortalError> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, class_id, teacher_id, due_date, allow_text_response,
                   allow_file_upload, allowed_file_types, max_file_size, created_at, updated_at
            FROM tasks WHERE class_id = ANY($1) ORDER BY due_date ASC NULLS LAST, created_at DESC
            "#
        )
        .bind(class_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    /// Every task with teacher and class names, newest first
    pub async fn list_all_with_names(&self) -> Result<Vec<TaskWithNames>, PortalError> {
        let tasks = sqlx::query_as::<_, TaskWithNames>(
            r#"
            SELECT t.id, t.title, t.description, t.class_id, t.teacher_id, t.due_date, t.allow_text_response,
                   t.allow_file_upload, t.allowed_file_types, t.max_file_size, t.created_at, t.updated_at,
                   p.name AS teacher_name, c.name AS class_name
            FROM tasks t
            LEFT JOIN profiles p ON p.id = t.teacher_id
            LEFT JOIN classes c ON c.id = t.class_id
            ORDER BY t.created_at DESC
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }
}
