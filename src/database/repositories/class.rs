//! Class repository implementation

use sqlx::PgPool;
use chrono::Utc;
use uuid::Uuid;
use crate::models::class::{Class, ClassMember, ClassWithTeacher, CreateClassRequest};
use crate::utils::errors::PortalError;

#[derive(Clone, Debug)]
pub struct ClassRepository {
    pool: PgPool,
}

impl ClassRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new class owned by a teacher
    pub async fn create(&self, teacher_id: Uuid, request: CreateClassRequest) -> Result<Class, PortalError> {
        let class = sqlx::query_as::<_, Class>(
            r#"
            INSERT INTO classes (name, description, teacher_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING id, name, description, teacher_id, created_at, updated_at
            "#
        )
        .bind(request.name)
        .bind(request.description)
        .bind(teacher_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(class)
    }

    /// Find class by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Class>, PortalError> {
        let class = sqlx::query_as::<_, Class>(
            "SELECT id, name, description, teacher_id, created_at, updated_at FROM classes WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(class)
    }

    /// Classes taught by a teacher
    pub async fn list_by_teacher(&self, teacher_id: Uuid) -> Result<Vec<Class>, PortalError> {
        let classes = sqlx::query_as::<_, Class>(
            "SELECT id, name, description, teacher_id, created_at, updated_at FROM classes WHERE teacher_id = $1 ORDER BY created_at DESC"
        )
        .bind(teacher_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(classes)
    }

    /// Classes a student has joined
    pub async fn list_for_student(&self, student_id: Uuid) -> Result<Vec<Class>, PortalError> {
        let classes = sqlx::query_as::<_, Class>(
            r#"
            SELECT c.id, c.name, c.description, c.teacher_id, c.created_at, c.updated_at
            FROM classes c
            JOIN class_members m ON m.class_id = c.id
            WHERE m.student_id = $1
            ORDER BY c.created_at DESC
            "#
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(classes)
    }

    /// Every class with its teacher's name and email, newest first
    pub async fn list_all_with_teacher(&self) -> Result<Vec<ClassWithTeacher>, PortalError> {
        let classes = sqlx::query_as::<_, ClassWithTeacher>(
            r#"
            SELECT c.id, c.name, c.description, c.teacher_id, c.created_at, c.updated_at,
                   p.name AS teacher_name, p.email AS teacher_email
            FROM classes c
            LEFT JOIN profiles p ON p.id = c.teacher_id
            ORDER BY c.created_at DESC
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(classes)
    }

    /// Add a student to a class; adding twice keeps the original membership
    pub async fn add_member(&self, class_id: Uuid, student_id: Uuid) -> Result<ClassMember, PortalError> {
        let member = sqlx::query_as::<_, ClassMember>(
            r#"
            INSERT INTO class_members (class_id, student_id, joined_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (class_id, student_id) DO UPDATE SET joined_at = class_members.joined_at
            RETURNING id, class_id, student_id, joined_at
            "#
        )
        .bind(class_id)
        .bind(student_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(member)
    }

    /// Check if a student belongs to a class
    pub async fn is_member(&self, class_id: Uuid, student_id: Uuid) -> Result<bool, PortalError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM class_members WHERE class_id = $1 AND student_id = $2"
        )
        .bind(class_id)
        .bind(student_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 > 0)
    }

    /// Distinct students across a teacher's classes
    pub async fn count_students_for_teacher(&self, teacher_id: Uuid) -> Result<i64, PortalError> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(DISTINCT m.student_id)
            FROM class_members m
            JOIN classes c ON c.id = m.class_id
            WHERE c.teacher_id = $1
            "#
        )
        .bind(teacher_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }
}
