//! Task model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub class_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
    pub due_date: Option<DateTime<Utc>>,
    pub allow_text_response: bool,
    pub allow_file_upload: bool,
    pub allowed_file_types: Vec<String>,
    pub max_file_size: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Task joined with teacher and class names
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TaskWithNames {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub task: Task,
    pub teacher_name: Option<String>,
    pub class_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub class_id: Uuid,
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    pub allow_text_response: bool,
    #[serde(default)]
    pub allow_file_upload: bool,
    #[serde(default)]
    pub allowed_file_types: Vec<String>,
    pub max_file_size: Option<i64>,
}

fn default_true() -> bool {
    true
}
