//! Dashboard handlers
//!
//! Role-scoped dashboard read plus the teacher and student writes.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::middleware::auth::{CurrentUser, StudentUser, TeacherUser};
use crate::models::class::{Class, ClassMember, CreateClassRequest};
use crate::models::meeting::{Meeting, CreateMeetingRequest};
use crate::models::submission::{Submission, CreateSubmissionRequest};
use crate::models::task::{Task, CreateTaskRequest};
use crate::services::dashboard::Dashboard;
use crate::state::AppState;
use crate::utils::errors::Result;
use super::{json_body, parse_id};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddStudentRequest {
    pub student_id: Uuid,
}

/// GET /api/dashboard
pub async fn load(State(state): State<AppState>, user: CurrentUser) -> Result<Json<Dashboard>> {
    let dashboard = state.services.dashboard_service.load(&user.profile).await?;
    Ok(Json(dashboard))
}

/// POST /api/classes
pub async fn create_class(
    State(state): State<AppState>,
    TeacherUser(user): TeacherUser,
    payload: std::result::Result<Json<CreateClassRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Class>)> {
    let body = json_body(payload)?;
    let class = state.services.dashboard_service.create_class(&user.profile, body).await?;
    Ok((StatusCode::CREATED, Json(class)))
}

/// POST /api/classes/{id}/members
pub async fn add_student(
    State(state): State<AppState>,
    TeacherUser(user): TeacherUser,
    Path(id): Path<String>,
    payload: std::result::Result<Json<AddStudentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ClassMember>)> {
    let class_id = parse_id(&id)?;
    let body = json_body(payload)?;
    let member = state.services.dashboard_service
        .add_student(&user.profile, class_id, body.student_id)
        .await?;
    Ok((StatusCode::CREATED, Json(member)))
}

/// POST /api/tasks
pub async fn create_task(
    State(state): State<AppState>,
    TeacherUser(user): TeacherUser,
    payload: std::result::Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>)> {
    let body = json_body(payload)?;
    let task = state.services.dashboard_service.create_task(&user.profile, body).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// POST /api/tasks/{id}/submissions
pub async fn submit_task(
    State(state): State<AppState>,
    StudentUser(user): StudentUser,
    Path(id): Path<String>,
    payload: std::result::Result<Json<CreateSubmissionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Submission>)> {
    let task_id = parse_id(&id)?;
    let body = json_body(payload)?;
    let submission = state.services.dashboard_service
        .submit_task(&user.profile, task_id, body)
        .await?;
    Ok((StatusCode::CREATED, Json(submission)))
}

/// POST /api/submissions/{id}/review
pub async fn review_submission(
    State(state): State<AppState>,
    TeacherUser(user): TeacherUser,
    Path(id): Path<String>,
) -> Result<Json<Submission>> {
    let submission_id = parse_id(&id)?;
    let submission = state.services.dashboard_service
        .review_submission(&user.profile, submission_id)
        .await?;
    Ok(Json(submission))
}

/// POST /api/meetings
pub async fn create_meeting(
    State(state): State<AppState>,
    TeacherUser(user): TeacherUser,
    payload: std::result::Result<Json<CreateMeetingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Meeting>)> {
    let body = json_body(payload)?;
    let meeting = state.services.dashboard_service.create_meeting(&user.profile, body).await?;
    Ok((StatusCode::CREATED, Json(meeting)))
}

/// POST /api/meetings/{id}/start
pub async fn start_meeting(
    State(state): State<AppState>,
    TeacherUser(user): TeacherUser,
    Path(id): Path<String>,
) -> Result<Json<Meeting>> {
    let meeting_id = parse_id(&id)?;
    let meeting = state.services.dashboard_service.start_meeting(&user.profile, meeting_id).await?;
    Ok(Json(meeting))
}

/// POST /api/meetings/{id}/end
pub async fn end_meeting(
    State(state): State<AppState>,
    TeacherUser(user): TeacherUser,
    Path(id): Path<String>,
) -> Result<Json<Meeting>> {
    let meeting_id = parse_id(&id)?;
    let meeting = state.services.dashboard_service.end_meeting(&user.profile, meeting_id).await?;
    Ok(Json(meeting))
}
