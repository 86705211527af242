//! Dashboard service implementation
//!
//! Role-scoped dashboard reads and the teacher / student writes behind the
//! dashboard tabs: classes, tasks, submissions and meetings.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, debug};
use uuid::Uuid;
use crate::database::DatabaseService;
use crate::models::class::{Class, ClassMember, CreateClassRequest};
use crate::models::meeting::{Meeting, MeetingStatus, CreateMeetingRequest};
use crate::models::profile::{Profile, Role};
use crate::models::submission::{Submission, SubmissionStatus, CreateSubmissionRequest};
use crate::models::task::{Task, CreateTaskRequest};
use crate::services::admin::{AdminOverview, AdminService};
use crate::utils::errors::{PortalError, Result};
use crate::utils::helpers::file_extension;
use crate::utils::logging::log_user_action;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentStats {
    pub pending_tasks: usize,
    pub submitted_tasks: usize,
    pub completed_tasks: usize,
    pub next_meeting: Option<Meeting>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeacherStats {
    pub total_students: i64,
    pub tasks_created: usize,
    pub pending_reviews: usize,
    pub meetings_today: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentDashboard {
    pub profile: Profile,
    pub classes: Vec<Class>,
    pub tasks: Vec<Task>,
    pub meetings: Vec<Meeting>,
    pub submissions: Vec<Submission>,
    pub stats: StudentStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherDashboard {
    pub profile: Profile,
    pub classes: Vec<Class>,
    pub tasks: Vec<Task>,
    pub meetings: Vec<Meeting>,
    pub submissions: Vec<Submission>,
    pub stats: TeacherStats,
}

/// Dashboard payload, shaped by the caller's role
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Dashboard {
    Student(StudentDashboard),
    Teacher(TeacherDashboard),
    Admin(AdminOverview),
}

/// Counters shown on a student's overview tab
pub fn student_stats(tasks: &[Task], submissions: &[Submission], meetings: &[Meeting], now: DateTime<Utc>) -> StudentStats {
    let status_of = |task: &Task| {
        submissions.iter().find(|s| s.task_id == task.id).map(|s| s.status)
    };

    let mut stats = StudentStats::default();
    for task in tasks {
        match status_of(task) {
            Some(SubmissionStatus::Completed) => stats.completed_tasks += 1,
            Some(SubmissionStatus::Submitted) => stats.submitted_tasks += 1,
            _ => stats.pending_tasks += 1,
        }
    }

    stats.next_meeting = meetings
        .iter()
        .filter(|m| m.status == MeetingStatus::Scheduled)
        .filter(|m| m.scheduled_at.map_or(false, |at| at >= now))
        .min_by_key(|m| m.scheduled_at)
        .cloned();

    stats
}

/// Counters shown on a teacher's overview tab
pub fn teacher_stats(total_students: i64, tasks: &[Task], submissions: &[Submission], meetings: &[Meeting], today: NaiveDate) -> TeacherStats {
    TeacherStats {
        total_students,
        tasks_created: tasks.len(),
        pending_reviews: submissions
            .iter()
            .filter(|s| s.status == SubmissionStatus::Submitted)
            .count(),
        meetings_today: meetings
            .iter()
            .filter(|m| m.status != MeetingStatus::Ended)
            .filter(|m| m.scheduled_at.map_or(false, |at| at.date_naive() == today))
            .count(),
    }
}

/// Check a submission against the task's response settings
pub fn validate_submission(task: &Task, request: &CreateSubmissionRequest) -> Result<()> {
    let has_text = request.text_response.as_deref().map_or(false, |t| !t.trim().is_empty());
    let has_file = request.file_name.is_some() || request.file_url.is_some();

    if !has_text && !has_file {
        return Err(PortalError::InvalidInput("Submission is empty".to_string()));
    }

    if request.file_size.map_or(false, |size| size < 0) {
        return Err(PortalError::InvalidInput("Invalid file size".to_string()));
    }

    if has_text && !task.allow_text_response {
        return Err(PortalError::InvalidInput("This task does not accept text responses".to_string()));
    }

    if has_file {
        if !task.allow_file_upload {
            return Err(PortalError::InvalidInput("This task does not accept file uploads".to_string()));
        }

        let file_name = match (&request.file_name, &request.file_url) {
            (Some(name), Some(_)) if !name.trim().is_empty() => name,
            _ => return Err(PortalError::InvalidInput("File name and URL are required".to_string())),
        };

        if !task.allowed_file_types.is_empty() {
            let allowed = file_extension(file_name)
                .map_or(false, |ext| task.allowed_file_types.iter().any(|t| t.eq_ignore_ascii_case(&ext)));
            if !allowed {
                return Err(PortalError::InvalidInput(format!(
                    "File type not allowed. Allowed types: {}",
                    task.allowed_file_types.join(", ")
                )));
            }
        }

        if let Some(max) = task.max_file_size {
            match request.file_size {
                Some(size) if size > max => {
                    return Err(PortalError::InvalidInput(format!("File exceeds the {} byte limit", max)));
                }
                Some(_) => {}
                None => return Err(PortalError::InvalidInput("File size is required".to_string())),
            }
        }
    }

    Ok(())
}

/// Canonical form of an allowed file type: lower-case, no leading dot
fn normalize_file_type(raw: &str) -> String {
    raw.trim().trim_start_matches('.').to_lowercase()
}

fn ensure_role(profile: &Profile, role: Role) -> Result<()> {
    if profile.role == role {
        Ok(())
    } else {
        Err(PortalError::PermissionDenied(format!("Only a {} can do this", role)))
    }
}

#[derive(Clone)]
pub struct DashboardService {
    db: DatabaseService,
    admin: AdminService,
}

impl DashboardService {
    pub fn new(db: DatabaseService) -> Self {
        Self { admin: AdminService::new(db.clone()), db }
    }

    /// Load the dashboard for the caller's role
    pub async fn load(&self, profile: &Profile) -> Result<Dashboard> {
        debug!(user_id = %profile.id, role = %profile.role, "Loading dashboard");

        match profile.role {
            Role::Student => self.load_student(profile).await.map(Dashboard::Student),
            Role::Teacher => self.load_teacher(profile).await.map(Dashboard::Teacher),
            Role::Admin => self.admin.overview().await.map(Dashboard::Admin),
        }
    }

    async fn load_student(&self, profile: &Profile) -> Result<StudentDashboard> {
        let classes = self.db.classes.list_for_student(profile.id).await?;
        let class_ids: Vec<Uuid> = classes.iter().map(|c| c.id).collect();

        let (tasks, meetings, submissions) = futures::try_join!(
            self.db.tasks.list_for_classes(&class_ids),
            self.db.meetings.list_for_classes(&class_ids),
            self.db.submissions.list_by_student(profile.id),
        )?;

        let stats = student_stats(&tasks, &submissions, &meetings, Utc::now());
        Ok(StudentDashboard { profile: profile.clone(), classes, tasks, meetings, submissions, stats })
    }

    async fn load_teacher(&self, profile: &Profile) -> Result<TeacherDashboard> {
        let (classes, tasks, meetings, submissions, total_students) = futures::try_join!(
            self.db.classes.list_by_teacher(profile.id),
            self.db.tasks.list_by_teacher(profile.id),
            self.db.meetings.list_by_teacher(profile.id),
            self.db.submissions.list_for_teacher(profile.id),
            self.db.classes.count_students_for_teacher(profile.id),
        )?;

        let stats = teacher_stats(total_students, &tasks, &submissions, &meetings, Utc::now().date_naive());
        Ok(TeacherDashboard { profile: profile.clone(), classes, tasks, meetings, submissions, stats })
    }

    /// Fetch a class and check the teacher owns it
    async fn owned_class(&self, teacher: &Profile, class_id: Uuid) -> Result<Class> {
        ensure_role(teacher, Role::Teacher)?;

        let class = self.db.classes.find_by_id(class_id).await?
            .ok_or(PortalError::ClassNotFound { class_id })?;

        if class.teacher_id != Some(teacher.id) {
            return Err(PortalError::PermissionDenied("You do not teach this class".to_string()));
        }

        Ok(class)
    }

    pub async fn create_class(&self, teacher: &Profile, request: CreateClassRequest) -> Result<Class> {
        ensure_role(teacher, Role::Teacher)?;

        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(PortalError::InvalidInput("Class name is required".to_string()));
        }

        let class = self.db.classes.create(teacher.id, CreateClassRequest { name, ..request }).await?;
        log_user_action(teacher.id, "create_class", Some(&class.name));
        Ok(class)
    }

    /// Enroll a student in one of the teacher's classes
    pub async fn add_student(&self, teacher: &Profile, class_id: Uuid, student_id: Uuid) -> Result<ClassMember> {
        self.owned_class(teacher, class_id).await?;

        let student = self.db.profiles.find_by_id(student_id).await?
            .ok_or(PortalError::ProfileNotFound { user_id: student_id })?;

        if student.role != Role::Student {
            return Err(PortalError::InvalidInput("Only students can be added to a class".to_string()));
        }

        let member = self.db.classes.add_member(class_id, student_id).await?;
        log_user_action(teacher.id, "add_student", Some(&student.email));
        Ok(member)
    }

    pub async fn create_task(&self, teacher: &Profile, request: CreateTaskRequest) -> Result<Task> {
        self.owned_class(teacher, request.class_id).await?;

        let title = request.title.trim().to_string();
        if title.is_empty() {
            return Err(PortalError::InvalidInput("Task title is required".to_string()));
        }

        if !request.allow_text_response && !request.allow_file_upload {
            return Err(PortalError::InvalidInput(
                "A task must accept text responses or file uploads".to_string()
            ));
        }

        if request.max_file_size.map_or(false, |max| max <= 0) {
            return Err(PortalError::InvalidInput("Max file size must be positive".to_string()));
        }

        let allowed_file_types: Vec<String> = request.allowed_file_types
            .iter()
            .map(|t| normalize_file_type(t))
            .filter(|t| !t.is_empty())
            .collect();

        let task = self.db.tasks.create(teacher.id, CreateTaskRequest { title, allowed_file_types, ..request }).await?;
        log_user_action(teacher.id, "create_task", Some(&task.title));
        Ok(task)
    }

    pub async fn create_meeting(&self, teacher: &Profile, request: CreateMeetingRequest) -> Result<Meeting> {
        self.owned_class(teacher, request.class_id).await?;

        let title = request.title.trim().to_string();
        if title.is_empty() {
            return Err(PortalError::InvalidInput("Meeting title is required".to_string()));
        }

        if request.max_participants.map_or(false, |max| max <= 0) {
            return Err(PortalError::InvalidInput("Max participants must be positive".to_string()));
        }

        let meeting = self.db.meetings.create(teacher.id, CreateMeetingRequest { title, ..request }).await?;
        log_user_action(teacher.id, "create_meeting", Some(&meeting.title));
        Ok(meeting)
    }

    pub async fn start_meeting(&self, teacher: &Profile, meeting_id: Uuid) -> Result<Meeting> {
        self.advance_meeting(teacher, meeting_id, MeetingStatus::Active).await
    }

    pub async fn end_meeting(&self, teacher: &Profile, meeting_id: Uuid) -> Result<Meeting> {
        self.advance_meeting(teacher, meeting_id, MeetingStatus::Ended).await
    }

    async fn advance_meeting(&self, teacher: &Profile, meeting_id: Uuid, next: MeetingStatus) -> Result<Meeting> {
        ensure_role(teacher, Role::Teacher)?;

        let meeting = self.db.meetings.find_by_id(meeting_id).await?
            .ok_or(PortalError::MeetingNotFound { meeting_id })?;

        if meeting.teacher_id != Some(teacher.id) {
            return Err(PortalError::PermissionDenied("You do not host this meeting".to_string()));
        }

        meeting.status.transition_to(next)?;

        // The status may have moved since the read.
        let updated = self.db.meetings.update_status(meeting_id, meeting.status, next).await?
            .ok_or_else(|| PortalError::InvalidStateTransition {
                from: meeting.status.to_string(),
                to: next.to_string(),
            })?;

        info!(meeting_id = %meeting_id, status = %updated.status, "Meeting status changed");
        Ok(updated)
    }

    /// Hand in a task; one submission per task and student
    pub async fn submit_task(&self, student: &Profile, task_id: Uuid, request: CreateSubmissionRequest) -> Result<Submission> {
        ensure_role(student, Role::Student)?;

        let task = self.db.tasks.find_by_id(task_id).await?
            .ok_or(PortalError::TaskNotFound { task_id })?;

        let is_member = match task.class_id {
            Some(class_id) => self.db.classes.is_member(class_id, student.id).await?,
            None => false,
        };
        if !is_member {
            return Err(PortalError::PermissionDenied("You are not enrolled in this class".to_string()));
        }

        validate_submission(&task, &request)?;

        let submission = self.db.submissions.create_submitted(task_id, student.id, request).await.map_err(|e| {
            if e.is_unique_violation() {
                PortalError::InvalidInput("You have already submitted this task".to_string())
            } else {
                e
            }
        })?;

        log_user_action(student.id, "submit_task", Some(&task.title));
        Ok(submission)
    }

    /// Mark a submitted task as completed
    pub async fn review_submission(&self, teacher: &Profile, submission_id: Uuid) -> Result<Submission> {
        ensure_role(teacher, Role::Teacher)?;

        let submission = self.db.submissions.find_by_id(submission_id).await?
            .ok_or(PortalError::SubmissionNotFound { submission_id })?;

        let task = self.db.tasks.find_by_id(submission.task_id).await?
            .ok_or(PortalError::TaskNotFound { task_id: submission.task_id })?;

        if task.teacher_id != Some(teacher.id) {
            return Err(PortalError::PermissionDenied("You did not set this task".to_string()));
        }

        submission.status.transition_to(SubmissionStatus::Completed)?;

        let reviewed = self.db.submissions.mark_reviewed(submission_id, teacher.id).await?
            .ok_or_else(|| PortalError::InvalidStateTransition {
                from: submission.status.to_string(),
                to: SubmissionStatus::Completed.to_string(),
            })?;

        log_user_action(teacher.id, "review_submission", Some(&submission_id.to_string()));
        Ok(reviewed)
    }
}
