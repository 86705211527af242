//! Task submission model

use std::fmt;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;
use crate::utils::errors::{PortalError, Result};

/// Submission lifecycle: pending -> submitted -> completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
    Submitted,
    Completed,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Submitted => "submitted",
            SubmissionStatus::Completed => "completed",
        }
    }

    pub fn transition_to(self, next: SubmissionStatus) -> Result<SubmissionStatus> {
        match (self, next) {
            (SubmissionStatus::Pending, SubmissionStatus::Submitted)
            | (SubmissionStatus::Submitted, SubmissionStatus::Completed) => Ok(next),
            _ => Err(PortalError::InvalidStateTransition {
                from: self.to_string(),
                to: next.to_string(),
            }),
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Submission {
    pub id: Uuid,
    pub task_id: Uuid,
    pub student_id: Uuid,
    pub text_response: Option<String>,
    pub file_name: Option<String>,
    pub file_url: Option<String>,
    pub file_size: Option<i64>,
    pub status: SubmissionStatus,
    pub submitted_at: Option<DateTime<Utc>>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateSubmissionRequest {
    pub text_response: Option<String>,
    pub file_name: Option<String>,
    pub file_url: Option<String>,
    pub file_size: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_transitions() {
        assert!(SubmissionStatus::Pending.transition_to(SubmissionStatus::Submitted).is_ok());
        assert!(SubmissionStatus::Submitted.transition_to(SubmissionStatus::Completed).is_ok());
        assert!(SubmissionStatus::Pending.transition_to(SubmissionStatus::Completed).is_err());
        assert!(SubmissionStatus::Completed.transition_to(SubmissionStatus::Submitted).is_err());
    }
}
