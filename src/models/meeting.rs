//! Meeting model

use std::fmt;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;
use crate::utils::errors::{PortalError, Result};

/// Meeting lifecycle: scheduled -> active -> ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "meeting_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MeetingStatus {
    Scheduled,
    Active,
    Ended,
}

impl MeetingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingStatus::Scheduled => "scheduled",
            MeetingStatus::Active => "active",
            MeetingStatus::Ended => "ended",
        }
    }

    /// Validate a lifecycle step
    pub fn transition_to(self, next: MeetingStatus) -> Result<MeetingStatus> {
        match (self, next) {
            (MeetingStatus::Scheduled, MeetingStatus::Active)
            | (MeetingStatus::Active, MeetingStatus::Ended) => Ok(next),
            _ => Err(PortalError::InvalidStateTransition {
                from: self.to_string(),
                to: next.to_string(),
            }),
        }
    }
}

impl fmt::Display for MeetingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Meeting {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub class_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub status: MeetingStatus,
    pub max_participants: Option<i32>,
    pub meeting_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Meeting joined with teacher and class names
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MeetingWithNames {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub meeting: Meeting,
    pub teacher_name: Option<String>,
    pub class_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMeetingRequest {
    pub title: String,
    pub description: Option<String>,
    pub class_id: Uuid,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub max_participants: Option<i32>,
    pub meeting_url: Option<String>,
}
