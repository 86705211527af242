//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod profile;
pub mod pending_user;
pub mod institute;
pub mod class;
pub mod task;
pub mod meeting;
pub mod submission;

// Re-export commonly used models
pub use profile::{Profile, Role, RoleFilter, CreateProfileRequest};
pub use pending_user::{PendingUser, CreatePendingUserRequest, RegistrationState};
pub use institute::{InstituteId, CreateInstituteRequest};
pub use class::{Class, ClassMember, ClassWithTeacher, CreateClassRequest};
pub use task::{Task, TaskWithNames, CreateTaskRequest};
pub use meeting::{Meeting, MeetingWithNames, MeetingStatus, CreateMeetingRequest};
pub use submission::{Submission, SubmissionStatus, CreateSubmissionRequest};
