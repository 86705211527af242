//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod profile;
pub mod pending_user;
pub mod institute;
pub mod class;
pub mod task;
pub mod meeting;
pub mod submission;

// Re-export repositories
pub use profile::ProfileRepository;
pub use pending_user::PendingUserRepository;
pub use institute::InstituteRepository;
pub use class::ClassRepository;
pub use task::TaskRepository;
pub use meeting::MeetingRepository;
pub use submission::SubmissionRepository;
