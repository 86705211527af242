//! Database service layer
//!
//! This module bundles every repository behind one cloneable handle

use crate::database::{
    DatabasePool, ProfileRepository, PendingUserRepository, InstituteRepository, ClassRepository,
    TaskRepository, MeetingRepository, SubmissionRepository,
};

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub profiles: ProfileRepository,
    pub pending_users: PendingUserRepository,
    pub institutes: InstituteRepository,
    pub classes: ClassRepository,
    pub tasks: TaskRepository,
    pub meetings: MeetingRepository,
    pub submissions: SubmissionRepository,
    pool: DatabasePool,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            profiles: ProfileRepository::new(pool.clone()),
            pending_users: PendingUserRepository::new(pool.clone()),
            institutes: InstituteRepository::new(pool.clone()),
            classes: ClassRepository::new(pool.clone()),
            tasks: TaskRepository::new(pool.clone()),
            meetings: MeetingRepository::new(pool.clone()),
            submissions: SubmissionRepository::new(pool.clone()),
            pool,
        }
    }

    /// Underlying connection pool
    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    /// Whether the store answers a trivial query
    pub async fn is_healthy(&self) -> bool {
        crate::database::health_check(&self.pool).await.is_ok()
    }
}
