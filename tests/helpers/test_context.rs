//! Test context for unified test setup
//!
//! This module provides a unified test context that wires the mock backend,
//! a test database and the full service stack together.

use TechMeet::config::Settings;
use TechMeet::database::{pool_options, DatabaseService};
use TechMeet::state::AppState;

use super::backend_mock::{BackendMockServer, TEST_ANON_KEY, TEST_JWT_SECRET};
use super::database_helper::TestDatabase;

/// Settings pointing at the mock backend
pub fn test_settings(backend_url: &str, database_url: &str) -> Settings {
    let mut settings = Settings::default();
    settings.database.url = database_url.to_string();
    settings.backend.url = backend_url.to_string();
    settings.backend.anon_key = TEST_ANON_KEY.to_string();
    settings.backend.jwt_secret = TEST_JWT_SECRET.to_string();
    settings.backend.timeout_seconds = 5;
    settings.auth.max_sign_in_attempts = 3;
    settings
}

/// Unified test context that manages all test components
pub struct TestContext {
    pub database: TestDatabase,
    pub backend: BackendMockServer,
    pub db: DatabaseService,
    pub state: AppState,
}

impl TestContext {
    /// Create a context backed by a real database; `None` when none is reachable
    pub async fn try_new() -> Option<Self> {
        let database = TestDatabase::try_new().await?;
        let backend = BackendMockServer::new().await;
        let settings = test_settings(&backend.uri(), &database.database_url);
        let db = DatabaseService::new(database.pool.clone());
        let state = AppState::from_settings(settings, db.clone()).expect("services build");

        Some(Self { database, backend, db, state })
    }
}

/// State whose pool never connects, for paths that must not touch the store
pub async fn offline_state() -> (BackendMockServer, AppState) {
    let backend = BackendMockServer::new().await;
    let mut settings = test_settings(&backend.uri(), "postgresql://127.0.0.1:1/unreachable");
    settings.database.min_connections = 0;
    settings.database.acquire_timeout_seconds = 1;
    let pool = pool_options(&settings.database)
        .connect_lazy(&settings.database.url)
        .expect("lazy pool");
    let state = AppState::from_settings(settings, DatabaseService::new(pool)).expect("services build");
    (backend, state)
}
