//! Shared application state
//!
//! One `AppState` is built at startup and cloned into every request.

use std::sync::Arc;
use crate::config::Settings;
use crate::database::DatabaseService;
use crate::services::ServiceFactory;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub db: DatabaseService,
    pub services: Arc<ServiceFactory>,
}

impl AppState {
    pub fn new(settings: Settings, db: DatabaseService, services: ServiceFactory) -> Self {
        Self {
            settings: Arc::new(settings),
            db,
            services: Arc::new(services),
        }
    }

    /// Build the state and all services from settings and a store handle
    pub fn from_settings(settings: Settings, db: DatabaseService) -> crate::Result<Self> {
        let services = ServiceFactory::new(&settings, db.clone())?;
        Ok(Self::new(settings, db, services))
    }
}
