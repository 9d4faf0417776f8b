//! Shared application state
//! 
//! Cloned into every handler through axum's `State` extractor.

use sqlx::SqlitePool;

use crate::config::environment::EnvironmentConfig;
use crate::middleware::rate_limit::RateLimitState;
use crate::services::file_storage::FileStorage;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: EnvironmentConfig,
    pub storage: FileStorage,
    pub rate_limit: RateLimitState,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: EnvironmentConfig) -> Self {
        Self {
            storage: FileStorage::new(config.upload_dir.clone()),
            rate_limit: RateLimitState::new(&config),
            pool,
            config,
        }
    }
}
