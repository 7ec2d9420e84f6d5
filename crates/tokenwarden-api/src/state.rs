//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use tokenwarden_auth::SessionLifecycleManager;
use tokenwarden_core::config::AppConfig;
use tokenwarden_database::DatabasePool;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are cheap to clone across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Session token lifecycle
    pub sessions: Arc<SessionLifecycleManager>,
    /// PostgreSQL pool, absent when running on the in-memory store
    pub db_pool: Option<DatabasePool>,
}

impl AppState {
    /// Creates the state from its parts.
    pub fn new(
        config: Arc<AppConfig>,
        sessions: Arc<SessionLifecycleManager>,
        db_pool: Option<DatabasePool>,
    ) -> Self {
        Self {
            config,
            sessions,
            db_pool,
        }
    }
}
