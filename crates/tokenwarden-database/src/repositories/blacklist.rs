//! Blacklist repository implementation.

use sqlx::PgExecutor;

use tokenwarden_core::error::{AppError, ErrorKind};
use tokenwarden_core::result::AppResult;

/// Queries against the `blacklist` table.
#[derive(Debug, Clone, Copy)]
pub struct BlacklistRepository;

impl BlacklistRepository {
    /// Record a revoked token. Inserting an existing token is a no-op.
    pub async fn insert<'e, E>(executor: E, access_token: &str) -> AppResult<()>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query(
            "INSERT INTO blacklist (access_token) VALUES ($1) ON CONFLICT (access_token) DO NOTHING",
        )
        .bind(access_token)
        .execute(executor)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to insert blacklist entry", e)
        })?;
        Ok(())
    }

    /// Whether the exact token string is blacklisted.
    pub async fn contains<'e, E>(executor: E, access_token: &str) -> AppResult<bool>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM blacklist WHERE access_token = $1)",
        )
        .bind(access_token)
        .fetch_one(executor)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check blacklist", e))
    }
}
