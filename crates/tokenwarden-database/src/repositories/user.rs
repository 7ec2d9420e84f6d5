//! User repository implementation.

use sqlx::PgExecutor;

use tokenwarden_core::error::{AppError, ErrorKind};
use tokenwarden_core::result::AppResult;
use tokenwarden_core::types::UserId;
use tokenwarden_entity::user::User;

/// Queries against the `users` table.
#[derive(Debug, Clone, Copy)]
pub struct UserRepository;

impl UserRepository {
    /// Insert the user if missing and return the stored row.
    pub async fn upsert<'e, E>(executor: E, guid: UserId) -> AppResult<User>
    where
        E: PgExecutor<'e>,
    {
        // The no-op update makes RETURNING yield the existing row on conflict.
        sqlx::query_as::<_, User>(
            "INSERT INTO users (guid) VALUES ($1) \
             ON CONFLICT (guid) DO UPDATE SET guid = EXCLUDED.guid \
             RETURNING guid, created_at",
        )
        .bind(guid)
        .fetch_one(executor)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert user", e))
    }

    /// Take a row lock on the user so concurrent rotations serialize.
    pub async fn lock<'e, E>(executor: E, guid: UserId) -> AppResult<()>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query("SELECT guid FROM users WHERE guid = $1 FOR UPDATE")
            .bind(guid)
            .fetch_optional(executor)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock user", e))?;
        Ok(())
    }
}
