//! Session repository implementation.

use sqlx::PgExecutor;

use tokenwarden_core::error::{AppError, ErrorKind};
use tokenwarden_core::result::AppResult;
use tokenwarden_core::types::{SessionId, UserId};
use tokenwarden_entity::session::{NewSession, SessionRecord};

const COLUMNS: &str =
    "id, user_id, refresh_digest, active, device_tag, source_address, created_at";

/// Queries against the `sessions` table.
#[derive(Debug, Clone, Copy)]
pub struct SessionRepository;

impl SessionRepository {
    /// List the active sessions of a user, newest first.
    pub async fn find_active_by_user<'e, E>(
        executor: E,
        user_id: UserId,
    ) -> AppResult<Vec<SessionRecord>>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM sessions WHERE user_id = $1 AND active \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, SessionRecord>(&query)
            .bind(user_id)
            .fetch_all(executor)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find active sessions", e)
            })
    }

    /// Insert a new active session and return its id.
    pub async fn create<'e, E>(executor: E, data: &NewSession) -> AppResult<SessionId>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, SessionId>(
            "INSERT INTO sessions (user_id, refresh_digest, active, device_tag, source_address) \
             VALUES ($1, $2, TRUE, $3, $4) RETURNING id",
        )
        .bind(data.user_id)
        .bind(&data.refresh_digest)
        .bind(&data.device_tag)
        .bind(&data.source_address)
        .fetch_one(executor)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create session", e))
    }

    /// Flip `active` to false. Deactivating an inactive row is a no-op.
    pub async fn deactivate<'e, E>(executor: E, id: SessionId) -> AppResult<()>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query("UPDATE sessions SET active = FALSE WHERE id = $1 AND active")
            .bind(id)
            .execute(executor)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to deactivate session", e)
            })?;
        Ok(())
    }
}
