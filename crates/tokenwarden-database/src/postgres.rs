//! PostgreSQL-backed [`SessionStore`].

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;

use tokenwarden_core::error::{AppError, ErrorKind};
use tokenwarden_core::result::AppResult;
use tokenwarden_core::types::{SessionId, UserId};
use tokenwarden_entity::session::{NewSession, SessionRecord};
use tokenwarden_entity::user::User;

use crate::repositories::{BlacklistRepository, SessionRepository, UserRepository};
use crate::store::{SessionStore, SessionTransaction};

/// Session store over a sqlx PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    /// Create a new store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn begin(&self) -> AppResult<Box<dyn SessionTransaction>> {
        let tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;
        Ok(Box::new(PgSessionTransaction { tx }))
    }

    async fn find_active_sessions(&self, user_id: UserId) -> AppResult<Vec<SessionRecord>> {
        SessionRepository::find_active_by_user(&self.pool, user_id).await
    }

    async fn insert_blacklist_entry(&self, access_token: &str) -> AppResult<()> {
        BlacklistRepository::insert(&self.pool, access_token).await
    }

    async fn is_blacklisted(&self, access_token: &str) -> AppResult<bool> {
        BlacklistRepository::contains(&self.pool, access_token).await
    }

    async fn find_or_create_user(&self, user_id: UserId) -> AppResult<User> {
        UserRepository::upsert(&self.pool, user_id).await
    }
}

/// An open PostgreSQL transaction. sqlx rolls it back when dropped
/// without [`commit`](SessionTransaction::commit).
pub struct PgSessionTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl SessionTransaction for PgSessionTransaction {
    async fn find_active_sessions(&mut self, user_id: UserId) -> AppResult<Vec<SessionRecord>> {
        UserRepository::lock(&mut *self.tx, user_id).await?;
        SessionRepository::find_active_by_user(&mut *self.tx, user_id).await
    }

    async fn insert_session(&mut self, session: NewSession) -> AppResult<SessionId> {
        let id = SessionRepository::create(&mut *self.tx, &session).await?;
        debug!(session_id = %id, user_id = %session.user_id, "Session row inserted");
        Ok(id)
    }

    async fn deactivate_session(&mut self, id: SessionId) -> AppResult<()> {
        SessionRepository::deactivate(&mut *self.tx, id).await
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })
    }
}
