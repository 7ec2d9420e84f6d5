//! The storage contract consumed by the session lifecycle manager.
//!
//! Multi-step mutations go through a [`SessionTransaction`] obtained from
//! [`SessionStore::begin`]. The transaction is a scope guard: its writes
//! become visible only after [`SessionTransaction::commit`], and dropping it
//! uncommitted (an early `?` return, a timeout, or a panic unwinding through
//! the caller) discards them.

use async_trait::async_trait;

use tokenwarden_core::result::AppResult;
use tokenwarden_core::types::{SessionId, UserId};
use tokenwarden_entity::session::{NewSession, SessionRecord};
use tokenwarden_entity::user::User;

/// Durable storage for session records, users, and blacklist entries.
///
/// Implementations must be safe for concurrent use. Two open transactions
/// that read the active sessions of the same user must serialize.
#[async_trait]
pub trait SessionStore: Send + Sync + std::fmt::Debug + 'static {
    /// Open an all-or-nothing unit of work.
    async fn begin(&self) -> AppResult<Box<dyn SessionTransaction>>;

    /// Active session records of a user, read outside any transaction.
    async fn find_active_sessions(&self, user_id: UserId) -> AppResult<Vec<SessionRecord>>;

    /// Record a revoked access token. Idempotent.
    async fn insert_blacklist_entry(&self, access_token: &str) -> AppResult<()>;

    /// Whether the exact access token string has been revoked.
    async fn is_blacklisted(&self, access_token: &str) -> AppResult<bool>;

    /// Fetch the user, creating it on first sight.
    async fn find_or_create_user(&self, user_id: UserId) -> AppResult<User>;
}

/// An open unit of work against a [`SessionStore`].
#[async_trait]
pub trait SessionTransaction: Send {
    /// Active session records of a user. Serializes against other
    /// transactions touching the same user.
    async fn find_active_sessions(&mut self, user_id: UserId) -> AppResult<Vec<SessionRecord>>;

    /// Insert a new active record and return its store-assigned id.
    async fn insert_session(&mut self, session: NewSession) -> AppResult<SessionId>;

    /// Flip a record's `active` flag to false.
    async fn deactivate_session(&mut self, id: SessionId) -> AppResult<()>;

    /// Make every write of this unit durable.
    async fn commit(self: Box<Self>) -> AppResult<()>;
}
