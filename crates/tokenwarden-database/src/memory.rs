//! Process-local [`SessionStore`] for tests and single-node development.
//!
//! One mutex guards all state. A transaction holds the guard for its whole
//! lifetime and works on a copy of the session table, so concurrent
//! transactions serialize and an uncommitted transaction leaves no trace.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use tokenwarden_core::error::AppError;
use tokenwarden_core::result::AppResult;
use tokenwarden_core::types::{SessionId, UserId};
use tokenwarden_entity::blacklist::BlacklistEntry;
use tokenwarden_entity::session::{NewSession, SessionRecord};
use tokenwarden_entity::user::User;

use crate::store::{SessionStore, SessionTransaction};

#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<UserId, User>,
    sessions: Vec<SessionRecord>,
    blacklist: HashMap<String, BlacklistEntry>,
}

fn active_for(sessions: &[SessionRecord], user_id: UserId) -> Vec<SessionRecord> {
    let mut active: Vec<SessionRecord> = sessions
        .iter()
        .filter(|s| s.user_id == user_id && s.active)
        .cloned()
        .collect();
    active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    active
}

/// In-memory session store. Cloning shares the underlying state.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every session of a user, including deactivated ones, oldest first.
    pub async fn session_history(&self, user_id: UserId) -> Vec<SessionRecord> {
        let state = self.state.lock().await;
        state
            .sessions
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Number of revoked access tokens.
    pub async fn blacklist_len(&self) -> usize {
        self.state.lock().await.blacklist.len()
    }

    /// The blacklist entry for an exact token, if revoked.
    pub async fn blacklist_entry(&self, access_token: &str) -> Option<BlacklistEntry> {
        self.state.lock().await.blacklist.get(access_token).cloned()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn begin(&self) -> AppResult<Box<dyn SessionTransaction>> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let working = guard.sessions.clone();
        Ok(Box::new(MemorySessionTransaction { guard, working }))
    }

    async fn find_active_sessions(&self, user_id: UserId) -> AppResult<Vec<SessionRecord>> {
        let state = self.state.lock().await;
        Ok(active_for(&state.sessions, user_id))
    }

    async fn insert_blacklist_entry(&self, access_token: &str) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state
            .blacklist
            .entry(access_token.to_string())
            .or_insert_with(|| BlacklistEntry {
                access_token: access_token.to_string(),
                created_at: Utc::now(),
            });
        Ok(())
    }

    async fn is_blacklisted(&self, access_token: &str) -> AppResult<bool> {
        Ok(self.state.lock().await.blacklist.contains_key(access_token))
    }

    async fn find_or_create_user(&self, user_id: UserId) -> AppResult<User> {
        let mut state = self.state.lock().await;
        let user = state.users.entry(user_id).or_insert_with(|| User {
            guid: user_id,
            created_at: Utc::now(),
        });
        Ok(user.clone())
    }
}

/// An open in-memory transaction.
pub struct MemorySessionTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    working: Vec<SessionRecord>,
}

#[async_trait]
impl SessionTransaction for MemorySessionTransaction {
    async fn find_active_sessions(&mut self, user_id: UserId) -> AppResult<Vec<SessionRecord>> {
        Ok(active_for(&self.working, user_id))
    }

    async fn insert_session(&mut self, session: NewSession) -> AppResult<SessionId> {
        // Mirrors the partial unique index on `sessions(user_id) WHERE active`.
        if self
            .working
            .iter()
            .any(|s| s.user_id == session.user_id && s.active)
        {
            return Err(AppError::database(format!(
                "User {} already has an active session",
                session.user_id
            )));
        }

        let id = SessionId::new();
        debug!(session_id = %id, user_id = %session.user_id, "Session record staged");
        self.working.push(session.into_record(id, Utc::now()));
        Ok(id)
    }

    async fn deactivate_session(&mut self, id: SessionId) -> AppResult<()> {
        if let Some(record) = self.working.iter_mut().find(|s| s.id == id) {
            record.active = false;
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let MemorySessionTransaction { mut guard, working } = *self;
        guard.sessions = working;
        Ok(())
    }
}
