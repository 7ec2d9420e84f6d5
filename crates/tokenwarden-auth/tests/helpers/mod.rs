//! Shared fixtures for lifecycle integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use tokenwarden_auth::{CredentialHasher, SessionLifecycleManager, TokenCodec};
use tokenwarden_core::config::{AuthConfig, HasherConfig};
use tokenwarden_core::error::AppError;
use tokenwarden_core::events::NotificationKind;
use tokenwarden_core::result::AppResult;
use tokenwarden_core::traits::NotificationSink;
use tokenwarden_core::types::{SessionId, UserId};
use tokenwarden_database::store::{SessionStore, SessionTransaction};
use tokenwarden_database::MemorySessionStore;
use tokenwarden_entity::session::{NewSession, SessionRecord};
use tokenwarden_entity::user::User;

pub const SIGNING_SECRET: &str = "integration-test-signing-secret-0123456789";

/// One captured `notify` call.
#[derive(Debug, Clone)]
pub struct RecordedAlert {
    pub kind: NotificationKind,
    pub payload: HashMap<String, String>,
}

/// Forwards every alert to a channel.
#[derive(Debug)]
pub struct RecordingSink {
    tx: mpsc::UnboundedSender<RecordedAlert>,
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn notify(&self, kind: NotificationKind, payload: HashMap<String, String>) -> AppResult<()> {
        let _ = self.tx.send(RecordedAlert { kind, payload });
        Ok(())
    }
}

/// Always fails delivery.
#[derive(Debug)]
pub struct FailingSink;

#[async_trait]
impl NotificationSink for FailingSink {
    async fn notify(&self, _kind: NotificationKind, _payload: HashMap<String, String>) -> AppResult<()> {
        Err(AppError::external_service("webhook returned 502"))
    }
}

/// Never finishes delivery within any reasonable deadline.
#[derive(Debug)]
pub struct HangingSink;

#[async_trait]
impl NotificationSink for HangingSink {
    async fn notify(&self, _kind: NotificationKind, _payload: HashMap<String, String>) -> AppResult<()> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(())
    }
}

/// Delegates to a memory store but stalls when a transaction is opened.
#[derive(Debug, Clone)]
pub struct StallingStore {
    pub inner: MemorySessionStore,
}

#[async_trait]
impl SessionStore for StallingStore {
    async fn begin(&self) -> AppResult<Box<dyn SessionTransaction>> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        self.inner.begin().await
    }

    async fn find_active_sessions(&self, user_id: UserId) -> AppResult<Vec<SessionRecord>> {
        self.inner.find_active_sessions(user_id).await
    }

    async fn insert_blacklist_entry(&self, access_token: &str) -> AppResult<()> {
        self.inner.insert_blacklist_entry(access_token).await
    }

    async fn is_blacklisted(&self, access_token: &str) -> AppResult<bool> {
        self.inner.is_blacklisted(access_token).await
    }

    async fn find_or_create_user(&self, user_id: UserId) -> AppResult<User> {
        self.inner.find_or_create_user(user_id).await
    }
}

/// Delegates to a memory store, but every transaction fails on `insert_session`
/// after its earlier steps have been staged.
#[derive(Debug, Clone)]
pub struct FailingInsertStore {
    pub inner: MemorySessionStore,
}

#[async_trait]
impl SessionStore for FailingInsertStore {
    async fn begin(&self) -> AppResult<Box<dyn SessionTransaction>> {
        let inner = self.inner.begin().await?;
        Ok(Box::new(FailingInsertTransaction { inner }))
    }

    async fn find_active_sessions(&self, user_id: UserId) -> AppResult<Vec<SessionRecord>> {
        self.inner.find_active_sessions(user_id).await
    }

    async fn insert_blacklist_entry(&self, access_token: &str) -> AppResult<()> {
        self.inner.insert_blacklist_entry(access_token).await
    }

    async fn is_blacklisted(&self, access_token: &str) -> AppResult<bool> {
        self.inner.is_blacklisted(access_token).await
    }

    async fn find_or_create_user(&self, user_id: UserId) -> AppResult<User> {
        self.inner.find_or_create_user(user_id).await
    }
}

pub struct FailingInsertTransaction {
    inner: Box<dyn SessionTransaction>,
}

#[async_trait]
impl SessionTransaction for FailingInsertTransaction {
    async fn find_active_sessions(&mut self, user_id: UserId) -> AppResult<Vec<SessionRecord>> {
        self.inner.find_active_sessions(user_id).await
    }

    async fn insert_session(&mut self, _session: NewSession) -> AppResult<SessionId> {
        Err(AppError::database("connection reset during insert"))
    }

    async fn deactivate_session(&mut self, id: SessionId) -> AppResult<()> {
        self.inner.deactivate_session(id).await
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.inner.commit().await
    }
}

pub fn auth_config() -> AuthConfig {
    AuthConfig {
        signing_secret: SIGNING_SECRET.to_string(),
        ..AuthConfig::default()
    }
}

/// Cheap Argon2 parameters so tests stay fast.
pub fn hasher_config() -> HasherConfig {
    HasherConfig {
        memory_kib: 256,
        iterations: 1,
        parallelism: 1,
    }
}

pub fn codec() -> Arc<TokenCodec> {
    Arc::new(TokenCodec::new(&auth_config()).expect("valid auth config"))
}

pub fn hasher() -> Arc<CredentialHasher> {
    Arc::new(CredentialHasher::new(&hasher_config()).expect("valid hasher config"))
}

/// A manager over a fresh memory store with a recording notification sink.
pub struct TestHarness {
    pub manager: SessionLifecycleManager,
    pub store: MemorySessionStore,
    pub codec: Arc<TokenCodec>,
    alerts: mpsc::UnboundedReceiver<RecordedAlert>,
}

impl TestHarness {
    pub fn new() -> Self {
        let (tx, alerts) = mpsc::unbounded_channel();
        let store = MemorySessionStore::new();
        let codec = codec();
        let manager = SessionLifecycleManager::new(
            Arc::clone(&codec),
            hasher(),
            Arc::new(store.clone()),
            Arc::new(RecordingSink { tx }),
        );

        Self {
            manager,
            store,
            codec,
            alerts,
        }
    }

    /// Same store and codec, different sink.
    pub fn with_sink(sink: Arc<dyn NotificationSink>) -> Self {
        let mut harness = Self::new();
        harness.manager = SessionLifecycleManager::new(
            Arc::clone(&harness.codec),
            hasher(),
            Arc::new(harness.store.clone()),
            sink,
        );
        harness
    }

    /// Waits briefly for the next alert.
    pub async fn next_alert(&mut self) -> Option<RecordedAlert> {
        tokio::time::timeout(Duration::from_secs(2), self.alerts.recv())
            .await
            .ok()
            .flatten()
    }

    /// Whether any alert is queued right now.
    pub fn has_pending_alert(&mut self) -> bool {
        self.alerts.try_recv().is_ok()
    }

    pub async fn active_sessions(&self, user_id: UserId) -> Vec<SessionRecord> {
        self.store
            .find_active_sessions(user_id)
            .await
            .expect("memory store never fails")
    }
}
