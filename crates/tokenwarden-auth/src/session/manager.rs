//! Session lifecycle manager: issuance, refresh-token rotation, revocation,
//! and per-request authentication.
//!
//! Each user has at most one active session record. Issue and Refresh both
//! replace it inside one store transaction, so concurrent rotations for the
//! same user serialize and exactly one of them wins.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use tokenwarden_core::error::{AppError, ErrorKind};
use tokenwarden_core::events::SessionAlert;
use tokenwarden_core::result::AppResult;
use tokenwarden_core::traits::NotificationSink;
use tokenwarden_core::types::{BindingKey, UserId};
use tokenwarden_database::store::SessionStore;
use tokenwarden_entity::session::{NewSession, SessionRecord};

use crate::credential::CredentialHasher;
use crate::jwt::{RefreshEnvelope, TokenCodec};

const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_NOTIFY_TIMEOUT: Duration = Duration::from_secs(3);

/// A freshly minted access/refresh pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Signed access token.
    pub access_token: String,
    /// Opaque refresh token.
    pub refresh_token: String,
    /// Access token expiration timestamp.
    pub access_expires_at: DateTime<Utc>,
}

struct Minted {
    pair: TokenPair,
    digest: String,
}

/// Orchestrates the session token lifecycle over a [`SessionStore`].
///
/// Holds no session state of its own; every call re-reads the store.
#[derive(Clone)]
pub struct SessionLifecycleManager {
    codec: Arc<TokenCodec>,
    hasher: Arc<CredentialHasher>,
    store: Arc<dyn SessionStore>,
    notifier: Arc<dyn NotificationSink>,
    call_timeout: Duration,
    notify_timeout: Duration,
}

impl std::fmt::Debug for SessionLifecycleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionLifecycleManager")
            .field("codec", &self.codec)
            .field("store", &self.store)
            .field("notifier", &self.notifier)
            .field("call_timeout", &self.call_timeout)
            .field("notify_timeout", &self.notify_timeout)
            .finish()
    }
}

impl SessionLifecycleManager {
    /// Creates a manager with default deadlines.
    pub fn new(
        codec: Arc<TokenCodec>,
        hasher: Arc<CredentialHasher>,
        store: Arc<dyn SessionStore>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            codec,
            hasher,
            store,
            notifier,
            call_timeout: DEFAULT_CALL_TIMEOUT,
            notify_timeout: DEFAULT_NOTIFY_TIMEOUT,
        }
    }

    /// Returns a copy whose store calls are each bounded by `timeout`.
    pub fn with_call_timeout(&self, timeout: Duration) -> Self {
        Self {
            call_timeout: timeout,
            ..self.clone()
        }
    }

    /// Returns a copy whose alert deliveries are bounded by `timeout`.
    pub fn with_notify_timeout(&self, timeout: Duration) -> Self {
        Self {
            notify_timeout: timeout,
            ..self.clone()
        }
    }

    /// Starts a new session for `user_id`, replacing any active one.
    ///
    /// 1. Ensure the user exists
    /// 2. Mint a pair sharing a fresh binding key
    /// 3. In one transaction: deactivate the active record, insert the new one
    ///
    /// A failure before commit leaves the previous active record intact.
    pub async fn issue(
        &self,
        user_id: UserId,
        device_tag: &str,
        source_address: &str,
    ) -> AppResult<TokenPair> {
        self.bounded("find_or_create_user", self.store.find_or_create_user(user_id))
            .await?;

        let minted = self.mint(user_id)?;

        let mut tx = self.bounded("begin", self.store.begin()).await?;
        let active = self
            .bounded("find_active_sessions", tx.find_active_sessions(user_id))
            .await?;
        for record in &active {
            self.bounded("deactivate_session", tx.deactivate_session(record.id))
                .await?;
        }
        let session_id = self
            .bounded(
                "insert_session",
                tx.insert_session(NewSession {
                    user_id,
                    refresh_digest: minted.digest,
                    device_tag: device_tag.to_string(),
                    source_address: source_address.to_string(),
                }),
            )
            .await?;
        self.bounded("commit", tx.commit()).await?;

        info!(
            user_id = %user_id,
            session_id = %session_id,
            replaced = active.len(),
            "Session issued"
        );

        Ok(minted.pair)
    }

    /// Rotates a token pair.
    ///
    /// 1. Verify the access token signature (expiry is ignored)
    /// 2. Decode the refresh envelope and require the same binding key
    /// 3. Find the active record whose digest matches the refresh token
    /// 4. Device mismatch: revoke and fail with `SecurityViolation`
    /// 5. Origin mismatch: alert the notification sink, continue
    /// 6. In one transaction: deactivate the matched record, insert the new one
    pub async fn refresh(
        &self,
        access_token: &str,
        refresh_token: &str,
        device_tag: &str,
        source_address: &str,
    ) -> AppResult<TokenPair> {
        let claims = self.codec.verify_access(access_token).map_err(reject)?;
        let envelope = self.codec.decode_refresh(refresh_token).map_err(reject)?;

        if envelope.key != claims.key {
            warn!(user_id = %claims.sub, "Refresh presented with an unpaired access token");
            return Err(AppError::invalid_credential(
                "Access and refresh tokens were not issued together",
            ));
        }

        let user_id = claims.sub;
        let mut tx = self.bounded("begin", self.store.begin()).await?;
        let active = self
            .bounded("find_active_sessions", tx.find_active_sessions(user_id))
            .await?;

        let Some(matched) = self.find_matching(&active, refresh_token)? else {
            debug!(user_id = %user_id, "Refresh token does not match any active session");
            return Err(AppError::invalid_credential(
                "Refresh token is not recognized",
            ));
        };

        if !matched.same_device(device_tag) {
            // The revoke below opens its own store calls.
            drop(tx);
            warn!(
                user_id = %user_id,
                session_id = %matched.id,
                "Device fingerprint changed on refresh, revoking session"
            );
            self.revoke(access_token).await?;
            return Err(AppError::security_violation(
                "Device fingerprint does not match the session",
            ));
        }

        if !matched.same_origin(source_address) {
            info!(
                user_id = %user_id,
                session_id = %matched.id,
                old_address = %matched.source_address,
                new_address = %source_address,
                "Refresh from a new network origin"
            );
            self.alert(SessionAlert::OriginChanged {
                user_id,
                old_address: matched.source_address.clone(),
                new_address: source_address.to_string(),
            });
        }

        let minted = self.mint(user_id)?;

        self.bounded("deactivate_session", tx.deactivate_session(matched.id))
            .await?;
        let session_id = self
            .bounded(
                "insert_session",
                tx.insert_session(NewSession {
                    user_id,
                    refresh_digest: minted.digest,
                    device_tag: device_tag.to_string(),
                    source_address: source_address.to_string(),
                }),
            )
            .await?;
        self.bounded("commit", tx.commit()).await?;

        info!(
            user_id = %user_id,
            old_session_id = %matched.id,
            session_id = %session_id,
            "Session rotated"
        );

        Ok(minted.pair)
    }

    /// Blacklists the exact access token and deactivates its subject's
    /// active session.
    ///
    /// The blacklist entry is written before the token is verified and stands
    /// even if verification then fails with `InvalidCredential`. Repeating
    /// the call is harmless.
    pub async fn revoke(&self, access_token: &str) -> AppResult<()> {
        self.bounded(
            "insert_blacklist_entry",
            self.store.insert_blacklist_entry(access_token),
        )
        .await?;

        let claims = self.codec.verify_access(access_token).map_err(|e| {
            warn!(error = %e, "Revoked token failed verification; session left untouched");
            reject(e)
        })?;
        let user_id = claims.sub;

        let mut tx = self.bounded("begin", self.store.begin()).await?;
        let active = self
            .bounded("find_active_sessions", tx.find_active_sessions(user_id))
            .await?;
        for record in &active {
            self.bounded("deactivate_session", tx.deactivate_session(record.id))
                .await?;
        }
        self.bounded("commit", tx.commit()).await?;

        info!(
            user_id = %user_id,
            deactivated = active.len(),
            "Access token revoked"
        );

        Ok(())
    }

    /// Resolves the subject of a valid, unexpired, unrevoked access token.
    ///
    /// Checks run in order: signature, expiry, blacklist.
    pub async fn authenticate(&self, access_token: &str) -> AppResult<UserId> {
        let claims = self.codec.verify_access(access_token).map_err(reject)?;

        if claims.is_expired_at(Utc::now()) {
            return Err(AppError::expired("Access token has expired"));
        }

        let revoked = self
            .bounded("is_blacklisted", self.store.is_blacklisted(access_token))
            .await?;
        if revoked {
            return Err(AppError::revoked("Access token has been revoked"));
        }

        Ok(claims.sub)
    }

    fn mint(&self, user_id: UserId) -> AppResult<Minted> {
        let key = BindingKey::new();
        let now = Utc::now();

        let claims = self.codec.access_claims(user_id, key, now);
        let access_token = self.codec.sign_access(&claims)?;
        let refresh_token = self.codec.encode_refresh(&RefreshEnvelope {
            issued_at: now,
            key,
        })?;
        let digest = self.hasher.digest(&refresh_token)?;

        let access_expires_at = claims
            .expires_at()
            .ok_or_else(|| AppError::encoding("Access token expiry is out of range"))?;

        Ok(Minted {
            pair: TokenPair {
                access_token,
                refresh_token,
                access_expires_at,
            },
            digest,
        })
    }

    /// Linear scan; a user holds at most a handful of active records.
    fn find_matching<'a>(
        &self,
        active: &'a [SessionRecord],
        refresh_token: &str,
    ) -> AppResult<Option<&'a SessionRecord>> {
        for record in active {
            if self.hasher.matches(refresh_token, &record.refresh_digest)? {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }

    /// Fire-and-forget delivery; failures are logged and dropped.
    fn alert(&self, alert: SessionAlert) {
        let notifier = Arc::clone(&self.notifier);
        let timeout = self.notify_timeout;

        tokio::spawn(async move {
            let kind = alert.kind();
            match tokio::time::timeout(timeout, notifier.notify(kind, alert.payload())).await {
                Ok(Ok(())) => debug!(kind = %kind, "Session alert delivered"),
                Ok(Err(e)) => warn!(kind = %kind, error = %e, "Session alert delivery failed"),
                Err(_) => warn!(
                    kind = %kind,
                    timeout_ms = timeout.as_millis() as u64,
                    "Session alert delivery timed out"
                ),
            }
        });
    }

    async fn bounded<T, F>(&self, operation: &'static str, fut: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        match tokio::time::timeout(self.call_timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    operation,
                    timeout_ms = self.call_timeout.as_millis() as u64,
                    "Store call timed out"
                );
                Err(AppError::timeout(format!(
                    "Store call '{operation}' exceeded its deadline"
                )))
            }
        }
    }
}

/// Codec rejections surface to callers as `InvalidCredential`.
fn reject(err: AppError) -> AppError {
    if err.is_codec_rejection() {
        let message = err.message.clone();
        AppError::with_source(ErrorKind::InvalidCredential, message, err)
    } else {
        err
    }
}
