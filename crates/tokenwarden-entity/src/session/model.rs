//! Session record model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use tokenwarden_core::types::{SessionId, UserId};

/// One row per issued refresh token.
///
/// Rows are append-only. The single permitted mutation is flipping
/// `active` from `true` to `false`; records are never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SessionRecord {
    /// Store-assigned identifier.
    pub id: SessionId,
    /// Owning identity.
    pub user_id: UserId,
    /// Argon2 PHC string of the SHA-256 of the refresh token.
    #[serde(skip_serializing)]
    pub refresh_digest: String,
    /// Whether this record is the user's live session.
    pub active: bool,
    /// User-agent string presented at issuance.
    pub device_tag: String,
    /// Client network address at issuance.
    pub source_address: String,
    /// When the record was inserted.
    pub created_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Whether the presenting client matches the device bound at issuance.
    pub fn same_device(&self, device_tag: &str) -> bool {
        self.device_tag == device_tag
    }

    /// Whether the presenting client comes from the issuance address.
    pub fn same_origin(&self, source_address: &str) -> bool {
        self.source_address == source_address
    }
}

/// Data required to insert a new active session record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSession {
    /// Owning identity.
    pub user_id: UserId,
    /// Digest of the refresh token.
    pub refresh_digest: String,
    /// User-agent string of the requesting client.
    pub device_tag: String,
    /// Client network address.
    pub source_address: String,
}

impl NewSession {
    /// Materialize the record the store will hold for this insert.
    pub fn into_record(self, id: SessionId, created_at: DateTime<Utc>) -> SessionRecord {
        SessionRecord {
            id,
            user_id: self.user_id,
            refresh_digest: self.refresh_digest,
            active: true,
            device_tag: self.device_tag,
            source_address: self.source_address,
            created_at,
        }
    }
}
