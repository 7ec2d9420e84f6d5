//! Blacklist entry model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row per exact access-token string that was explicitly revoked.
///
/// Presence of an entry is permanent; entries are never updated or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BlacklistEntry {
    /// The revoked token, verbatim.
    pub access_token: String,
    /// When the token was revoked.
    pub created_at: DateTime<Utc>,
}
