//! Payloads carried inside the two token formats.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tokenwarden_core::types::{BindingKey, UserId};

/// Claims embedded in every signed access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject: the user the token was minted for.
    pub sub: UserId,
    /// Issuer.
    pub iss: String,
    /// Audience.
    pub aud: Vec<String>,
    /// Not-before (seconds since epoch).
    pub nbf: i64,
    /// Expiration (seconds since epoch).
    pub exp: i64,
    /// Issued-at (seconds since epoch).
    pub iat: i64,
    /// Fixed request identifier.
    pub jti: String,
    /// Shared with the paired refresh token.
    pub key: BindingKey,
}

impl AccessClaims {
    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Whether the token is expired at `now`. The expiry second itself counts.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

/// Contents of an opaque refresh token.
///
/// The envelope is encoded, not signed. Its integrity comes from comparing
/// the token's digest against the active session record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshEnvelope {
    /// When the pair was minted.
    #[serde(rename = "time")]
    pub issued_at: DateTime<Utc>,
    /// Shared with the paired access token.
    pub key: BindingKey,
}
