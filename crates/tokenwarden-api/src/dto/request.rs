//! Request DTOs.

use serde::{Deserialize, Serialize};

/// Query string of `POST /api/auth/authorize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizeQuery {
    /// GUID of the identity to issue tokens for.
    pub guid: String,
}

/// Token refresh request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    /// The access token issued with the refresh token (may be expired).
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
}
