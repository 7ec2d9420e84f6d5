//! Token signing configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Minimum accepted length of the HMAC signing secret, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Access-token signing and claim configuration.
///
/// The signing secret is loaded once at startup and never changes for the
/// lifetime of the process. Rotating it requires a redeploy.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for access-token signing (HMAC-SHA512).
    #[serde(default)]
    pub signing_secret: String,
    /// `iss` claim written into and required on access tokens.
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// `aud` claim written into and required on access tokens.
    #[serde(default = "default_audience")]
    pub audience: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: u64,
    /// Fixed `jti` request identifier stamped on every access token.
    #[serde(default = "default_request_id")]
    pub request_id: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("signing_secret", &"****")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .field("request_id", &self.request_id)
            .finish()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            signing_secret: String::new(),
            issuer: default_issuer(),
            audience: default_audience(),
            access_ttl_minutes: default_access_ttl(),
            request_id: default_request_id(),
        }
    }
}

impl AuthConfig {
    /// Rejects configurations that cannot produce trustworthy tokens.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.signing_secret.is_empty() {
            return Err(AppError::configuration("auth.signing_secret must be set"));
        }
        if self.signing_secret.len() < MIN_SECRET_LEN {
            return Err(AppError::configuration(format!(
                "auth.signing_secret must be at least {MIN_SECRET_LEN} bytes"
            )));
        }
        if self.access_ttl_minutes == 0 {
            return Err(AppError::configuration(
                "auth.access_ttl_minutes must be positive",
            ));
        }
        Ok(())
    }
}

fn default_issuer() -> String {
    "tokenwarden".to_string()
}

fn default_audience() -> String {
    "localhost:8080".to_string()
}

fn default_access_ttl() -> u64 {
    24 * 60
}

fn default_request_id() -> String {
    "JWTID".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_secret_rejected() {
        let config = AuthConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_short_secret_rejected() {
        let config = AuthConfig {
            signing_secret: "short".to_string(),
            ..AuthConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_masks_secret() {
        let config = AuthConfig {
            signing_secret: "x".repeat(40),
            ..AuthConfig::default()
        };
        assert!(config.validate().is_ok());
        let printed = format!("{config:?}");
        assert!(!printed.contains(&"x".repeat(40)));
    }
}
