//! Unified application error types for Tokenwarden.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. Policy outcomes of the session
//! lifecycle (expired, revoked, mismatched) are expressed as an
//! [`ErrorKind`] so the transport layer can translate them without
//! string matching.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Malformed, unsigned, unmatched, or unrecognized token.
    InvalidCredential,
    /// The access token is past its expiry.
    Expired,
    /// The access token is on the blacklist.
    Revoked,
    /// Device fingerprint mismatch during refresh; the session was revoked.
    SecurityViolation,
    /// A stored digest string could not be parsed.
    CorruptDigest,
    /// A token could not be serialized or signed.
    Encoding,
    /// Codec-level: the access token signature did not verify.
    InvalidSignature,
    /// Codec-level: the token is structurally invalid.
    Malformed,
    /// Input validation failed.
    Validation,
    /// A database error occurred.
    Database,
    /// A store or notification call exceeded its deadline.
    Timeout,
    /// An external service error occurred.
    ExternalService,
    /// A configuration error occurred.
    Configuration,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCredential => write!(f, "INVALID_CREDENTIAL"),
            Self::Expired => write!(f, "EXPIRED"),
            Self::Revoked => write!(f, "REVOKED"),
            Self::SecurityViolation => write!(f, "SECURITY_VIOLATION"),
            Self::CorruptDigest => write!(f, "CORRUPT_DIGEST"),
            Self::Encoding => write!(f, "ENCODING"),
            Self::InvalidSignature => write!(f, "INVALID_SIGNATURE"),
            Self::Malformed => write!(f, "MALFORMED"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Database => write!(f, "DATABASE"),
            Self::Timeout => write!(f, "TIMEOUT"),
            Self::ExternalService => write!(f, "EXTERNAL_SERVICE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout Tokenwarden.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid-credential error.
    pub fn invalid_credential(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidCredential, message)
    }

    /// Create an expired-token error.
    pub fn expired(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Expired, message)
    }

    /// Create a revoked-token error.
    pub fn revoked(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Revoked, message)
    }

    /// Create a security-violation error.
    pub fn security_violation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SecurityViolation, message)
    }

    /// Create a corrupt-digest error.
    pub fn corrupt_digest(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CorruptDigest, message)
    }

    /// Create an encoding error.
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Encoding, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    /// Create an external-service error.
    pub fn external_service(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ExternalService, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Whether the caller may retry the same request with backoff.
    pub fn is_transient(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Database | ErrorKind::Timeout | ErrorKind::ExternalService
        )
    }

    /// Whether this error originated in token parsing or signature checks.
    pub fn is_codec_rejection(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidSignature | ErrorKind::Malformed)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Encoding,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind_and_message() {
        let err = AppError::revoked("Token has been revoked");
        assert_eq!(err.to_string(), "REVOKED: Token has been revoked");
    }

    #[test]
    fn test_transient_kinds() {
        assert!(AppError::database("down").is_transient());
        assert!(AppError::timeout("slow").is_transient());
        assert!(AppError::external_service("502").is_transient());
        assert!(!AppError::invalid_credential("bad").is_transient());
        assert!(!AppError::security_violation("agent").is_transient());
    }

    #[test]
    fn test_clone_drops_source() {
        let io = std::io::Error::other("boom");
        let err = AppError::with_source(ErrorKind::Database, "query failed", io);
        let cloned = err.clone();
        assert_eq!(cloned.kind, ErrorKind::Database);
        assert!(cloned.source.is_none());
    }
}
