//! Builds and parses access and refresh tokens.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use tokenwarden_core::config::AuthConfig;
use tokenwarden_core::error::{AppError, ErrorKind};
use tokenwarden_core::result::AppResult;
use tokenwarden_core::types::{BindingKey, UserId};

use super::claims::{AccessClaims, RefreshEnvelope};

const ALGORITHM: Algorithm = Algorithm::HS512;

/// Signs and verifies access tokens (HS512) and encodes refresh envelopes.
///
/// The key material is taken from [`AuthConfig`] once at construction and
/// never changes afterwards.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    request_id: String,
    access_ttl: Duration,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("access_ttl", &self.access_ttl)
            .finish()
    }
}

impl TokenCodec {
    /// Creates a codec from validated auth configuration.
    pub fn new(config: &AuthConfig) -> AppResult<Self> {
        config.validate()?;

        // Expiry is checked by callers so that refresh accepts expired tokens.
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.signing_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.signing_secret.as_bytes()),
            validation,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            request_id: config.request_id.clone(),
            access_ttl: Duration::minutes(config.access_ttl_minutes as i64),
        })
    }

    /// Builds the claims for a pair minted at `issued_at`.
    pub fn access_claims(
        &self,
        subject: UserId,
        key: BindingKey,
        issued_at: DateTime<Utc>,
    ) -> AccessClaims {
        let iat = issued_at.timestamp();
        AccessClaims {
            sub: subject,
            iss: self.issuer.clone(),
            aud: vec![self.audience.clone()],
            nbf: iat,
            exp: (issued_at + self.access_ttl).timestamp(),
            iat,
            jti: self.request_id.clone(),
            key,
        }
    }

    /// Signs the claims into a compact access token.
    pub fn sign_access(&self, claims: &AccessClaims) -> AppResult<String> {
        encode(&Header::new(ALGORITHM), claims, &self.encoding_key).map_err(|e| {
            AppError::with_source(ErrorKind::Encoding, "Failed to sign access token", e)
        })
    }

    /// Verifies signature, algorithm, issuer and audience. Expiry is not checked.
    pub fn verify_access(&self, token: &str) -> AppResult<AccessClaims> {
        decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                JwtErrorKind::InvalidSignature | JwtErrorKind::InvalidAlgorithm => {
                    AppError::with_source(
                        ErrorKind::InvalidSignature,
                        "Access token signature did not verify",
                        e,
                    )
                }
                JwtErrorKind::InvalidIssuer | JwtErrorKind::InvalidAudience => {
                    AppError::with_source(
                        ErrorKind::InvalidSignature,
                        "Access token was not issued for this service",
                        e,
                    )
                }
                _ => AppError::with_source(
                    ErrorKind::Malformed,
                    format!("Malformed access token: {e}"),
                    e,
                ),
            })
    }

    /// Serializes the envelope as unpadded URL-safe base64 of its JSON form.
    pub fn encode_refresh(&self, envelope: &RefreshEnvelope) -> AppResult<String> {
        let json = serde_json::to_vec(envelope)?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    /// Parses an opaque refresh token back into its envelope.
    pub fn decode_refresh(&self, token: &str) -> AppResult<RefreshEnvelope> {
        let bytes = URL_SAFE_NO_PAD.decode(token).map_err(|e| {
            AppError::with_source(ErrorKind::Malformed, "Refresh token is not valid base64", e)
        })?;
        serde_json::from_slice(&bytes).map_err(|e| {
            AppError::with_source(ErrorKind::Malformed, "Refresh token payload is invalid", e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            signing_secret: secret.to_string(),
            ..AuthConfig::default()
        }
    }

    fn codec() -> TokenCodec {
        TokenCodec::new(&config("an-hs512-signing-secret-of-at-least-32-bytes")).unwrap()
    }

    #[test]
    fn test_rejects_short_secret() {
        let err = TokenCodec::new(&config("short")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_sign_then_verify() {
        let codec = codec();
        let claims = codec.access_claims(UserId::new(), BindingKey::new(), Utc::now());

        let token = codec.sign_access(&claims).unwrap();
        let verified = codec.verify_access(&token).unwrap();

        assert_eq!(verified, claims);
        assert_eq!(verified.iss, "tokenwarden");
        assert_eq!(verified.aud, vec!["localhost:8080".to_string()]);
        assert_eq!(verified.jti, "JWTID");
        assert_eq!(verified.exp - verified.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_verify_ignores_expiry() {
        let codec = codec();
        let long_ago = Utc::now() - Duration::days(3);
        let claims = codec.access_claims(UserId::new(), BindingKey::new(), long_ago);

        let token = codec.sign_access(&claims).unwrap();
        let verified = codec.verify_access(&token).unwrap();

        assert!(verified.is_expired_at(Utc::now()));
    }

    #[test]
    fn test_foreign_signature_rejected() {
        let ours = codec();
        let theirs =
            TokenCodec::new(&config("a-completely-different-secret-with-40-bytes")).unwrap();
        let claims = theirs.access_claims(UserId::new(), BindingKey::new(), Utc::now());
        let token = theirs.sign_access(&claims).unwrap();

        let err = ours.verify_access(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidSignature);
        assert!(err.is_codec_rejection());
    }

    #[test]
    fn test_garbage_is_malformed() {
        let err = codec().verify_access("not.a.jwt").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Malformed);

        let err = codec().verify_access("").unwrap_err();
        assert!(err.is_codec_rejection());
    }

    #[test]
    fn test_refresh_envelope_round_trip() {
        let codec = codec();
        let envelope = RefreshEnvelope {
            issued_at: Utc::now(),
            key: BindingKey::new(),
        };

        let token = codec.encode_refresh(&envelope).unwrap();
        assert!(!token.contains('='));
        assert!(!token.contains('+') && !token.contains('/'));
        assert_eq!(codec.decode_refresh(&token).unwrap(), envelope);
    }

    #[test]
    fn test_refresh_decode_failures_are_malformed() {
        let codec = codec();
        assert_eq!(
            codec.decode_refresh("%%%").unwrap_err().kind,
            ErrorKind::Malformed
        );

        let not_json = URL_SAFE_NO_PAD.encode(b"{\"time\": 12");
        assert_eq!(
            codec.decode_refresh(&not_json).unwrap_err().kind,
            ErrorKind::Malformed
        );
    }
}
