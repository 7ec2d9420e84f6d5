//! SHA-256 pre-hash followed by Argon2id.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use sha2::{Digest, Sha256};

use tokenwarden_core::config::HasherConfig;
use tokenwarden_core::error::{AppError, ErrorKind};
use tokenwarden_core::result::AppResult;

/// Turns refresh secrets into stored digests and checks candidates against them.
///
/// The secret is first reduced to a fixed 32-byte SHA-256 value, then hashed
/// with salted Argon2id. Digests are PHC strings, so verification reads the
/// cost parameters from the digest itself.
#[derive(Debug, Clone)]
pub struct CredentialHasher {
    params: Params,
}

impl CredentialHasher {
    /// Creates a hasher with the configured Argon2id cost.
    pub fn new(config: &HasherConfig) -> AppResult<Self> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| AppError::configuration(format!("Invalid Argon2 parameters: {e}")))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Produces the stored representation of `secret`.
    pub fn digest(&self, secret: &str) -> AppResult<String> {
        let prehash = Sha256::digest(secret.as_bytes());
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2()
            .hash_password(&prehash, &salt)
            .map_err(|e| AppError::encoding(format!("Refresh secret hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Whether `candidate` hashes to `digest`.
    ///
    /// Returns `Ok(false)` for a non-matching candidate and `CorruptDigest`
    /// only when `digest` cannot be parsed or used.
    pub fn matches(&self, candidate: &str, digest: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(digest).map_err(|e| {
            AppError::corrupt_digest(format!("Stored digest is not a PHC string: {e}"))
        })?;
        let prehash = Sha256::digest(candidate.as_bytes());

        match self.argon2().verify_password(&prehash, &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::new(
                ErrorKind::CorruptDigest,
                format!("Stored digest could not be verified: {e}"),
            )),
        }
    }
}
