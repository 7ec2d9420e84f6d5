//! # tokenwarden-auth
//!
//! Session token lifecycle for Tokenwarden.
//!
//! ## Modules
//!
//! - `jwt`: signed access tokens and opaque refresh envelopes
//! - `credential`: one-way digests of refresh secrets
//! - `session`: issuance, rotation, revocation, and per-request authentication

pub mod credential;
pub mod jwt;
pub mod session;

pub use credential::CredentialHasher;
pub use jwt::{AccessClaims, RefreshEnvelope, TokenCodec};
pub use session::{SessionLifecycleManager, TokenPair};
