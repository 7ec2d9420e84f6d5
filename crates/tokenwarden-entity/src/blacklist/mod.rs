//! Revoked access tokens.

pub mod model;

pub use model::BlacklistEntry;
