//! # tokenwarden-entity
//!
//! Persisted entity models for Tokenwarden. Every struct in this crate
//! represents a database table row or the input needed to create one.
//! Row types additionally derive `sqlx::FromRow`.

pub mod blacklist;
pub mod session;
pub mod user;

pub use blacklist::BlacklistEntry;
pub use session::{NewSession, SessionRecord};
pub use user::User;
