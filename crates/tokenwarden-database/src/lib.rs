//! # tokenwarden-database
//!
//! The narrow storage contract consumed by the session lifecycle manager,
//! plus its two implementations: PostgreSQL (via sqlx) and a process-local
//! in-memory store for tests and single-node development.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod postgres;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemorySessionStore;
pub use postgres::PgSessionStore;
pub use store::{SessionStore, SessionTransaction};
