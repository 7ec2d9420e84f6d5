//! Typed SQL queries, one module per table.
//!
//! Every function is generic over [`sqlx::PgExecutor`] so the same query runs
//! against the pool or inside an open transaction.

pub mod blacklist;
pub mod session;
pub mod user;

pub use blacklist::BlacklistRepository;
pub use session::SessionRepository;
pub use user::UserRepository;
