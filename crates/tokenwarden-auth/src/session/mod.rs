//! Session lifecycle: issue, refresh, revoke, authenticate.

pub mod manager;

pub use manager::{SessionLifecycleManager, TokenPair};
