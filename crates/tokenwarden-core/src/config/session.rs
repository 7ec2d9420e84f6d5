//! Session store configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Which session store backend to construct at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// PostgreSQL via sqlx.
    #[default]
    Postgres,
    /// Process-local store; single node, not durable.
    Memory,
}

/// Session lifecycle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Store backend.
    #[serde(default)]
    pub store: StoreBackend,
    /// Deadline for each individual store call, in milliseconds.
    #[serde(default = "default_call_timeout")]
    pub call_timeout_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            store: StoreBackend::default(),
            call_timeout_ms: default_call_timeout(),
        }
    }
}

impl SessionConfig {
    /// The per-call store deadline as a [`Duration`].
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }
}

fn default_call_timeout() -> u64 {
    5_000
}
