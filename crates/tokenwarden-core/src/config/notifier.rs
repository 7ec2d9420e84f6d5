//! Anomaly notification configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Webhook target for session anomaly alerts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Whether alerts are posted to the webhook (otherwise only logged).
    #[serde(default)]
    pub enabled: bool,
    /// Base URL of the receiving service.
    #[serde(default)]
    pub base_url: String,
    /// Path appended to `base_url`.
    #[serde(default = "default_path")]
    pub path: String,
    /// Per-delivery timeout in milliseconds.
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: String::new(),
            path: default_path(),
            timeout_ms: default_timeout(),
        }
    }
}

impl NotifierConfig {
    /// Full webhook URL.
    pub fn url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.path)
    }

    /// Delivery timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_path() -> String {
    "/webhook".to_string()
}

fn default_timeout() -> u64 {
    3_000
}
