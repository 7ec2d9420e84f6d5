//! # tokenwarden-notify
//!
//! [`NotificationSink`](tokenwarden_core::traits::NotificationSink)
//! implementations: an HTTP webhook and a log-only fallback.

pub mod log;
pub mod webhook;

pub use log::LogSink;
pub use webhook::{WebhookError, WebhookSink};
