//! Log-only sink used when no webhook is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::warn;

use tokenwarden_core::events::NotificationKind;
use tokenwarden_core::result::AppResult;
use tokenwarden_core::traits::NotificationSink;

/// Writes each alert as a structured `warn` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn notify(&self, kind: NotificationKind, payload: HashMap<String, String>) -> AppResult<()> {
        warn!(kind = %kind, ?payload, "Session alert");
        Ok(())
    }
}
