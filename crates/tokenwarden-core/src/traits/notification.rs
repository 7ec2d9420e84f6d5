//! Notification sink trait for best-effort anomaly alerts.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::events::NotificationKind;
use crate::result::AppResult;

/// Outbound side-channel for session anomaly alerts.
///
/// Delivery is best-effort. Callers log a returned error and carry on; a
/// failing sink never changes the outcome of a token operation.
#[async_trait]
pub trait NotificationSink: Send + Sync + std::fmt::Debug + 'static {
    /// Deliver one alert.
    async fn notify(&self, kind: NotificationKind, payload: HashMap<String, String>)
    -> AppResult<()>;
}
