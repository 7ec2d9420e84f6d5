//! Webhook delivery of session alerts.
//!
//! [`WebhookSink`] posts one JSON object per alert: the payload map with an
//! added `event` field naming the kind. There is no retry; the caller treats
//! delivery as best-effort.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use tokenwarden_core::config::NotifierConfig;
use tokenwarden_core::error::{AppError, ErrorKind};
use tokenwarden_core::events::NotificationKind;
use tokenwarden_core::result::AppResult;
use tokenwarden_core::traits::NotificationSink;

/// Error type for webhook delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote server returned a non-2xx status code.
    #[error("Webhook returned HTTP {0}")]
    HttpStatus(u16),
}

impl From<WebhookError> for AppError {
    fn from(err: WebhookError) -> Self {
        let message = err.to_string();
        match err {
            WebhookError::Request(e) if e.is_timeout() => {
                AppError::with_source(ErrorKind::Timeout, message, e)
            }
            other => AppError::with_source(ErrorKind::ExternalService, message, other),
        }
    }
}

/// Posts session alerts to a fixed URL.
#[derive(Debug, Clone)]
pub struct WebhookSink {
    client: reqwest::Client,
    url: String,
}

impl WebhookSink {
    /// Builds a sink for `url` whose requests time out after `timeout`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Builds a sink from the notifier section of the configuration.
    pub fn from_config(config: &NotifierConfig) -> AppResult<Self> {
        Self::new(config.url(), config.timeout())
    }

    /// Target URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn try_send(&self, body: &serde_json::Value) -> Result<(), WebhookError> {
        let response = self.client.post(&self.url).json(body).send().await?;
        if !response.status().is_success() {
            return Err(WebhookError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

/// The payload map flattened into a JSON object with an `event` tag.
fn alert_body(kind: NotificationKind, payload: HashMap<String, String>) -> serde_json::Value {
    let mut body: serde_json::Map<String, serde_json::Value> = payload
        .into_iter()
        .map(|(k, v)| (k, serde_json::Value::String(v)))
        .collect();
    body.insert(
        "event".to_string(),
        serde_json::Value::String(kind.as_str().to_string()),
    );
    serde_json::Value::Object(body)
}

#[async_trait]
impl NotificationSink for WebhookSink {
    async fn notify(&self, kind: NotificationKind, payload: HashMap<String, String>) -> AppResult<()> {
        let body = alert_body(kind, payload);
        self.try_send(&body).await?;
        debug!(kind = %kind, url = %self.url, "Webhook delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};

    use super::*;

    type Captured = Arc<Mutex<Vec<serde_json::Value>>>;

    async fn spawn_receiver(status: StatusCode) -> (String, Captured) {
        let captured: Captured = Arc::default();
        let app = Router::new()
            .route(
                "/webhook",
                post(
                    move |State(store): State<Captured>, Json(body): Json<serde_json::Value>| async move {
                        store.lock().unwrap().push(body);
                        status
                    },
                ),
            )
            .with_state(Arc::clone(&captured));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}/webhook"), captured)
    }

    fn origin_payload() -> HashMap<String, String> {
        HashMap::from([
            ("old_address".to_string(), "1.1.1.1".to_string()),
            ("new_address".to_string(), "2.2.2.2".to_string()),
            (
                "warn".to_string(),
                "changed ip from 1.1.1.1 to 2.2.2.2".to_string(),
            ),
        ])
    }

    #[test]
    fn test_alert_body_has_event_tag() {
        let body = alert_body(NotificationKind::OriginChanged, origin_payload());
        assert_eq!(body["event"], "origin_changed");
        assert_eq!(body["warn"], "changed ip from 1.1.1.1 to 2.2.2.2");
    }

    #[test]
    fn test_webhook_error_display_http_status() {
        let err = WebhookError::HttpStatus(502);
        assert_eq!(err.to_string(), "Webhook returned HTTP 502");

        let app_err: AppError = err.into();
        assert_eq!(app_err.kind, ErrorKind::ExternalService);
        assert!(app_err.is_transient());
    }

    #[tokio::test]
    async fn test_delivers_json_body() {
        let (url, captured) = spawn_receiver(StatusCode::OK).await;
        let sink = WebhookSink::new(url, Duration::from_secs(2)).unwrap();

        sink.notify(NotificationKind::OriginChanged, origin_payload())
            .await
            .unwrap();

        let bodies = captured.lock().unwrap();
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0]["event"], "origin_changed");
        assert_eq!(bodies[0]["new_address"], "2.2.2.2");
    }

    #[tokio::test]
    async fn test_non_success_status_is_external_service_error() {
        let (url, _captured) = spawn_receiver(StatusCode::BAD_GATEWAY).await;
        let sink = WebhookSink::new(url, Duration::from_secs(2)).unwrap();

        let err = sink
            .notify(NotificationKind::OriginChanged, origin_payload())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExternalService);
    }
}
