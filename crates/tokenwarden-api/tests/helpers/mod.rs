//! Test application over the in-memory session store.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use tower::ServiceExt;

use tokenwarden_api::{AppState, build_app};
use tokenwarden_auth::{CredentialHasher, SessionLifecycleManager, TokenCodec};
use tokenwarden_core::config::{AppConfig, HasherConfig, StoreBackend};
use tokenwarden_database::MemorySessionStore;
use tokenwarden_notify::LogSink;

/// Parsed HTTP response.
pub struct TestResponse {
    pub status: StatusCode,
    pub body: serde_json::Value,
}

/// Client-side fingerprint sent with a request.
#[derive(Clone, Copy)]
pub struct Client<'a> {
    pub user_agent: &'a str,
    pub ip: &'a str,
}

pub const AGENT_A: Client<'static> = Client {
    user_agent: "agentA",
    ip: "1.1.1.1",
};

pub struct TestApp {
    pub router: Router,
    pub store: MemorySessionStore,
}

impl TestApp {
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.auth.signing_secret = "api-test-signing-secret-0123456789abcdef".to_string();
        config.session.store = StoreBackend::Memory;
        config.hasher = HasherConfig {
            memory_kib: 256,
            iterations: 1,
            parallelism: 1,
        };

        let store = MemorySessionStore::new();
        let manager = SessionLifecycleManager::new(
            Arc::new(TokenCodec::new(&config.auth).expect("valid auth config")),
            Arc::new(CredentialHasher::new(&config.hasher).expect("valid hasher config")),
            Arc::new(store.clone()),
            Arc::new(LogSink),
        );

        let state = AppState::new(Arc::new(config), Arc::new(manager), None);

        Self {
            router: build_app(state),
            store,
        }
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
        token: Option<&str>,
        client: Client<'_>,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("user-agent", client.user_agent)
            .header("x-forwarded-for", client.ip);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);

        TestResponse { status, body }
    }

    /// Authorizes `guid` and returns `(access_token, refresh_token)`.
    pub async fn authorize(&self, guid: &str, client: Client<'_>) -> (String, String) {
        let response = self
            .request(
                "POST",
                &format!("/api/auth/authorize?guid={guid}"),
                None,
                None,
                client,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
        tokens(&response)
    }
}

pub fn tokens(response: &TestResponse) -> (String, String) {
    let data = &response.body["data"];
    (
        data["access_token"].as_str().unwrap().to_string(),
        data["refresh_token"].as_str().unwrap().to_string(),
    )
}
