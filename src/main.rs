//! Tokenwarden Server: session token issuance, rotation, and revocation.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use tokenwarden_api::AppState;
use tokenwarden_auth::{CredentialHasher, SessionLifecycleManager, TokenCodec};
use tokenwarden_core::config::{AppConfig, StoreBackend};
use tokenwarden_core::error::AppError;
use tokenwarden_core::traits::NotificationSink;
use tokenwarden_database::{DatabasePool, MemorySessionStore, SessionStore};
use tokenwarden_notify::{LogSink, WebhookSink};

#[tokio::main]
async fn main() {
    let env = std::env::var("TOKENWARDEN_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Tokenwarden v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Session store ────────────────────────────────────
    let (store, db_pool): (Arc<dyn SessionStore>, Option<DatabasePool>) =
        match config.session.store {
            StoreBackend::Postgres => {
                let pool = DatabasePool::connect(&config.database).await?;
                pool.prepare(&config.database).await?;
                (Arc::new(pool.session_store()), Some(pool))
            }
            StoreBackend::Memory => {
                tracing::warn!("Using the in-memory session store; sessions are not durable");
                (Arc::new(MemorySessionStore::new()), None)
            }
        };

    // ── Step 2: Notification sink ────────────────────────────────
    let notifier: Arc<dyn NotificationSink> = if config.notifier.enabled {
        let sink = WebhookSink::from_config(&config.notifier)?;
        tracing::info!(url = %sink.url(), "Session alerts delivered by webhook");
        Arc::new(sink)
    } else {
        tracing::info!("Webhook disabled; session alerts are logged only");
        Arc::new(LogSink)
    };

    // ── Step 3: Token lifecycle ──────────────────────────────────
    let codec = Arc::new(TokenCodec::new(&config.auth)?);
    let hasher = Arc::new(CredentialHasher::new(&config.hasher)?);
    let sessions = SessionLifecycleManager::new(codec, hasher, store, notifier)
        .with_call_timeout(config.session.call_timeout())
        .with_notify_timeout(config.notifier.timeout());

    // ── Step 4: Serve until shutdown ─────────────────────────────
    let state = AppState::new(Arc::new(config), Arc::new(sessions), db_pool.clone());
    tokenwarden_api::serve(state, async {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
    })
    .await?;

    if let Some(pool) = db_pool {
        pool.close().await;
    }

    tracing::info!("Tokenwarden stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
