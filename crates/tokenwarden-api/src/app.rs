//! Application builder and server loop.

use std::future::Future;
use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use tokenwarden_core::error::{AppError, ErrorKind};

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Serves the API on the configured address until `shutdown` resolves.
///
/// Peer addresses are exposed to handlers via `ConnectInfo` so the client
/// origin can be recorded when no `X-Forwarded-For` header is present.
pub async fn serve<F>(state: AppState, shutdown: F) -> Result<(), AppError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = state.config.server.bind_address();
    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Configuration,
            format!("Failed to bind {addr}"),
            e,
        )
    })?;

    info!(address = %addr, "Tokenwarden listening");

    axum::serve(
        listener,
        build_app(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Internal, "Server error", e))
}
