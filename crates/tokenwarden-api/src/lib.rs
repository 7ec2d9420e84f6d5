//! # tokenwarden-api
//!
//! HTTP API layer for Tokenwarden built on Axum.
//!
//! Exposes the session lifecycle (authorize, refresh, me, logout) and a
//! health probe, together with extractors, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, serve};
pub use state::AppState;
