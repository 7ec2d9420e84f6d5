//! Client fingerprint extraction.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::header::USER_AGENT;
use axum::http::request::Parts;

use crate::error::ApiError;

const FORWARDED_FOR: &str = "x-forwarded-for";

/// Device tag and network origin of the calling client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientMeta {
    /// `User-Agent` header, empty when absent.
    pub device_tag: String,
    /// First `X-Forwarded-For` hop, else the peer IP, else `unknown`.
    pub source_address: String,
}

impl<S: Send + Sync> FromRequestParts<S> for ClientMeta {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let device_tag = parts
            .headers
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let forwarded = parts
            .headers
            .get(FORWARDED_FOR)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from);

        let source_address = forwarded
            .or_else(|| {
                parts
                    .extensions
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip().to_string())
            })
            .unwrap_or_else(|| "unknown".to_string());

        Ok(Self {
            device_tag,
            source_address,
        })
    }
}
