//! Bearer-token extractors.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use tokenwarden_core::error::AppError;
use tokenwarden_core::types::UserId;

use crate::error::ApiError;
use crate::state::AppState;

/// The raw token from `Authorization: Bearer <token>`, not yet validated.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl<S: Send + Sync> FromRequestParts<S> for BearerToken {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::invalid_credential("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::invalid_credential("Invalid Authorization header format"))?;

        Ok(Self(token.to_string()))
    }
}

/// A request whose bearer token passed signature, expiry, and blacklist checks.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Subject of the token.
    pub user_id: UserId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;
        let user_id = state.sessions.authenticate(&token).await?;
        Ok(Self { user_id })
    }
}
