//! Auth handlers: authorize, refresh, me, logout.

use axum::Json;
use axum::extract::{Query, State};

use tokenwarden_core::error::AppError;
use tokenwarden_core::types::UserId;

use crate::dto::request::{AuthorizeQuery, RefreshRequest};
use crate::dto::response::{ApiResponse, MeResponse, MessageResponse, TokenResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, BearerToken, ClientMeta};
use crate::state::AppState;

/// POST /api/auth/authorize?guid=
pub async fn authorize(
    State(state): State<AppState>,
    client: ClientMeta,
    Query(query): Query<AuthorizeQuery>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    let user_id: UserId = query
        .guid
        .parse()
        .map_err(|_| AppError::validation("guid must be a UUID"))?;

    let pair = state
        .sessions
        .issue(user_id, &client.device_tag, &client.source_address)
        .await?;

    Ok(Json(ApiResponse::ok(pair.into())))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    client: ClientMeta,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    let pair = state
        .sessions
        .refresh(
            &req.access_token,
            &req.refresh_token,
            &client.device_tag,
            &client.source_address,
        )
        .await?;

    Ok(Json(ApiResponse::ok(pair.into())))
}

/// GET /api/auth/me
pub async fn me(auth: AuthUser) -> Json<ApiResponse<MeResponse>> {
    Json(ApiResponse::ok(MeResponse {
        user_guid: auth.user_id.to_string(),
    }))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.sessions.revoke(&token).await?;

    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Logged out successfully".to_string(),
    })))
}
