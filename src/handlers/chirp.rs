//! Chirp 的 HTTP 处理器

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    auth::{middleware::AuthContext, AuthorizationGuard},
    error::AppError,
    handlers::extract::{ApiJson, ApiPath, ApiQuery},
    middleware::AppState,
    models::chirp::*,
};

/// 发布 chirp
pub async fn create_chirp(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    ApiJson(req): ApiJson<CreateChirpRequest>,
) -> Result<impl IntoResponse, AppError> {
    let body = clean_body(&req.body)?;

    // 令牌有效但用户可能已被删除
    state
        .stores
        .users
        .find_by_id(auth_context.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("user"))?;

    let chirp = state.stores.chirps.create(&body, auth_context.user_id).await?;

    Ok((StatusCode::CREATED, Json(chirp)))
}

/// 列出 chirps
pub async fn list_chirps(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ChirpQuery>,
) -> Result<impl IntoResponse, AppError> {
    let chirps = state.stores.chirps.list(query.author_id, query.sort).await?;

    Ok(Json(chirps))
}

pub async fn get_chirp(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let chirp = state
        .stores
        .chirps
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("chirp"))?;

    Ok(Json(chirp))
}

/// 删除 chirp（仅作者）
pub async fn delete_chirp(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let chirp = state
        .stores
        .chirps
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("chirp"))?;

    AuthorizationGuard::authorize_owner(&auth_context, chirp.user_id)?;

    if !state.stores.chirps.delete(id).await? {
        return Err(AppError::not_found("chirp"));
    }

    tracing::info!(chirp_id = %id, user_id = %auth_context.user_id, "Chirp deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// 校验并过滤 chirp 内容（不保存）
pub async fn validate_chirp(
    ApiJson(req): ApiJson<CreateChirpRequest>,
) -> Result<impl IntoResponse, AppError> {
    let cleaned_body = clean_body(&req.body)?;

    Ok(Json(ValidateChirpResponse { cleaned_body }))
}
