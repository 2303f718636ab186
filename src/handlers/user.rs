//! 用户管理的 HTTP 处理器

use crate::{
    auth::{middleware::AuthContext, password::PasswordHasher},
    error::AppError,
    handlers::extract::ApiJson,
    middleware::AppState,
    models::user::*,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use validator::Validate;

/// 创建用户
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;
    PasswordHasher::validate_password_policy(&req.password, &state.config.security)?;

    let hashed_password = state.hasher.hash_async(&req.password).await?;
    let user = state.stores.users.create(&req.email, &hashed_password).await?;

    tracing::info!(user_id = %user.id, "User created");

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// 列出用户
pub async fn list_users(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let users = state.stores.users.list().await?;

    let user_responses: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();

    Ok(Json(user_responses))
}

/// 更新自己的邮箱和密码
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;
    PasswordHasher::validate_password_policy(&req.password, &state.config.security)?;

    let hashed_password = state.hasher.hash_async(&req.password).await?;
    let user = state
        .stores
        .users
        .update_credentials(auth_context.user_id, &req.email, &hashed_password)
        .await?
        .ok_or_else(|| AppError::not_found("user"))?;

    tracing::info!(user_id = %user.id, "User credentials updated");

    Ok(Json(UserResponse::from(user)))
}
