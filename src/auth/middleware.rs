//! 认证中间件

use crate::{
    auth::extract::extract_api_key,
    error::AppError,
    middleware::AppState,
};
use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use uuid::Uuid;

/// 认证上下文（附加到请求扩展）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: Uuid,
}

// 在 handler 中直接提取 AuthContext
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// JWT 认证中间件 - 必须携带有效访问令牌
pub async fn jwt_auth_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_context = state.guard.authenticate(req.headers())?;

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}

/// Webhook API Key 中间件
pub async fn api_key_middleware(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let key = extract_api_key(req.headers())?;

    if !state.api_key.verify(&key) {
        tracing::warn!(uri = %req.uri(), "Webhook API key rejected");
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(req).await)
}
