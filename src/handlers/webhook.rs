//! 支付方 webhook 处理器

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

use crate::{
    error::AppError,
    handlers::extract::ApiJson,
    middleware::AppState,
    models::webhook::{WebhookEvent, USER_UPGRADED},
};

/// 处理 Polka 事件；只响应 user.upgraded，其余事件直接确认
pub async fn polka_webhook(
    State(state): State<Arc<AppState>>,
    ApiJson(event): ApiJson<WebhookEvent>,
) -> Result<impl IntoResponse, AppError> {
    if event.event != USER_UPGRADED {
        tracing::debug!(event = %event.event, "Ignoring webhook event");
        return Ok(StatusCode::NO_CONTENT);
    }

    let user_id = event
        .user_id()
        .ok_or_else(|| AppError::BadRequest("Missing or invalid data.user_id".to_string()))?;

    if !state.stores.users.upgrade_to_chirpy_red(user_id).await? {
        return Err(AppError::not_found("user"));
    }

    tracing::info!(user_id = %user_id, "User upgraded to Chirpy Red");

    Ok(StatusCode::NO_CONTENT)
}
