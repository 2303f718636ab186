//! 管理端点：访问计数与开发环境重置

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse},
};
use std::sync::Arc;

use crate::{error::AppError, middleware::AppState};

/// 静态文件访问计数页面
pub async fn metrics(State(state): State<Arc<AppState>>) -> Html<String> {
    let hits = state.fileserver_hits.get();

    Html(format!(
        "<html>\n  <body>\n    <h1>Welcome, Chirpy Admin</h1>\n    <p>Chirpy has been visited {} times!</p>\n  </body>\n</html>\n",
        hits
    ))
}

/// 删除所有用户并清零计数（仅 dev 平台）
pub async fn reset(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    if !state.config.server.is_dev() {
        tracing::warn!(platform = %state.config.server.platform, "Reset refused outside dev");
        return Err(AppError::Forbidden);
    }

    let deleted = state.stores.users.delete_all().await?;
    state.fileserver_hits.reset();

    tracing::info!(deleted_users = deleted, "Reset complete");

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        "Metrics reset",
    ))
}
