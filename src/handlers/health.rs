//! 健康检查处理器

use axum::http::header;
use axum::response::IntoResponse;

/// 存活探针
/// 快速响应，不检查依赖
pub async fn healthz() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], "OK")
}
