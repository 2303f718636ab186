//! 路由注册
//! 创建所有 API 路由并应用中间件

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, services::ServeDir};

use crate::{auth, handlers, middleware::AppState};

/// 请求体上限（1 MiB）
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// 创建应用路由
pub fn create_router(state: Arc<AppState>) -> Router {
    // 公开端点
    let public_routes = Router::new()
        .route("/api/healthz", get(handlers::health::healthz))
        .route(
            "/api/users",
            get(handlers::user::list_users).post(handlers::user::create_user),
        )
        .route("/api/login", post(handlers::auth::login))
        .route("/api/chirps", get(handlers::chirp::list_chirps))
        .route("/api/chirps/{chirpID}", get(handlers::chirp::get_chirp))
        .route("/api/validate_chirp", post(handlers::chirp::validate_chirp));

    // 刷新令牌在 handler 内校验（不是访问令牌）
    let refresh_routes = Router::new()
        .route("/api/refresh", post(handlers::auth::refresh))
        .route("/api/revoke", post(handlers::auth::revoke));

    // 需要访问令牌的路由
    let authenticated_routes = Router::new()
        .route("/api/users", axum::routing::put(handlers::user::update_user))
        .route("/api/chirps", post(handlers::chirp::create_chirp))
        .route(
            "/api/chirps/{chirpID}",
            axum::routing::delete(handlers::chirp::delete_chirp),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            auth::middleware::jwt_auth_middleware,
        ));

    // 支付方 webhook（API Key）
    let webhook_routes = Router::new()
        .route("/api/polka/webhooks", post(handlers::webhook::polka_webhook))
        .route_layer(from_fn_with_state(
            state.clone(),
            auth::middleware::api_key_middleware,
        ));

    let admin_routes = Router::new()
        .route("/admin/metrics", get(handlers::admin::metrics))
        .route("/admin/reset", post(handlers::admin::reset));

    // 静态文件，每次访问计数
    let static_routes = Router::new()
        .nest_service("/app", ServeDir::new(&state.config.server.filepath_root))
        .route_layer(from_fn_with_state(
            state.clone(),
            crate::middleware::fileserver_hits_middleware,
        ));

    // 组合所有路由
    Router::new()
        .merge(public_routes)
        .merge(refresh_routes)
        .merge(authenticated_routes)
        .merge(webhook_routes)
        .merge(admin_routes)
        .merge(static_routes)
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(crate::middleware::request_tracking_middleware))
                .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES)),
        )
        .with_state(state)
}
