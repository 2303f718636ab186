//! HTTP 中间件与应用状态
//! 请求追踪、静态文件访问计数

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    auth::{ApiKeyVerifier, AuthorizationGuard, JwtService, PasswordHasher},
    config::AppConfig,
    error::AppError,
    repository::Stores,
    services::{AuthService, RefreshTokenService},
};
use secrecy::ExposeSecret;

/// 静态文件访问计数
#[derive(Debug, Default)]
pub struct HitCounter(AtomicU64);

impl HitCounter {
    pub fn increment(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.0.store(0, Ordering::Relaxed);
    }
}

/// 应用状态
///
/// 启动后只读；所有可变状态在存储层或原子计数器内部
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub stores: Stores,
    pub auth_service: Arc<AuthService>,
    pub hasher: Arc<PasswordHasher>,
    pub guard: AuthorizationGuard,
    pub api_key: Arc<ApiKeyVerifier>,
    pub fileserver_hits: Arc<HitCounter>,
}

impl AppState {
    /// 根据配置和存储构建全部服务
    pub fn new(config: AppConfig, stores: Stores) -> Result<Self, AppError> {
        let jwt_service = Arc::new(JwtService::from_config(&config)?);
        let hasher = Arc::new(PasswordHasher::new());
        let refresh_tokens = Arc::new(RefreshTokenService::new(stores.refresh_tokens.clone()));

        let auth_service = Arc::new(AuthService::new(
            stores.users.clone(),
            refresh_tokens,
            jwt_service.clone(),
            hasher.clone(),
        ));
        let api_key = Arc::new(ApiKeyVerifier::new(config.security.polka_key.expose_secret()));

        Ok(Self {
            config: Arc::new(config),
            stores,
            auth_service,
            guard: AuthorizationGuard::new(jwt_service),
            hasher,
            api_key,
            fileserver_hits: Arc::new(HitCounter::default()),
        })
    }
}

/// 请求追踪中间件
/// 为每个请求生成 trace_id 和 request_id，并记录指标
pub async fn request_tracking_middleware(req: Request, next: Next) -> Response {
    let trace_id = extract_or_generate_trace_id(req.headers());
    let request_id = Uuid::new_v4().to_string();

    let method = req.method().clone();
    // 只记录路径，查询参数不进日志
    let path = req.uri().path().to_string();

    let span = tracing::info_span!(
        "http_request",
        trace_id = %trace_id,
        request_id = %request_id,
        method = %method,
        path = %path,
    );

    async move {
        let start = Instant::now();

        let mut response = next.run(req).await;

        let elapsed = start.elapsed();
        let status = response.status().as_u16();

        // 指标标签使用静态字符串
        let method_name = match method.as_str() {
            "GET" => "GET",
            "POST" => "POST",
            "PUT" => "PUT",
            "DELETE" => "DELETE",
            _ => "OTHER",
        };
        let status_class = match status {
            200..=299 => "2xx",
            300..=399 => "3xx",
            400..=499 => "4xx",
            _ => "5xx",
        };

        metrics::counter!("http_requests_total", "method" => method_name, "status" => status_class)
            .increment(1);
        metrics::histogram!("http_request_duration_seconds").record(elapsed.as_secs_f64());

        tracing::info!(
            status = status,
            elapsed_ms = elapsed.as_millis() as u64,
            "Request completed"
        );

        if let Ok(value) = HeaderValue::from_str(&trace_id) {
            response.headers_mut().insert("x-trace-id", value);
        }
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert("x-request-id", value);
        }

        response
    }
    .instrument(span)
    .await
}

/// 静态文件访问计数中间件
pub async fn fileserver_hits_middleware(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    state.fileserver_hits.increment();
    next.run(req).await
}

/// 从请求头中提取或生成 trace_id
fn extract_or_generate_trace_id(headers: &HeaderMap) -> String {
    headers
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty() && s.len() <= 128)
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}
