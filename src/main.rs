//! Chirpy 服务主入口

use chirpy::{config::AppConfig, db, middleware::AppState, repository::Stores, routes, telemetry};
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;

/// 连接池指标采样间隔
const POOL_METRICS_INTERVAL: Duration = Duration::from_secs(15);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ===== CLI 参数处理 =====
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--version" => {
                println!("chirpy {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" => {
                print_help();
                return Ok(());
            }
            _ => {
                eprintln!("未知参数: {}", args[1]);
                print_help();
                std::process::exit(1);
            }
        }
    }

    // 加载 .env 文件（开发环境）
    // 生产环境应该直接设置环境变量
    if let Ok(name) = std::env::var("CHIRPY_ENV") {
        dotenv::from_filename(format!(".env.{}", name)).ok();
    } else {
        dotenv::from_filename(".env.local").ok();
        dotenv::dotenv().ok();
    }

    // 1. 加载配置
    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        anyhow::anyhow!("Failed to load configuration: {}", e)
    })?;

    // 2. 初始化日志
    telemetry::init_telemetry(&config.logging);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        platform = %config.server.platform,
        "Chirpy starting..."
    );

    // 3. 数据库连接池 + 迁移
    let db_pool = db::create_pool(&config.database).await?;
    db::run_migrations(&db_pool).await?;

    {
        let pool = db_pool.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(POOL_METRICS_INTERVAL);
            loop {
                interval.tick().await;
                db::record_pool_metrics(&pool);
            }
        });
    }

    tracing::info!("Database initialized");

    // 4. 构建应用状态
    let shutdown_timeout = Duration::from_secs(config.server.graceful_shutdown_timeout_secs);
    let addr = config.server.addr.clone();
    let app_state = Arc::new(AppState::new(config, Stores::postgres(db_pool))?);

    // 5. 构建路由
    let app = routes::create_router(app_state);

    // 6. 启动服务器
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(addr = %addr, "Server listening");

    // 7. 优雅关闭：收到信号后等待在途请求，超时强制退出
    let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);
    let mut server = tokio::spawn(
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.changed().await;
            })
            .into_future(),
    );

    tokio::select! {
        result = &mut server => {
            result??;
            return Ok(());
        }
        _ = shutdown_signal() => {}
    }

    let _ = shutdown_tx.send(true);

    match tokio::time::timeout(shutdown_timeout, server).await {
        Ok(result) => result??,
        Err(_) => tracing::warn!("Graceful shutdown timeout reached, forcing exit"),
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// 等待 Ctrl+C 或 SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Ctrl+C received, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Terminate signal received, starting graceful shutdown");
        },
    }
}

/// 打印帮助信息
fn print_help() {
    println!("chirpy {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("用法: chirpy [选项]");
    println!();
    println!("选项:");
    println!("  --version     打印版本信息并退出");
    println!("  --help        打印此帮助信息并退出");
    println!();
    println!("环境变量（前缀 CHIRPY_，层级用 __ 分隔）:");
    println!("  CHIRPY_DATABASE__URL           PostgreSQL 连接串（必填）");
    println!("  CHIRPY_SECURITY__JWT_SECRET    访问令牌签名密钥，至少 32 字节（必填）");
    println!("  CHIRPY_SECURITY__POLKA_KEY     支付方 webhook API Key（必填）");
    println!("  CHIRPY_SERVER__ADDR            监听地址，默认 0.0.0.0:8080");
    println!("  CHIRPY_SERVER__PLATFORM        dev 或 prod，默认 prod");
    println!("  CHIRPY_SERVER__FILEPATH_ROOT   /app 静态文件目录，默认 .");
    println!("  CHIRPY_LOGGING__LEVEL          trace/debug/info/warn/error");
    println!("  CHIRPY_LOGGING__FORMAT         json 或 pretty");
}
