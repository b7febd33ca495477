//! qrgate - 二维码生成 HTTP 服务
//!
//! 组合根：加载配置、初始化日志、装配编码器与 HTTP 服务器

use std::sync::Arc;

use qrgate::config::{load_config, print_config, LogConfig};
use qrgate::infrastructure::adapters::QrcodeEncoder;
use qrgate::infrastructure::http::{AppState, HttpServer, ServerConfig};

fn init_tracing(log: &LogConfig) {
    let log_filter = format!(
        "{},qrgate={},tower_http=debug",
        log.level, log.level
    );
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：PORT > 环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config.log);

    tracing::info!("qrgate - QR code generation service");
    print_config(&config);

    // 创建编码器
    let encoder = Arc::new(QrcodeEncoder::new());

    // 创建 HTTP 服务器
    let server_config = ServerConfig::new(&config.server.host, config.server.port)
        .with_body_limit(config.server.body_limit);
    let state = AppState::new(encoder);

    let server = HttpServer::new(server_config, state);

    tracing::info!("Starting HTTP server...");

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
