//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. `PORT` 环境变量
//! 2. `QRGATE_` 前缀的环境变量
//! 3. 配置文件（config.toml）
//! 4. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 端口环境变量
const PORT_ENV: &str = "PORT";

/// 加载应用配置
///
/// # 环境变量示例
/// - `PORT=8080`
/// - `QRGATE_SERVER__HOST=127.0.0.1`
/// - `QRGATE_SERVER__BODY_LIMIT=1048576`
/// - `QRGATE_LOG__LEVEL=debug`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let port = std::env::var(PORT_ENV).ok();
    load_config_from_sources(None, port.as_deref())
}

/// 从指定路径和端口覆盖值加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
/// - `port_override` - `PORT` 的值，空字符串视为未设置
pub fn load_config_from_sources(
    config_path: Option<&Path>,
    port_override: Option<&str>,
) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 3000)?
        .set_default("server.body_limit", 100 * 1024)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量，例如: QRGATE_SERVER__PORT=8080
    builder = builder.add_source(
        Environment::with_prefix("QRGATE")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. PORT（最高优先级）
    if let Some(port) = port_override.filter(|p| !p.is_empty()) {
        let port: u16 = port.parse().map_err(|_| {
            ConfigError::ValidationError(format!("Invalid {} value: {}", PORT_ENV, port))
        })?;
        builder = builder.set_override("server.port", i64::from(port))?;
    }

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.server.host.is_empty() {
        return Err(ConfigError::ValidationError(
            "Server host cannot be empty".to_string(),
        ));
    }

    if config.server.body_limit == 0 {
        return Err(ConfigError::ValidationError(
            "Body limit cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Body Limit: {} bytes", config.server.body_limit);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("Log JSON: {}", config.log.json);
    tracing::info!("=================================");
}
