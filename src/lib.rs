//! qrgate - 二维码生成 HTTP 服务
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - QR Context: 渲染参数默认值、合并与校验
//!
//! 应用层 (application/):
//! - Ports: QrEncoder 端口定义
//! - Commands: 生成二维码命令处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API、错误映射、中间件
//! - Adapters: 基于 qrcode + image 的编码器

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
