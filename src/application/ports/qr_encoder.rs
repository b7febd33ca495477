//! QR Encoder Port - 二维码编码器抽象
//!
//! 定义二维码编码与渲染的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

/// 编码错误
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Render failed: {0}")]
    RenderFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// 编码结果
#[derive(Debug, Clone)]
pub struct EncodedImage {
    /// 原始图像数据
    pub bytes: Vec<u8>,
    /// MIME 类型
    pub content_type: &'static str,
}

/// QR Encoder Port
///
/// `options` 是合并后的完整参数映射，由实现方解释和校验；
/// 实现方不认识的键应当忽略。
#[async_trait]
pub trait QrEncoderPort: Send + Sync {
    /// 将 `data` 编码为二维码图像
    async fn encode(&self, data: &str, options: &Map<String, Value>) -> Result<EncodedImage, EncodeError>;
}
