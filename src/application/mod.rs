//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（QrEncoder）
//! - commands: 命令及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;

// Re-exports
pub use commands::{
    handlers::{GenerateQrCodeHandler, DATA_REQUIRED_FOR_GENERATION},
    GenerateQrCode, GenerateQrCodeResponse,
};

pub use error::{ApplicationError, GENERATION_FAILED_MESSAGE};

pub use ports::{EncodeError, EncodedImage, QrEncoderPort};
