//! 应用层错误定义
//!
//! 统一的命令错误类型。每个错误携带 HTTP 状态码和状态类别：
//! - 4xx → `fail`，消息可以原样返回给调用方
//! - 5xx → `error`，消息固定，内部细节只写日志

use thiserror::Error;

/// 生成失败时返回给调用方的固定消息
pub const GENERATION_FAILED_MESSAGE: &str = "Error generating QR code";

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 验证错误
    #[error("{0}")]
    ValidationError(String),

    /// 生成错误（内部细节不对外暴露）
    #[error("Error generating QR code")]
    GenerationError(String),
}

impl ApplicationError {
    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建生成错误，`detail` 仅用于日志
    pub fn generation(detail: impl Into<String>) -> Self {
        Self::GenerationError(detail.into())
    }

    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ValidationError(_) => 400,
            Self::GenerationError(_) => 500,
        }
    }

    /// 状态类别：4xx 为 `fail`，其余为 `error`
    pub fn status_class(&self) -> &'static str {
        if (400..500).contains(&self.status_code()) {
            "fail"
        } else {
            "error"
        }
    }

    /// 内部细节
    pub fn detail(&self) -> &str {
        match self {
            Self::ValidationError(msg) => msg,
            Self::GenerationError(detail) => detail,
        }
    }
}

impl From<crate::application::ports::EncodeError> for ApplicationError {
    fn from(err: crate::application::ports::EncodeError) -> Self {
        Self::GenerationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_is_fail_class() {
        let err = ApplicationError::validation("Data is required");
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.status_class(), "fail");
        assert_eq!(err.to_string(), "Data is required");
    }

    #[test]
    fn test_generation_error_hides_detail() {
        let err = ApplicationError::generation("data too long");
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.status_class(), "error");
        assert_eq!(err.to_string(), GENERATION_FAILED_MESSAGE);
        assert_eq!(err.detail(), "data too long");
    }
}
