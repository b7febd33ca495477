//! HTTP Error Handling
//!
//! 终端错误处理：所有失败都在这里转换为 JSON 响应
//! - 状态码为 500 时消息替换为固定文本，不泄露内部细节
//! - 其它状态码原样返回消息

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::ApplicationError;

/// 500 响应的固定消息
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
        }
    }
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    MethodNotAllowed(String),
    PayloadTooLarge(String),
    /// 携带内部细节，仅写日志
    Internal(String),
}

impl ApiError {
    /// 按状态码构造；404 / 405 / 413 以外的 4xx 归为 400，无法识别的状态码按 500 处理
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match StatusCode::from_u16(status) {
            Ok(StatusCode::NOT_FOUND) => ApiError::NotFound(message),
            Ok(StatusCode::METHOD_NOT_ALLOWED) => ApiError::MethodNotAllowed(message),
            Ok(StatusCode::PAYLOAD_TOO_LARGE) => ApiError::PayloadTooLarge(message),
            Ok(s) if s.is_client_error() => ApiError::BadRequest(message),
            _ => ApiError::Internal(message),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回给调用方的消息
    pub fn client_message(&self) -> String {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::MethodNotAllowed(msg)
            | ApiError::PayloadTooLarge(msg) => {
                msg.clone()
            }
            ApiError::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            ApiError::Internal(detail) => {
                tracing::error!(status = status.as_u16(), error = %detail, "Internal server error");
            }
            ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::MethodNotAllowed(msg)
            | ApiError::PayloadTooLarge(msg) => {
                tracing::warn!(status = status.as_u16(), error = %msg, "Request rejected");
            }
        }

        (status, Json(ErrorResponse::new(self.client_message()))).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        tracing::debug!(
            status = e.status_code(),
            class = e.status_class(),
            detail = e.detail(),
            "Application error"
        );
        match e {
            ApplicationError::ValidationError(msg) => ApiError::BadRequest(msg),
            ApplicationError::GenerationError(detail) => ApiError::Internal(detail),
        }
    }
}

/// handler panic 时的响应（CatchPanicLayer 使用）
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    ApiError::Internal(format!("Handler panicked: {}", detail)).into_response()
}
