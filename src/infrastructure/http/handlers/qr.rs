//! QR HTTP Handlers

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::infrastructure::http::dto::GenerateQrRequest;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 生成二维码
///
/// 成功时直接返回图像字节，Content-Type 与实际输出格式一致
pub async fn generate_qr(
    State(state): State<Arc<AppState>>,
    request: GenerateQrRequest,
) -> Result<Response, ApiError> {
    let command = request.validate()?;

    let result = state.generate_qr_handler.handle(command).await?;

    Ok(([(header::CONTENT_TYPE, result.content_type)], result.image_data).into_response())
}

/// 未匹配的路由
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}

/// 路由存在但方法不匹配
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed("Method not allowed".to_string())
}
