//! Data Transfer Objects
//!
//! 请求体提取与校验：
//! - `application/json`：整个对象
//! - `application/x-www-form-urlencoded`：扁平的字符串字段
//! - 其它 Content-Type：按空对象处理

use std::collections::HashMap;

use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::application::{ApplicationError, GenerateQrCode};
use crate::infrastructure::http::error::ApiError;

/// 缺少 data 时的校验消息
pub const DATA_REQUIRED: &str = "Data is required";

/// data 不是字符串时的校验消息
pub const DATA_MUST_BE_STRING: &str = "Data must be a string";

// ============================================================================
// QR DTOs
// ============================================================================

/// 生成二维码请求（未校验）
#[derive(Debug, Default, Deserialize)]
pub struct GenerateQrRequest {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub options: Option<Value>,
}

impl GenerateQrRequest {
    /// 从任意 JSON 值构造；非对象的请求体视为空对象
    pub fn from_value(body: Value) -> Self {
        serde_json::from_value(body).unwrap_or_default()
    }

    /// 校验 data 存在且非空（不做 trim），产出生成命令
    pub fn validate(self) -> Result<GenerateQrCode, ApplicationError> {
        let data = match self.data {
            None | Some(Value::Null) => return Err(ApplicationError::validation(DATA_REQUIRED)),
            Some(Value::String(s)) if s.is_empty() => {
                return Err(ApplicationError::validation(DATA_REQUIRED))
            }
            Some(Value::String(s)) => s,
            Some(_) => return Err(ApplicationError::validation(DATA_MUST_BE_STRING)),
        };

        Ok(GenerateQrCode {
            data,
            options: self.options,
        })
    }
}

fn content_type(req: &Request) -> String {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_lowercase()
}

#[async_trait]
impl<S> FromRequest<S> for GenerateQrRequest
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = content_type(&req);

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(mut fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| ApiError::from_status(e.status().as_u16(), e.body_text()))?;

            return Ok(Self {
                data: fields.remove("data").map(Value::String),
                options: None,
            });
        }

        if content_type.starts_with("application/json") || content_type.contains("+json") {
            let Json(body) = Json::<Value>::from_request(req, state)
                .await
                .map_err(|e| ApiError::from_status(e.status().as_u16(), e.body_text()))?;

            return Ok(Self::from_value(body));
        }

        tracing::debug!(content_type = %content_type, "Request body not parsed");
        Ok(Self::default())
    }
}
