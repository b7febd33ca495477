//! QR Commands

use serde_json::Value;

/// 生成二维码命令
#[derive(Debug, Clone)]
pub struct GenerateQrCode {
    pub data: String,
    /// 调用方提供的渲染参数（未合并）
    pub options: Option<Value>,
}

/// 生成二维码响应
#[derive(Debug, Clone)]
pub struct GenerateQrCodeResponse {
    pub image_data: Vec<u8>,
    pub content_type: &'static str,
}
