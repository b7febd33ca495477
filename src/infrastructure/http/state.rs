//! Application State
//!
//! 所有请求共享的只读状态

use std::sync::Arc;

use crate::application::{GenerateQrCodeHandler, QrEncoderPort};

/// 应用状态
///
/// 不含可变状态，请求之间无需同步
pub struct AppState {
    // ========== Command Handlers ==========
    pub generate_qr_handler: GenerateQrCodeHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(qr_encoder: Arc<dyn QrEncoderPort>) -> Self {
        Self {
            generate_qr_handler: GenerateQrCodeHandler::new(qr_encoder),
        }
    }
}
