//! QR Command Handlers

use std::sync::Arc;

use crate::application::commands::{GenerateQrCode, GenerateQrCodeResponse};
use crate::application::error::ApplicationError;
use crate::application::ports::QrEncoderPort;
use crate::domain::qr::merge_options;

/// 服务层对空数据的校验消息
pub const DATA_REQUIRED_FOR_GENERATION: &str = "Data is required to generate QR code";

/// GenerateQrCode Handler - 合并渲染参数并调用编码器
///
/// 无状态，可在所有请求间共享。每次调用只编码一次，不重试、不缓存。
pub struct GenerateQrCodeHandler {
    encoder: Arc<dyn QrEncoderPort>,
}

impl GenerateQrCodeHandler {
    pub fn new(encoder: Arc<dyn QrEncoderPort>) -> Self {
        Self { encoder }
    }

    pub async fn handle(
        &self,
        command: GenerateQrCode,
    ) -> Result<GenerateQrCodeResponse, ApplicationError> {
        // 上游已校验过，这里仍然拒绝直接调用时传入的空数据
        if command.data.is_empty() {
            return Err(ApplicationError::validation(DATA_REQUIRED_FOR_GENERATION));
        }

        let options = merge_options(command.options.as_ref());

        let image = self
            .encoder
            .encode(&command.data, &options)
            .await
            .map_err(|e| {
                tracing::error!(
                    data_len = command.data.len(),
                    error = %e,
                    "QR code generation failed"
                );
                ApplicationError::from(e)
            })?;

        tracing::debug!(
            data_len = command.data.len(),
            content_type = image.content_type,
            size = image.bytes.len(),
            "QR code generated"
        );

        Ok(GenerateQrCodeResponse {
            image_data: image.bytes,
            content_type: image.content_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{EncodeError, EncodedImage};
    use async_trait::async_trait;
    use serde_json::{json, Map, Value};
    use std::sync::Mutex;

    /// 记录调用参数的编码器
    #[derive(Default)]
    struct RecordingEncoder {
        calls: Mutex<Vec<(String, Map<String, Value>)>>,
        fail_with: Option<String>,
    }

    impl RecordingEncoder {
        fn failing(message: &str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_with: Some(message.to_string()),
            }
        }

        fn calls(&self) -> Vec<(String, Map<String, Value>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl QrEncoderPort for RecordingEncoder {
        async fn encode(
            &self,
            data: &str,
            options: &Map<String, Value>,
        ) -> Result<EncodedImage, EncodeError> {
            self.calls
                .lock()
                .unwrap()
                .push((data.to_string(), options.clone()));

            match &self.fail_with {
                Some(message) => Err(EncodeError::EncodingFailed(message.clone())),
                None => Ok(EncodedImage {
                    bytes: data.as_bytes().to_vec(),
                    content_type: "image/png",
                }),
            }
        }
    }

    fn command(data: &str, options: Option<Value>) -> GenerateQrCode {
        GenerateQrCode {
            data: data.to_string(),
            options,
        }
    }

    #[tokio::test]
    async fn test_empty_data_never_reaches_encoder() {
        let encoder = Arc::new(RecordingEncoder::default());
        let handler = GenerateQrCodeHandler::new(encoder.clone());

        let err = handler.handle(command("", None)).await.unwrap_err();

        assert!(matches!(err, ApplicationError::ValidationError(_)));
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), DATA_REQUIRED_FOR_GENERATION);
        assert!(encoder.calls().is_empty());
    }

    #[tokio::test]
    async fn test_encoder_receives_merged_options() {
        let encoder = Arc::new(RecordingEncoder::default());
        let handler = GenerateQrCodeHandler::new(encoder.clone());

        let response = handler
            .handle(command("hello", Some(json!({ "color": { "dark": "#112233" } }))))
            .await
            .unwrap();
        assert_eq!(response.content_type, "image/png");
        assert_eq!(response.image_data, b"hello");

        let calls = encoder.calls();
        assert_eq!(calls.len(), 1);
        let (data, options) = &calls[0];
        assert_eq!(data, "hello");
        assert_eq!(options["errorCorrectionLevel"], "H");
        assert_eq!(options["margin"], 1);
        assert_eq!(options["color"]["dark"], "#112233");
        assert_eq!(options["color"]["light"], "#ffffff");
    }

    #[tokio::test]
    async fn test_encoder_failure_collapses_to_generation_error() {
        let encoder = Arc::new(RecordingEncoder::failing("data too long"));
        let handler = GenerateQrCodeHandler::new(encoder.clone());

        let err = handler.handle(command("hello", None)).await.unwrap_err();

        assert!(matches!(err, ApplicationError::GenerationError(_)));
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.to_string(), "Error generating QR code");
        assert!(!err.to_string().contains("too long"));
        assert_eq!(encoder.calls().len(), 1);
    }
}
