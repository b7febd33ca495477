//! QR Encoder Adapters

mod qrcode_encoder;

pub use qrcode_encoder::{encode_blocking, QrcodeEncoder, MAX_IMAGE_DIMENSION, MAX_TOTAL_MODULES};
