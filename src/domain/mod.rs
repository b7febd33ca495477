//! Domain Layer - 领域层
//!
//! - QR Context: 二维码渲染参数

pub mod qr;
