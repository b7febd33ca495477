//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod qr;

pub use qr::*;
