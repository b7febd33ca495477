//! Command Handlers 实现

mod qr_handlers;

pub use qr_handlers::*;
