//! 应用层 - 命令

mod qr_commands;

pub mod handlers;

pub use qr_commands::*;
