//! QR Context - 二维码渲染上下文
//!
//! 职责:
//! - 默认渲染参数与调用方参数的合并
//! - 渲染参数的强类型表示与校验

pub mod options;
mod value_objects;

pub use options::{default_options, merge_options};
pub use value_objects::{
    Color, ColorPair, ErrorCorrectionLevel, OutputFormat, RenderOptions, RenderOptionsError,
};
