//! QR Context - Value Objects
//!
//! 编码器使用的强类型渲染参数。从合并后的参数映射解析而来，
//! 未识别的键在解析时被忽略。

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// 渲染参数错误
#[derive(Debug, Error)]
pub enum RenderOptionsError {
    #[error("Invalid render options: {0}")]
    Malformed(String),

    #[error("Unsupported error correction level: {0}")]
    UnsupportedLevel(String),

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Quality must be within [0, 1], got {0}")]
    QualityOutOfRange(f64),

    #[error("Scale must be positive")]
    ZeroScale,

    #[error("Version must be within [1, 40], got {0}")]
    VersionOutOfRange(u8),
}

/// 纠错等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(try_from = "String")]
pub enum ErrorCorrectionLevel {
    /// 约 7%
    Low,
    /// 约 15%
    Medium,
    /// 约 25%
    Quartile,
    /// 约 30%
    #[default]
    High,
}

impl std::str::FromStr for ErrorCorrectionLevel {
    type Err = RenderOptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "l" | "low" => Ok(Self::Low),
            "m" | "medium" => Ok(Self::Medium),
            "q" | "quartile" => Ok(Self::Quartile),
            "h" | "high" => Ok(Self::High),
            _ => Err(RenderOptionsError::UnsupportedLevel(s.to_string())),
        }
    }
}

impl TryFrom<String> for ErrorCorrectionLevel {
    type Error = RenderOptionsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(try_from = "String")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
    Svg,
    /// 终端字符画
    Utf8,
}

impl OutputFormat {
    /// 响应使用的 MIME 类型
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Svg => "image/svg+xml",
            Self::Utf8 => "text/plain; charset=utf-8",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Png => write!(f, "png"),
            Self::Jpeg => write!(f, "jpeg"),
            Self::Svg => write!(f, "svg"),
            Self::Utf8 => write!(f, "utf8"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = RenderOptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "png" | "image/png" => Ok(Self::Png),
            "jpeg" | "jpg" | "image/jpeg" => Ok(Self::Jpeg),
            "svg" | "image/svg+xml" => Ok(Self::Svg),
            "utf8" | "text/plain" => Ok(Self::Utf8),
            _ => Err(RenderOptionsError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl TryFrom<String> for OutputFormat {
    type Error = RenderOptionsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// RGBA 颜色
///
/// 接受 `#rgb`、`#rgba`、`#rrggbb`、`#rrggbbaa`，`#` 可省略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn to_rgba(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// `#rrggbb` 形式（不含 alpha）
    pub fn to_hex_rgb(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// alpha 通道的不透明度（0.0 - 1.0）
    pub fn opacity(&self) -> f32 {
        f32::from(self.a) / 255.0
    }
}

impl std::str::FromStr for Color {
    type Err = RenderOptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(RenderOptionsError::InvalidColor(s.to_string()));
        }

        let expanded: String = match hex.len() {
            3 | 4 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 | 8 => hex.to_string(),
            _ => return Err(RenderOptionsError::InvalidColor(s.to_string())),
        };

        let channel = |i: usize| {
            u8::from_str_radix(&expanded[i..i + 2], 16)
                .map_err(|_| RenderOptionsError::InvalidColor(s.to_string()))
        };

        let a = if expanded.len() == 8 { channel(6)? } else { 255 };
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a,
        })
    }
}

impl TryFrom<String> for Color {
    type Error = RenderOptionsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// 前景/背景色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColorPair {
    pub dark: Color,
    pub light: Color,
}

impl Default for ColorPair {
    fn default() -> Self {
        Self {
            dark: Color::BLACK,
            light: Color::WHITE,
        }
    }
}

/// 渲染参数
///
/// 不变量（由 [`RenderOptions::from_map`] 保证）:
/// - `quality` 在 [0, 1] 之间
/// - `scale` 大于 0
/// - `version` 若存在，在 [1, 40] 之间
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderOptions {
    pub error_correction_level: ErrorCorrectionLevel,

    #[serde(rename = "type")]
    pub output_format: OutputFormat,

    pub quality: f64,

    /// 静区宽度（模块数）
    pub margin: u32,

    /// 每个模块的像素数
    pub scale: u32,

    /// 目标图像宽度（像素），0 表示不指定
    pub width: Option<u32>,

    /// 固定的符号版本
    pub version: Option<u8>,

    pub color: ColorPair,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            error_correction_level: ErrorCorrectionLevel::High,
            output_format: OutputFormat::Png,
            quality: 0.92,
            margin: 1,
            scale: 4,
            width: None,
            version: None,
            color: ColorPair::default(),
        }
    }
}

impl RenderOptions {
    /// 从参数映射解析并校验
    pub fn from_map(map: &Map<String, Value>) -> Result<Self, RenderOptionsError> {
        let options: RenderOptions = serde_json::from_value(Value::Object(map.clone()))
            .map_err(|e| RenderOptionsError::Malformed(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    fn validate(&self) -> Result<(), RenderOptionsError> {
        if !(0.0..=1.0).contains(&self.quality) {
            return Err(RenderOptionsError::QualityOutOfRange(self.quality));
        }
        if self.scale == 0 {
            return Err(RenderOptionsError::ZeroScale);
        }
        if let Some(version) = self.version {
            if !(1..=40).contains(&version) {
                return Err(RenderOptionsError::VersionOutOfRange(version));
            }
        }
        Ok(())
    }

    /// 计算每个模块的像素数
    ///
    /// 指定了 `width` 且足以容纳符号和静区时按宽度推算，否则使用 `scale`。
    pub fn module_scale(&self, symbol_width: u32) -> u32 {
        let total = self.margin.saturating_mul(2).saturating_add(symbol_width);
        match self.width {
            Some(width) if width >= total && total > 0 => width / total,
            _ => self.scale,
        }
    }

    /// JPEG 编码质量（1 - 100）
    pub fn jpeg_quality(&self) -> u8 {
        (self.quality * 100.0).round().clamp(1.0, 100.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::qr::options::{default_options, merge_options};
    use serde_json::json;

    #[test]
    fn test_defaults_parse_to_default_options() {
        let options = RenderOptions::from_map(&default_options()).unwrap();
        assert_eq!(options, RenderOptions::default());
    }

    #[test]
    fn test_level_parsing_is_case_insensitive() {
        assert_eq!("l".parse::<ErrorCorrectionLevel>().unwrap(), ErrorCorrectionLevel::Low);
        assert_eq!("Quartile".parse::<ErrorCorrectionLevel>().unwrap(), ErrorCorrectionLevel::Quartile);
        assert!("Z".parse::<ErrorCorrectionLevel>().is_err());
    }

    #[test]
    fn test_output_format_mime_types() {
        assert_eq!("image/png".parse::<OutputFormat>().unwrap().mime_type(), "image/png");
        assert_eq!("jpg".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
        assert!("gif".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_color_parsing() {
        assert_eq!("#000000".parse::<Color>().unwrap(), Color::BLACK);
        assert_eq!("fff".parse::<Color>().unwrap(), Color::WHITE);
        assert_eq!(
            "#ff000080".parse::<Color>().unwrap(),
            Color { r: 255, g: 0, b: 0, a: 128 }
        );
        assert_eq!("#0f08".parse::<Color>().unwrap(), Color { r: 0, g: 255, b: 0, a: 136 });
        assert!("#12345".parse::<Color>().is_err());
        assert!("#gggggg".parse::<Color>().is_err());
        assert!("red".parse::<Color>().is_err());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let map = merge_options(Some(&json!({ "maskPattern": 2, "small": true })));
        assert!(RenderOptions::from_map(&map).is_ok());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        for overrides in [
            json!({ "margin": -1 }),
            json!({ "errorCorrectionLevel": "X" }),
            json!({ "quality": 1.5 }),
            json!({ "scale": 0 }),
            json!({ "version": 41 }),
            json!({ "color": { "dark": "blue" } }),
            json!({ "type": "bmp" }),
        ] {
            let map = merge_options(Some(&overrides));
            assert!(RenderOptions::from_map(&map).is_err(), "accepted {overrides}");
        }
    }

    #[test]
    fn test_module_scale_prefers_width() {
        let mut options = RenderOptions::default();
        assert_eq!(options.module_scale(21), 4);

        options.width = Some(230);
        assert_eq!(options.module_scale(21), 10);

        // 宽度不足以容纳符号时退回 scale
        options.width = Some(10);
        assert_eq!(options.module_scale(21), 4);
    }

    #[test]
    fn test_module_scale_with_huge_margin() {
        let mut options = RenderOptions::default();
        options.margin = 3_000_000_000;
        assert_eq!(options.module_scale(21), 4);

        options.width = Some(u32::MAX);
        assert_eq!(options.module_scale(21), 4);
    }

    #[test]
    fn test_jpeg_quality() {
        let mut options = RenderOptions::default();
        assert_eq!(options.jpeg_quality(), 92);
        options.quality = 0.0;
        assert_eq!(options.jpeg_quality(), 1);
    }
}
