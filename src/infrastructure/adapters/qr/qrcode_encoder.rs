//! Qrcode Encoder - 基于 qrcode + image 的二维码编码器
//!
//! 支持：
//! - PNG / JPEG 位图输出（image crate 编码）
//! - SVG 矢量输出
//! - UTF-8 字符画输出
//!
//! 符号生成由 qrcode crate 完成，本模块只负责参数解析和渲染。

use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use qrcode::{EcLevel, QrCode, Version};
use serde_json::{Map, Value};
use std::io::Cursor;

use crate::application::ports::{EncodeError, EncodedImage, QrEncoderPort};
use crate::domain::qr::{Color, ErrorCorrectionLevel, OutputFormat, RenderOptions};

/// 编码器识别的参数键
const KNOWN_OPTION_KEYS: &[&str] = &[
    "errorCorrectionLevel",
    "type",
    "quality",
    "margin",
    "scale",
    "width",
    "version",
    "color",
];

/// 位图边长上限（像素）
pub const MAX_IMAGE_DIMENSION: u32 = 8192;

/// 含静区的边长上限（模块数），对所有输出格式生效
pub const MAX_TOTAL_MODULES: u32 = 1024;

/// 二维码编码器
///
/// 无状态；CPU 密集的编码和渲染在 blocking 线程池中执行
#[derive(Debug, Clone, Default)]
pub struct QrcodeEncoder;

impl QrcodeEncoder {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl QrEncoderPort for QrcodeEncoder {
    async fn encode(
        &self,
        data: &str,
        options: &Map<String, Value>,
    ) -> Result<EncodedImage, EncodeError> {
        let unknown: Vec<&str> = options
            .keys()
            .map(String::as_str)
            .filter(|key| !KNOWN_OPTION_KEYS.contains(key))
            .collect();
        if !unknown.is_empty() {
            tracing::debug!(keys = ?unknown, "Ignoring unrecognized render options");
        }

        let options = RenderOptions::from_map(options)
            .map_err(|e| EncodeError::InvalidOptions(e.to_string()))?;
        tracing::debug!(
            format = %options.output_format,
            level = ?options.error_correction_level,
            margin = options.margin,
            "Encoding QR code"
        );
        let data = data.to_string();

        tokio::task::spawn_blocking(move || encode_blocking(&data, &options))
            .await
            .map_err(|e| EncodeError::Internal(format!("Encoding task failed: {}", e)))?
    }
}

/// 同步编码入口
pub fn encode_blocking(data: &str, options: &RenderOptions) -> Result<EncodedImage, EncodeError> {
    let grid = ModuleGrid::encode(data, options)?;
    check_total_modules(&grid, options.margin)?;

    let bytes = match options.output_format {
        OutputFormat::Png => {
            let image = render_raster(&grid, options)?;
            encode_png(image)?
        }
        OutputFormat::Jpeg => {
            let image = render_raster(&grid, options)?;
            encode_jpeg(image, options.jpeg_quality())?
        }
        OutputFormat::Svg => render_svg(&grid, options).into_bytes(),
        OutputFormat::Utf8 => render_utf8(&grid, options.margin).into_bytes(),
    };

    Ok(EncodedImage {
        bytes,
        content_type: options.output_format.mime_type(),
    })
}

/// 模块矩阵
struct ModuleGrid {
    width: u32,
    dark: Vec<bool>,
}

impl ModuleGrid {
    fn encode(data: &str, options: &RenderOptions) -> Result<Self, EncodeError> {
        let level = ec_level(options.error_correction_level);
        let code = match options.version {
            Some(version) => {
                QrCode::with_version(data.as_bytes(), Version::Normal(i16::from(version)), level)
            }
            None => QrCode::with_error_correction_level(data.as_bytes(), level),
        }
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

        Ok(Self {
            width: code.width() as u32,
            dark: code
                .to_colors()
                .into_iter()
                .map(|c| c == qrcode::Color::Dark)
                .collect(),
        })
    }

    /// 坐标以符号左上角为原点，静区内（越界）一律为浅色
    fn is_dark(&self, x: i64, y: i64) -> bool {
        let width = i64::from(self.width);
        if x < 0 || y < 0 || x >= width || y >= width {
            return false;
        }
        self.dark[(y * width + x) as usize]
    }
}

fn check_total_modules(grid: &ModuleGrid, margin: u32) -> Result<(), EncodeError> {
    margin
        .checked_mul(2)
        .and_then(|m| m.checked_add(grid.width))
        .filter(|total| *total <= MAX_TOTAL_MODULES)
        .map(|_| ())
        .ok_or_else(|| {
            EncodeError::InvalidOptions(format!(
                "Symbol larger than {} modules (modules={}, margin={})",
                MAX_TOTAL_MODULES, grid.width, margin
            ))
        })
}

fn ec_level(level: ErrorCorrectionLevel) -> EcLevel {
    match level {
        ErrorCorrectionLevel::Low => EcLevel::L,
        ErrorCorrectionLevel::Medium => EcLevel::M,
        ErrorCorrectionLevel::Quartile => EcLevel::Q,
        ErrorCorrectionLevel::High => EcLevel::H,
    }
}

fn render_raster(grid: &ModuleGrid, options: &RenderOptions) -> Result<RgbaImage, EncodeError> {
    let scale = options.module_scale(grid.width);
    let margin = options.margin;

    let size = margin
        .checked_mul(2)
        .and_then(|m| m.checked_add(grid.width))
        .and_then(|modules| modules.checked_mul(scale))
        .filter(|size| *size <= MAX_IMAGE_DIMENSION)
        .ok_or_else(|| {
            EncodeError::InvalidOptions(format!(
                "Image larger than {}px (modules={}, margin={}, scale={})",
                MAX_IMAGE_DIMENSION, grid.width, margin, scale
            ))
        })?;

    let dark = Rgba(options.color.dark.to_rgba());
    let light = Rgba(options.color.light.to_rgba());
    let margin = i64::from(margin);

    Ok(RgbaImage::from_fn(size, size, |x, y| {
        let module_x = i64::from(x / scale) - margin;
        let module_y = i64::from(y / scale) - margin;
        if grid.is_dark(module_x, module_y) {
            dark
        } else {
            light
        }
    }))
}

fn encode_png(image: RgbaImage) -> Result<Vec<u8>, EncodeError> {
    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);
    DynamicImage::ImageRgba8(image)
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|e| EncodeError::RenderFailed(format!("PNG encoding failed: {}", e)))?;
    Ok(buffer)
}

fn encode_jpeg(image: RgbaImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
    let mut buffer = Vec::new();
    let rgb = DynamicImage::ImageRgba8(image).to_rgb8();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    rgb.write_with_encoder(encoder)
        .map_err(|e| EncodeError::RenderFailed(format!("JPEG encoding failed: {}", e)))?;
    Ok(buffer)
}

fn svg_fill(attr: &str, color: &Color) -> String {
    if color.a == 255 {
        format!("{}=\"{}\"", attr, color.to_hex_rgb())
    } else {
        format!(
            "{}=\"{}\" {}-opacity=\"{:.2}\"",
            attr,
            color.to_hex_rgb(),
            attr,
            color.opacity()
        )
    }
}

fn render_svg(grid: &ModuleGrid, options: &RenderOptions) -> String {
    let margin = i64::from(options.margin);
    let dimension = i64::from(grid.width) + margin * 2;
    let pixels = dimension * i64::from(options.module_scale(grid.width));

    let mut path = String::new();
    for y in 0..i64::from(grid.width) {
        for x in 0..i64::from(grid.width) {
            if grid.is_dark(x, y) {
                if !path.is_empty() {
                    path.push(' ');
                }
                path += &format!("M{},{}h1v1h-1z", x + margin, y + margin);
            }
        }
    }

    let mut svg = String::new();
    svg += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
    svg += &format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{0}\" height=\"{0}\" viewBox=\"0 0 {1} {1}\" shape-rendering=\"crispEdges\">\n",
        pixels, dimension
    );
    svg += &format!(
        "\t<rect width=\"100%\" height=\"100%\" {}/>\n",
        svg_fill("fill", &options.color.light)
    );
    svg += &format!(
        "\t<path d=\"{}\" {}/>\n",
        path,
        svg_fill("fill", &options.color.dark)
    );
    svg += "</svg>\n";
    svg
}

/// 每个字符表示上下两个模块
fn render_utf8(grid: &ModuleGrid, margin: u32) -> String {
    let margin = i64::from(margin);
    let end = i64::from(grid.width) + margin;

    let mut lines = Vec::new();
    let mut y = -margin;
    while y < end {
        let line: String = (-margin..end)
            .map(|x| match (grid.is_dark(x, y), grid.is_dark(x, y + 1)) {
                (true, true) => '█',
                (true, false) => '▀',
                (false, true) => '▄',
                (false, false) => ' ',
            })
            .collect();
        lines.push(line);
        y += 2;
    }

    lines.join("\n")
}
