//! Surface rasterization.
//!
//! # spawn_blocking pattern
//! Drawing a multi-page bitmap at 2x is the only long-running step in the
//! service. `capture` moves owned copies into `spawn_blocking` and awaits the
//! result, so the tokio scheduler stays free while pixels are filled.

use std::io::Cursor;
use std::sync::Arc;

use ab_glyph::PxScale;
use image::codecs::jpeg::JpegEncoder;
use image::buffer::ConvertBuffer;
use image::{Rgba, RgbImage, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use serde::Deserialize;
use tracing::debug;

use crate::export::ExportError;
use crate::render::fonts::FontLibrary;
use crate::render::surface::{DrawOp, Surface};

/// Lowest accepted capture scale.
pub const MIN_SCALE: f32 = 2.0;

/// Hard ceiling on bitmap area (about 480 MB of RGBA).
const MAX_PIXELS: u64 = 120_000_000;

/// Distance from the line-box top to the glyph box top for a given font size.
const HALF_LEADING: f32 = 0.2;

const JPEG_QUALITY: u8 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    #[serde(alias = "jpg")]
    Jpeg,
}

impl ImageFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Capture
// ────────────────────────────────────────────────────────────────────────────

/// Rasterizes `surface` off the async executor. The scale is clamped to
/// `MIN_SCALE`.
pub async fn capture(
    surface: Surface,
    fonts: Arc<FontLibrary>,
    scale: f32,
) -> Result<RgbaImage, ExportError> {
    let scale = scale.max(MIN_SCALE);
    tokio::task::spawn_blocking(move || rasterize_sync(&surface, &fonts, scale)).await?
}

/// Draws every op of `surface` into one tall bitmap, `scale` device pixels
/// per CSS px.
pub fn rasterize_sync(
    surface: &Surface,
    fonts: &FontLibrary,
    scale: f32,
) -> Result<RgbaImage, ExportError> {
    let width = (surface.width * scale).round().max(1.0) as u32;
    let height = (surface.height * scale).round().max(1.0) as u32;
    if width as u64 * height as u64 > MAX_PIXELS {
        return Err(ExportError::TooLarge { width, height });
    }

    let mut img = RgbaImage::from_pixel(width, height, Rgba(surface.background.to_rgba()));

    for op in &surface.ops {
        match op {
            DrawOp::Rect { x, y, w, h, color } => {
                let rw = (w * scale).round().max(1.0) as u32;
                let rh = (h * scale).round().max(1.0) as u32;
                let rect = Rect::at((x * scale).round() as i32, (y * scale).round() as i32)
                    .of_size(rw, rh);
                draw_filled_rect_mut(&mut img, rect, Rgba(color.to_rgba()));
            }
            DrawOp::Disc { cx, cy, r, color } => {
                draw_filled_circle_mut(
                    &mut img,
                    ((cx * scale).round() as i32, (cy * scale).round() as i32),
                    (r * scale).round() as i32,
                    Rgba(color.to_rgba()),
                );
            }
            DrawOp::Text {
                x,
                y,
                size,
                face,
                weight,
                color,
                text,
            } => {
                let top = y + size * HALF_LEADING;
                draw_text_mut(
                    &mut img,
                    Rgba(color.to_rgba()),
                    (x * scale).round() as i32,
                    (top * scale).round() as i32,
                    PxScale::from(size * scale),
                    fonts.get(*face, *weight),
                    text,
                );
            }
        }
    }

    debug!(width, height, ops = surface.ops.len(), "surface rasterized");
    Ok(img)
}

// ────────────────────────────────────────────────────────────────────────────
// Encoding
// ────────────────────────────────────────────────────────────────────────────

pub fn encode(img: &RgbaImage, format: ImageFormat) -> Result<Vec<u8>, ExportError> {
    match format {
        ImageFormat::Png => encode_png(img),
        ImageFormat::Jpeg => encode_jpeg(img),
    }
}

pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)?;
    Ok(buffer)
}

/// JPEG has no alpha channel; the bitmap is flattened to RGB first.
pub fn encode_jpeg(img: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let rgb: RgbImage = img.convert();
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY);
    rgb.write_with_encoder(encoder)?;
    Ok(buffer)
}
