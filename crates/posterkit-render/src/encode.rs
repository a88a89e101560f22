//! Image encoding for exported pixmaps.

use crate::raster::Pixmap;
use crate::renderer::{RenderError, RenderResult};
use image::ExtendedColorType;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use posterkit_core::export::ExportFormat;

/// Encode a pixmap. `quality` in [0, 1] applies to JPEG only; WebP output is lossless.
pub fn encode(pixmap: &Pixmap, format: ExportFormat, quality: f64) -> RenderResult<Vec<u8>> {
    let (width, height) = (pixmap.width(), pixmap.height());
    match format {
        ExportFormat::Png => encode_png(&pixmap.to_rgba8(), width, height),
        ExportFormat::Jpeg => {
            let mut data = Vec::new();
            let quality = (quality.clamp(0.0, 1.0) * 100.0).round().max(1.0) as u8;
            JpegEncoder::new_with_quality(&mut data, quality)
                .encode(&pixmap.to_rgb8(), width, height, ExtendedColorType::Rgb8)
                .map_err(|e| RenderError::Encode(e.to_string()))?;
            Ok(data)
        }
        ExportFormat::Webp => {
            let mut data = Vec::new();
            WebPEncoder::new_lossless(&mut data)
                .encode(&pixmap.to_rgba8(), width, height, ExtendedColorType::Rgba8)
                .map_err(|e| RenderError::Encode(e.to_string()))?;
            Ok(data)
        }
    }
}

/// Encode straight-alpha RGBA8 rows as PNG.
pub fn encode_png(rgba: &[u8], width: u32, height: u32) -> RenderResult<Vec<u8>> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| RenderError::Encode(e.to_string()))?;
        writer
            .write_image_data(rgba)
            .map_err(|e| RenderError::Encode(e.to_string()))?;
    }
    log::debug!("Encoded {}x{} PNG ({} bytes)", width, height, png_data.len());
    Ok(png_data)
}
