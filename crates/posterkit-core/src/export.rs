//! Image export through a render surface.
//!
//! Export temporarily resets the surface's display scale to 1, samples the
//! logical canvas at a high pixel ratio and restores the prior scale on every
//! exit path, including sampling failures.

use crate::canvas::CanvasSettings;
use crate::elements::Element;
use crate::resources::ResourceCache;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lower bound for the automatic pixel ratio.
pub const MIN_EXPORT_PIXEL_RATIO: f64 = 3.0;

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Invalid pixel ratio: {0}")]
    InvalidPixelRatio(f64),
    #[error("Canvas has no area: {width}x{height}")]
    EmptyCanvas { width: f64, height: f64 },
    #[error("Sampling failed: {0}")]
    Sampling(String),
    #[error("Encoding failed: {0}")]
    Encoding(String),
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Encoded image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
    Webp,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpeg",
            ExportFormat::Webp => "webp",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
            ExportFormat::Webp => "image/webp",
        }
    }

    /// Lossless formats ignore the quality setting.
    pub fn is_lossy(self) -> bool {
        !matches!(self, ExportFormat::Png)
    }
}

/// Caller-provided export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// Explicit pixel ratio; derived from the device ratio when absent.
    pub pixel_ratio: Option<f64>,
    pub device_pixel_ratio: f64,
    /// Encoder quality in [0, 1] for lossy formats.
    pub quality: f64,
    /// Filename stem; the canvas name is used when absent.
    pub file_name: Option<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            pixel_ratio: None,
            device_pixel_ratio: 1.0,
            quality: 1.0,
            file_name: None,
        }
    }
}

impl ExportOptions {
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_pixel_ratio(mut self, ratio: f64) -> Self {
        self.pixel_ratio = Some(ratio);
        self
    }

    pub fn with_device_pixel_ratio(mut self, ratio: f64) -> Self {
        self.device_pixel_ratio = ratio;
        self
    }

    /// Pixel ratio used for sampling.
    pub fn effective_pixel_ratio(&self, min_ratio: f64) -> f64 {
        match self.pixel_ratio {
            Some(ratio) => ratio,
            None => min_ratio.max(self.device_pixel_ratio * 2.0),
        }
    }
}

/// Everything a surface needs to produce one encoded image.
#[derive(Debug, Clone, Copy)]
pub struct SampleRequest<'a> {
    /// Logical canvas to sample.
    pub canvas: &'a CanvasSettings,
    pub elements: &'a [Element],
    pub resources: &'a ResourceCache,
    pub pixel_ratio: f64,
    pub format: ExportFormat,
    pub quality: f64,
}

impl SampleRequest<'_> {
    /// Output size in device pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            pixel_extent(self.canvas.width, self.pixel_ratio),
            pixel_extent(self.canvas.height, self.pixel_ratio),
        )
    }
}

fn pixel_extent(logical: f64, ratio: f64) -> u32 {
    (logical * ratio).round().clamp(1.0, u32::MAX as f64) as u32
}

/// A drawing surface that can be sampled into an encoded image.
pub trait RenderSurface {
    /// Current display scale.
    fn view_scale(&self) -> f64;

    fn set_view_scale(&mut self, scale: f64);

    /// Sample the logical canvas at the request's pixel ratio and encode it.
    fn sample(&mut self, request: &SampleRequest<'_>) -> ExportResult<Vec<u8>>;
}

/// Resets a surface to scale 1 and puts the prior scale back when dropped.
pub struct ScaleGuard<'a, S: RenderSurface + ?Sized> {
    surface: &'a mut S,
    saved: f64,
}

impl<'a, S: RenderSurface + ?Sized> ScaleGuard<'a, S> {
    pub fn acquire(surface: &'a mut S) -> Self {
        let saved = surface.view_scale();
        surface.set_view_scale(1.0);
        Self { surface, saved }
    }

    pub fn surface(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: RenderSurface + ?Sized> Drop for ScaleGuard<'_, S> {
    fn drop(&mut self) {
        self.surface.set_view_scale(self.saved);
    }
}

/// An encoded export with its suggested filename.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedImage {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub format: ExportFormat,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

/// `{name}-{width}x{height}-{YYYY-MM-DD}.{ext}`
pub fn export_filename(
    name: &str,
    width: f64,
    height: f64,
    date: NaiveDate,
    format: ExportFormat,
) -> String {
    format!(
        "{}-{}x{}-{}.{}",
        name,
        width.round() as i64,
        height.round() as i64,
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

/// Sample `elements` over the logical canvas and encode them.
pub fn export_image<S: RenderSurface + ?Sized>(
    surface: &mut S,
    canvas: &CanvasSettings,
    elements: &[Element],
    resources: &ResourceCache,
    options: &ExportOptions,
    min_pixel_ratio: f64,
) -> ExportResult<ExportedImage> {
    if canvas.width <= 0.0 || canvas.height <= 0.0 {
        return Err(ExportError::EmptyCanvas {
            width: canvas.width,
            height: canvas.height,
        });
    }
    let pixel_ratio = options.effective_pixel_ratio(min_pixel_ratio);
    if !pixel_ratio.is_finite() || pixel_ratio <= 0.0 {
        return Err(ExportError::InvalidPixelRatio(pixel_ratio));
    }

    let request = SampleRequest {
        canvas,
        elements,
        resources,
        pixel_ratio,
        format: options.format,
        quality: options.quality.clamp(0.0, 1.0),
    };
    let (pixel_width, pixel_height) = request.pixel_size();

    let bytes = {
        let mut guard = ScaleGuard::acquire(surface);
        guard.surface().sample(&request)
    };
    let bytes = bytes.inspect_err(|err| log::error!("Export failed: {err}"))?;

    let name = options.file_name.as_deref().unwrap_or(&canvas.name);
    let filename = export_filename(
        name,
        canvas.width,
        canvas.height,
        Utc::now().date_naive(),
        options.format,
    );
    log::info!(
        "Exported {} ({}x{} px, {} bytes)",
        filename,
        pixel_width,
        pixel_height,
        bytes.len()
    );

    Ok(ExportedImage {
        bytes,
        filename,
        format: options.format,
        pixel_width,
        pixel_height,
    })
}
