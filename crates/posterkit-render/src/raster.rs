//! CPU rasterization of paint lists with tiny-skia.
//!
//! Paint lists carry peniko brushes and blend modes; they are translated to
//! tiny-skia shaders here. Text glyphs need a shaping engine and are not drawn.

use crate::encode::encode;
use crate::renderer::{
    PaintContent, PaintItem, PaintList, RenderContext, RenderError, RenderResult, StrokePaint,
};
use kurbo::{Affine, BezPath, PathEl, Rect, RoundedRect, Shape as KurboShape, Size};
use peniko::color::Srgb;
use peniko::{Brush, Extend, GradientKind, Mix};
use posterkit_core::elements::{Crop, LineCap, LineJoin, SerializableColor};
use posterkit_core::export::{ExportResult, RenderSurface, SampleRequest};
use posterkit_core::resources::{Bitmap, ResourceCache};
use tiny_skia::{
    ColorU8, FillRule, FilterQuality, GradientStop, IntSize, LinearGradient, Paint, PathBuilder,
    Pattern, RadialGradient, Shader, SpreadMode, StrokeDash, Transform,
};

/// Drawn where an image has no decoded bitmap yet.
const IMAGE_PLACEHOLDER: SerializableColor = SerializableColor::new(229, 229, 229, 255);

/// Flattening tolerance for kurbo shapes, in local units.
const FLATTEN_TOLERANCE: f64 = 0.1;

/// Premultiplied RGBA pixel buffer.
#[derive(Clone)]
pub struct Pixmap {
    inner: tiny_skia::Pixmap,
}

impl Pixmap {
    /// Transparent pixmap. Zero-sized surfaces are refused.
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        tiny_skia::Pixmap::new(width, height)
            .map(|inner| Self { inner })
            .ok_or(RenderError::EmptySurface { width, height })
    }

    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// Straight-alpha RGBA8 at a pixel, or `None` outside the pixmap.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.inner.pixel(x, y).map(|px| {
            let c = px.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
    }

    /// Straight-alpha RGBA8 rows.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.inner
            .pixels()
            .iter()
            .flat_map(|px| {
                let c = px.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect()
    }

    /// RGB8 rows composited over white, for formats without alpha.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.inner
            .pixels()
            .iter()
            .flat_map(|px| {
                let white = 255 - px.alpha();
                [px.red(), px.green(), px.blue()].map(|c| c.saturating_add(white))
            })
            .collect()
    }
}

fn to_transform(affine: Affine) -> Transform {
    let [a, b, c, d, e, f] = affine.as_coeffs().map(|v| v as f32);
    Transform::from_row(a, b, c, d, e, f)
}

fn to_point(point: kurbo::Point) -> tiny_skia::Point {
    tiny_skia::Point::from_xy(point.x as f32, point.y as f32)
}

fn to_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut builder = PathBuilder::new();
    for el in path.iter() {
        match el {
            PathEl::MoveTo(p) => builder.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => builder.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(p1, p2) => {
                builder.quad_to(p1.x as f32, p1.y as f32, p2.x as f32, p2.y as f32)
            }
            PathEl::CurveTo(p1, p2, p3) => builder.cubic_to(
                p1.x as f32,
                p1.y as f32,
                p2.x as f32,
                p2.y as f32,
                p3.x as f32,
                p3.y as f32,
            ),
            PathEl::ClosePath => builder.close(),
        }
    }
    builder.finish()
}

fn to_color(color: peniko::Color) -> tiny_skia::Color {
    let [r, g, b, a] = color.components.map(|c| c.clamp(0.0, 1.0));
    tiny_skia::Color::from_rgba(r, g, b, a).unwrap_or(tiny_skia::Color::BLACK)
}

fn solid(color: SerializableColor) -> Shader<'static> {
    Shader::SolidColor(tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.a))
}

/// Shader for a peniko brush. Sweep gradients and image brushes fall back to
/// their first stop or nothing.
pub fn brush_shader(brush: &Brush) -> Option<Shader<'static>> {
    let gradient = match brush {
        Brush::Solid(color) => return Some(Shader::SolidColor(to_color(*color))),
        Brush::Gradient(gradient) => gradient,
        Brush::Image(_) => return None,
    };
    let colors: Vec<(f32, tiny_skia::Color)> = gradient
        .stops
        .iter()
        .map(|stop| (stop.offset, to_color(stop.color.to_alpha_color::<Srgb>())))
        .collect();
    let fallback = colors.first().map(|&(_, color)| Shader::SolidColor(color));
    let stops = colors
        .iter()
        .map(|&(offset, color)| GradientStop::new(offset, color))
        .collect();
    let mode = match gradient.extend {
        Extend::Pad => SpreadMode::Pad,
        Extend::Repeat => SpreadMode::Repeat,
        Extend::Reflect => SpreadMode::Reflect,
    };
    let shader = match &gradient.kind {
        GradientKind::Linear(line) => LinearGradient::new(
            to_point(line.start),
            to_point(line.end),
            stops,
            mode,
            Transform::identity(),
        ),
        GradientKind::Radial(radial) => RadialGradient::new(
            to_point(radial.start_center),
            to_point(radial.end_center),
            radial.end_radius,
            stops,
            mode,
            Transform::identity(),
        ),
        GradientKind::Sweep(_) => None,
    };
    // Degenerate gradients (zero length, one stop) are refused by tiny-skia.
    shader.or(fallback)
}

pub fn blend_mode(mode: peniko::BlendMode) -> tiny_skia::BlendMode {
    use tiny_skia::BlendMode as Tsk;
    match mode.mix {
        Mix::Normal => Tsk::SourceOver,
        Mix::Multiply => Tsk::Multiply,
        Mix::Screen => Tsk::Screen,
        Mix::Overlay => Tsk::Overlay,
        Mix::Darken => Tsk::Darken,
        Mix::Lighten => Tsk::Lighten,
        Mix::ColorDodge => Tsk::ColorDodge,
        Mix::ColorBurn => Tsk::ColorBurn,
        Mix::HardLight => Tsk::HardLight,
        Mix::SoftLight => Tsk::SoftLight,
        Mix::Difference => Tsk::Difference,
        Mix::Exclusion => Tsk::Exclusion,
        Mix::Hue => Tsk::Hue,
        Mix::Saturation => Tsk::Saturation,
        Mix::Color => Tsk::Color,
        Mix::Luminosity => Tsk::Luminosity,
        _ => Tsk::SourceOver,
    }
}

fn to_stroke(stroke: &StrokePaint) -> tiny_skia::Stroke {
    let dash = stroke
        .dash
        .as_ref()
        .filter(|pattern| !pattern.is_empty())
        .and_then(|pattern| {
            let mut intervals: Vec<f32> = pattern.iter().map(|v| *v as f32).collect();
            // Odd dash lists repeat once, as in SVG.
            if intervals.len() % 2 == 1 {
                intervals.extend_from_within(..);
            }
            StrokeDash::new(intervals, 0.0)
        });
    tiny_skia::Stroke {
        width: stroke.width as f32,
        line_cap: match stroke.line_cap {
            LineCap::Butt => tiny_skia::LineCap::Butt,
            LineCap::Round => tiny_skia::LineCap::Round,
            LineCap::Square => tiny_skia::LineCap::Square,
        },
        line_join: match stroke.line_join {
            LineJoin::Miter => tiny_skia::LineJoin::Miter,
            LineJoin::Round => tiny_skia::LineJoin::Round,
            LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
        },
        dash,
        ..Default::default()
    }
}

fn paint(mut shader: Shader<'_>, opacity: f32, blend: tiny_skia::BlendMode) -> Paint<'_> {
    if opacity < 1.0 {
        shader.apply_opacity(opacity);
    }
    Paint {
        shader,
        blend_mode: blend,
        anti_alias: true,
        ..Paint::default()
    }
}

/// Fill a local-space path with nonzero winding.
fn fill_path(
    target: &mut tiny_skia::Pixmap,
    path: &BezPath,
    to_device: Affine,
    shader: Shader<'_>,
    opacity: f32,
    blend: tiny_skia::BlendMode,
) {
    let Some(path) = to_path(path) else {
        return;
    };
    target.fill_path(
        &path,
        &paint(shader, opacity, blend),
        FillRule::Winding,
        to_transform(to_device),
        None,
    );
}

fn stroke_path(
    target: &mut tiny_skia::Pixmap,
    path: &BezPath,
    to_device: Affine,
    stroke: &StrokePaint,
    opacity: f32,
    blend: tiny_skia::BlendMode,
) {
    let Some(path) = to_path(path) else {
        return;
    };
    target.stroke_path(
        &path,
        &paint(solid(stroke.color), opacity, blend),
        &to_stroke(stroke),
        to_transform(to_device),
        None,
    );
}

/// Straight-alpha bitmap to a premultiplied tiny-skia pixmap.
fn bitmap_pixmap(bitmap: &Bitmap) -> Option<tiny_skia::Pixmap> {
    let size = IntSize::from_wh(bitmap.width, bitmap.height)?;
    let data = bitmap
        .rgba
        .chunks_exact(4)
        .flat_map(|px| {
            let c = ColorU8::from_rgba(px[0], px[1], px[2], px[3]).premultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    tiny_skia::Pixmap::from_vec(data, size)
}

/// Draws paint lists into pixmaps.
pub struct Rasterizer<'a> {
    resources: &'a ResourceCache,
    /// Canvas units to device pixels.
    scale: f64,
}

impl<'a> Rasterizer<'a> {
    pub fn new(resources: &'a ResourceCache, scale: f64) -> Self {
        Self { resources, scale }
    }

    pub fn render(&self, list: &PaintList, width: u32, height: u32) -> RenderResult<Pixmap> {
        let mut pixmap = Pixmap::new(width, height)?;
        let target = &mut pixmap.inner;
        let device = Affine::scale(self.scale);

        let page = RoundedRect::from_rect(list.size.to_rect(), list.corner_radius)
            .to_path(FLATTEN_TOLERANCE);
        if let Some(shader) = brush_shader(&list.background) {
            fill_path(target, &page, device, shader, 1.0, tiny_skia::BlendMode::SourceOver);
        }

        for item in &list.items {
            self.draw_item(target, device, item);
        }

        let guide = PaintList::guide_stroke(self.scale);
        for line in &list.guides {
            stroke_path(
                target,
                &line.to_path(FLATTEN_TOLERANCE),
                device,
                &guide,
                1.0,
                tiny_skia::BlendMode::SourceOver,
            );
        }

        Ok(pixmap)
    }

    fn draw_item(&self, target: &mut tiny_skia::Pixmap, device: Affine, item: &PaintItem) {
        let to_device = device * item.transform;
        if to_device.determinant().abs() < f64::EPSILON {
            return;
        }
        let opacity = item.opacity as f32;
        let blend = blend_mode(item.blend);

        if let Some(shadow) = item.shadow {
            let offset = device * Affine::translate(shadow.offset) * item.transform;
            let outline = item.content.outline();
            fill_path(target, &outline, offset, solid(shadow.color), opacity, blend);
        }

        match &item.content {
            PaintContent::Shape { path, fill, stroke } => {
                if let Some(shader) = fill.as_ref().and_then(brush_shader) {
                    fill_path(target, path, to_device, shader, opacity, blend);
                }
                if let Some(stroke) = stroke {
                    stroke_path(target, path, to_device, stroke, opacity, blend);
                }
            }
            PaintContent::Image { size, src, crop } => {
                self.draw_image(target, to_device, *size, src, *crop, opacity, blend);
            }
            PaintContent::Text { text, .. } => {
                log::debug!("Skipping glyphs for text item {} ({} chars)", item.id, text.len());
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_image(
        &self,
        target: &mut tiny_skia::Pixmap,
        to_device: Affine,
        size: Size,
        src: &str,
        crop: Option<Crop>,
        opacity: f32,
        blend: tiny_skia::BlendMode,
    ) {
        let frame = size.to_rect().to_path(FLATTEN_TOLERANCE);
        let Some(image) = self.resources.bitmap(src).and_then(|b| bitmap_pixmap(&b)) else {
            fill_path(target, &frame, to_device, solid(IMAGE_PLACEHOLDER), opacity, blend);
            return;
        };
        let window = crop.map_or(
            Rect::new(0.0, 0.0, image.width() as f64, image.height() as f64),
            |c| Rect::new(c.x, c.y, c.x + c.width, c.y + c.height),
        );
        if window.width() <= 0.0 || window.height() <= 0.0 {
            return;
        }
        // Bitmap space to local space: the crop window stretches over the frame.
        let placement = Affine::scale_non_uniform(
            size.width / window.width(),
            size.height / window.height(),
        ) * Affine::translate(-window.origin().to_vec2());
        let shader = Pattern::new(
            image.as_ref(),
            SpreadMode::Pad,
            FilterQuality::Nearest,
            1.0,
            to_transform(placement),
        );
        fill_path(target, &frame, to_device, shader, opacity, blend);
    }
}

/// Software surface used for export.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    view_scale: f64,
}

impl Default for RasterSurface {
    fn default() -> Self {
        Self { view_scale: 1.0 }
    }
}

impl RasterSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw a request into a pixmap without encoding it.
    pub fn rasterize(&self, request: &SampleRequest<'_>) -> RenderResult<Pixmap> {
        let (width, height) = request.pixel_size();
        let list = PaintList::build(&RenderContext::new(request.canvas, request.elements));
        Rasterizer::new(request.resources, request.pixel_ratio * self.view_scale)
            .render(&list, width, height)
    }
}

impl RenderSurface for RasterSurface {
    fn view_scale(&self) -> f64 {
        self.view_scale
    }

    fn set_view_scale(&mut self, scale: f64) {
        self.view_scale = scale;
    }

    fn sample(&mut self, request: &SampleRequest<'_>) -> ExportResult<Vec<u8>> {
        let pixmap = self.rasterize(request)?;
        Ok(encode(&pixmap, request.format, request.quality)?)
    }
}
