//! Paint list construction.
//!
//! A [`PaintList`] is the renderer-ready form of a scene: every visible element
//! in paint order, with its full transform, outline and resolved paints.
//! Backends consume it without knowing about element kinds.

use kurbo::{Affine, BezPath, Line, Rect, Shape as KurboShape, Size, Vec2};
use peniko::{BlendMode, Brush};
use posterkit_core::canvas::CanvasSettings;
use posterkit_core::elements::{
    Crop, Element, ElementId, LineCap, LineJoin, SerializableColor, TextAlign,
};
use posterkit_core::export::ExportError;
use posterkit_core::fill::{FillGeometry, resolve_element_fill, resolve_fill};
use posterkit_core::geometry::element_transform;
use posterkit_core::store::ElementStore;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Unsupported image source: {0}")]
    UnsupportedSource(String),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
    #[error("Surface size {width}x{height} is empty")]
    EmptySurface { width: u32, height: u32 },
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

impl From<RenderError> for ExportError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Encode(reason) => ExportError::Encoding(reason),
            other => ExportError::Sampling(other.to_string()),
        }
    }
}

/// Overlay color for grid lines and the safe-area frame.
const OVERLAY_COLOR: SerializableColor = SerializableColor::new(0, 0, 0, 40);

/// Stroke parameters for a path.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokePaint {
    pub color: SerializableColor,
    pub width: f64,
    pub dash: Option<Vec<f64>>,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
}

/// Hard drop shadow under an item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowPaint {
    pub color: SerializableColor,
    /// Offset in canvas units.
    pub offset: Vec2,
    pub blur: f64,
}

/// What an item draws in its local space.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintContent {
    Shape {
        path: BezPath,
        fill: Option<Brush>,
        stroke: Option<StrokePaint>,
    },
    Image {
        size: Size,
        src: String,
        crop: Option<Crop>,
    },
    Text {
        size: Size,
        text: String,
        font_family: String,
        font_size: f64,
        line_height: f64,
        align: TextAlign,
        fill: Brush,
    },
}

impl PaintContent {
    /// Local-space silhouette, used for shadows and bounds.
    pub fn outline(&self) -> BezPath {
        match self {
            PaintContent::Shape { path, .. } => path.clone(),
            PaintContent::Image { size, .. } | PaintContent::Text { size, .. } => {
                size.to_rect().to_path(0.1)
            }
        }
    }
}

/// One painted element.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintItem {
    pub id: ElementId,
    /// Local space to canvas space.
    pub transform: Affine,
    pub content: PaintContent,
    pub opacity: f64,
    pub blend: BlendMode,
    pub shadow: Option<ShadowPaint>,
}

impl PaintItem {
    pub fn from_element(element: &Element) -> Self {
        let size = element.size();
        let content = match element {
            Element::Image(image) => PaintContent::Image {
                size,
                src: image.src.clone(),
                crop: image.crop,
            },
            Element::Text(text) => PaintContent::Text {
                size,
                text: text.text.clone(),
                font_family: text.font_family.clone(),
                font_size: text.font_size,
                line_height: text.line_height,
                align: text.align,
                fill: resolve_element_fill(element).map_or_else(
                    || Brush::Solid(SerializableColor::black().into()),
                    |fill| fill.to_brush(),
                ),
            },
            Element::Rect(_) | Element::Circle(_) | Element::Path(_) => PaintContent::Shape {
                path: element.local_path(),
                fill: resolve_element_fill(element).map(|fill| fill.to_brush()),
                stroke: element
                    .stroke()
                    .filter(|stroke| stroke.is_visible())
                    .map(|stroke| StrokePaint {
                        color: stroke.color,
                        width: stroke.width,
                        dash: stroke.dash.clone(),
                        line_cap: stroke.line_cap,
                        line_join: stroke.line_join,
                    }),
            },
        };
        let base = element.base();
        Self {
            id: element.id(),
            transform: element_transform(element),
            content,
            opacity: base.opacity.clamp(0.0, 1.0),
            blend: base.blend_mode.to_peniko(),
            shadow: element.effective_shadow().map(|shadow| ShadowPaint {
                color: shadow.color,
                offset: Vec2::new(shadow.offset_x, shadow.offset_y),
                blur: shadow.blur,
            }),
        }
    }

    /// Axis-aligned bounds in canvas space, including stroke and shadow.
    pub fn bounds(&self) -> Rect {
        let half_stroke = match &self.content {
            PaintContent::Shape {
                stroke: Some(stroke),
                ..
            } => stroke.width / 2.0,
            _ => 0.0,
        };
        let local = self.content.outline().bounding_box().inflate(half_stroke, half_stroke);
        let bounds = self.transform.transform_rect_bbox(local);
        match self.shadow {
            Some(shadow) => bounds.union(bounds + shadow.offset),
            None => bounds,
        }
    }
}

/// Context for building one paint list.
pub struct RenderContext<'a> {
    pub canvas: &'a CanvasSettings,
    pub elements: &'a [Element],
    /// Include the grid and safe-area guides the editor shows.
    pub overlays: bool,
}

impl<'a> RenderContext<'a> {
    pub fn new(canvas: &'a CanvasSettings, elements: &'a [Element]) -> Self {
        Self {
            canvas,
            elements,
            overlays: false,
        }
    }

    pub fn with_overlays(mut self, overlays: bool) -> Self {
        self.overlays = overlays;
        self
    }
}

/// A whole scene ready for a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintList {
    pub size: Size,
    pub background: Brush,
    pub corner_radius: f64,
    pub items: Vec<PaintItem>,
    /// Guide lines drawn above the content.
    pub guides: Vec<Line>,
}

impl PaintList {
    pub fn build(ctx: &RenderContext) -> Self {
        let canvas = ctx.canvas;
        let store = ElementStore::from_elements(ctx.elements.to_vec());
        let items = store
            .paint_order()
            .into_iter()
            .filter(|element| element.is_visible())
            .map(PaintItem::from_element)
            .collect();

        let mut guides = Vec::new();
        if ctx.overlays {
            guides.extend(canvas.grid_lines());
            if let Some(safe) = canvas.safe_area_rect() {
                guides.extend(rect_edges(safe));
            }
        }

        Self {
            size: canvas.size(),
            background: resolve_fill(
                &canvas.background,
                FillGeometry::Box {
                    width: canvas.width,
                    height: canvas.height,
                },
            )
            .to_brush(),
            corner_radius: canvas.corner_radius.max(0.0),
            items,
            guides,
        }
    }

    /// Stroke used for guide lines, at one device pixel for `scale`.
    pub fn guide_stroke(scale: f64) -> StrokePaint {
        StrokePaint {
            color: OVERLAY_COLOR,
            width: 1.0 / scale.max(f64::EPSILON),
            dash: None,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
        }
    }
}

fn rect_edges(rect: Rect) -> [Line; 4] {
    let (tl, tr) = ((rect.x0, rect.y0), (rect.x1, rect.y0));
    let (br, bl) = ((rect.x1, rect.y1), (rect.x0, rect.y1));
    [
        Line::new(tl, tr),
        Line::new(tr, br),
        Line::new(br, bl),
        Line::new(bl, tl),
    ]
}
