//! Element definitions for the poster canvas.

mod circle;
mod image;
mod patch;
mod path;
mod rect;
mod style;
mod text;

pub use circle::CircleElement;
pub use image::{Crop, ImageElement};
pub use patch::{
    CirclePatch, CommonPatch, ElementPatch, ImagePatch, KindPatch, PatchError, PatchResult,
    PathPatch, RectPatch, TextPatch,
};
pub use path::PathElement;
pub use rect::{CornerRadii, RectElement};
pub use style::{
    BlendMode, Blur, BlurKind, Fill, Gradient, GradientStop, LineCap, LineJoin,
    SerializableColor, Shadow, Stroke, TransformStyle,
};
pub use text::{FontStyle, TextAlign, TextElement};

use kurbo::{BezPath, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Smallest radius a circle may have.
pub const MIN_CIRCLE_RADIUS: f64 = 10.0;

/// Smallest width or height any element may have.
pub const MIN_DIMENSION: f64 = 1.0;

fn default_opacity() -> f64 {
    1.0
}

fn default_visible() -> bool {
    true
}

/// Properties shared by every element kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementBase {
    pub(crate) id: ElementId,
    /// Left edge of the layout box (bounding-box left for circles).
    pub x: f64,
    /// Top edge of the layout box (bounding-box top for circles).
    pub y: f64,
    /// Clockwise rotation in degrees about the geometric center.
    #[serde(default)]
    pub rotation: f64,
    /// Paint order; higher paints later.
    #[serde(default)]
    pub z_index: i64,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub lock_aspect_ratio: bool,
    #[serde(default)]
    pub transform: TransformStyle,
    #[serde(default)]
    pub shadows: Vec<Shadow>,
    #[serde(default)]
    pub blur: Blur,
    #[serde(default)]
    pub blend_mode: BlendMode,
    #[serde(default)]
    pub name: Option<String>,
}

impl ElementBase {
    /// Create base properties with a fresh id at the given position.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            x,
            y,
            rotation: 0.0,
            z_index: 0,
            opacity: 1.0,
            visible: true,
            locked: false,
            lock_aspect_ratio: false,
            transform: TransformStyle::default(),
            shadows: Vec::new(),
            blur: Blur::default(),
            blend_mode: BlendMode::default(),
            name: None,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// First enabled shadow, if any.
    pub fn effective_shadow(&self) -> Option<&Shadow> {
        self.shadows.iter().find(|shadow| shadow.enabled)
    }
}

/// Discriminant of [`Element`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Rect,
    Circle,
    Text,
    Image,
    Path,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementKind::Rect => "rect",
            ElementKind::Circle => "circle",
            ElementKind::Text => "text",
            ElementKind::Image => "image",
            ElementKind::Path => "path",
        };
        f.write_str(name)
    }
}

/// Common behaviour of all element kinds.
pub trait ElementTrait {
    fn base(&self) -> &ElementBase;

    fn base_mut(&mut self) -> &mut ElementBase;

    fn kind(&self) -> ElementKind;

    /// Untransformed layout size.
    fn size(&self) -> Size;

    /// Offset from the stored x/y to the geometric center.
    fn center_offset(&self) -> Vec2 {
        let size = self.size();
        Vec2::new(size.width / 2.0, size.height / 2.0)
    }

    /// Offset from the geometric center to the origin of the local drawing space.
    ///
    /// Corner-anchored kinds draw from their top-left, so this equals the center
    /// offset. Center-anchored kinds draw around the center and return zero.
    fn local_offset(&self) -> Vec2 {
        self.center_offset()
    }

    /// Outline in local drawing space.
    fn local_path(&self) -> BezPath;

    fn fill(&self) -> Option<&Fill>;

    fn stroke(&self) -> Option<&Stroke>;
}

/// A canvas element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Element {
    Rect(RectElement),
    Circle(CircleElement),
    Text(TextElement),
    Image(ImageElement),
    Path(PathElement),
}

impl Element {
    fn as_trait(&self) -> &dyn ElementTrait {
        match self {
            Element::Rect(e) => e,
            Element::Circle(e) => e,
            Element::Text(e) => e,
            Element::Image(e) => e,
            Element::Path(e) => e,
        }
    }

    fn as_trait_mut(&mut self) -> &mut dyn ElementTrait {
        match self {
            Element::Rect(e) => e,
            Element::Circle(e) => e,
            Element::Text(e) => e,
            Element::Image(e) => e,
            Element::Path(e) => e,
        }
    }

    pub fn id(&self) -> ElementId {
        self.base().id
    }

    pub fn base(&self) -> &ElementBase {
        self.as_trait().base()
    }

    pub fn base_mut(&mut self) -> &mut ElementBase {
        self.as_trait_mut().base_mut()
    }

    pub fn kind(&self) -> ElementKind {
        self.as_trait().kind()
    }

    pub fn size(&self) -> Size {
        self.as_trait().size()
    }

    pub fn z_index(&self) -> i64 {
        self.base().z_index
    }

    pub fn is_locked(&self) -> bool {
        self.base().locked
    }

    pub fn is_visible(&self) -> bool {
        self.base().visible
    }

    pub fn position(&self) -> Point {
        self.base().position()
    }

    /// Untransformed layout box in logical canvas units.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position(), self.size())
    }

    pub fn center_offset(&self) -> Vec2 {
        self.as_trait().center_offset()
    }

    pub fn local_offset(&self) -> Vec2 {
        self.as_trait().local_offset()
    }

    /// Geometric center in logical canvas units.
    pub fn center(&self) -> Point {
        self.position() + self.center_offset()
    }

    pub fn local_path(&self) -> BezPath {
        self.as_trait().local_path()
    }

    pub fn fill(&self) -> Option<&Fill> {
        self.as_trait().fill()
    }

    pub fn stroke(&self) -> Option<&Stroke> {
        self.as_trait().stroke()
    }

    pub fn effective_shadow(&self) -> Option<&Shadow> {
        self.base().effective_shadow()
    }

    pub fn set_position(&mut self, position: Point) {
        let base = self.base_mut();
        base.x = position.x;
        base.y = position.y;
    }

    pub fn translate(&mut self, delta: Vec2) {
        let position = self.position() + delta;
        self.set_position(position);
    }

    /// Builder-style z-index assignment.
    pub fn with_z_index(mut self, z_index: i64) -> Self {
        self.base_mut().z_index = z_index;
        self
    }

    /// Assign a fresh id (used when duplicating or pasting).
    pub(crate) fn regenerate_id(&mut self) {
        self.base_mut().id = Uuid::new_v4();
    }

    /// Check the geometry invariants for this element.
    pub fn validate(&self) -> PatchResult<()> {
        let base = self.base();
        let finite = [base.x, base.y, base.rotation, base.opacity]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(PatchError::InvalidGeometry(
                "position, rotation and opacity must be finite".into(),
            ));
        }
        let transform = &base.transform;
        let skew_ok = |deg: f64| deg.is_finite() && deg.abs() < 90.0;
        if !transform.scale_x.is_finite()
            || !transform.scale_y.is_finite()
            || !skew_ok(transform.skew_x)
            || !skew_ok(transform.skew_y)
        {
            return Err(PatchError::InvalidGeometry(
                "transform scale must be finite and skew within (-90, 90) degrees".into(),
            ));
        }

        // Minimums apply to the rendered size, after the transform's scale.
        let (sx, sy) = (transform.scale_x.abs(), transform.scale_y.abs());
        match self {
            Element::Circle(circle) => {
                let radius = circle.radius * sx.min(sy);
                if !radius.is_finite() || radius < MIN_CIRCLE_RADIUS {
                    return Err(PatchError::InvalidGeometry(format!(
                        "radius {radius} is below the minimum of {MIN_CIRCLE_RADIUS}"
                    )));
                }
            }
            _ => {
                let size = self.size();
                let (width, height) = (size.width * sx, size.height * sy);
                let valid = |v: f64| v.is_finite() && v >= MIN_DIMENSION;
                if !valid(width) || !valid(height) {
                    return Err(PatchError::InvalidGeometry(format!(
                        "size {width}x{height} is below the minimum of {MIN_DIMENSION}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Merge a patch into this element.
    ///
    /// The element is left untouched when the patch targets another kind or
    /// the merged result violates a geometry invariant.
    pub fn apply_patch(&mut self, patch: &ElementPatch) -> PatchResult<()> {
        if let Some(kind_patch) = &patch.kind {
            if kind_patch.kind() != self.kind() {
                return Err(PatchError::KindMismatch {
                    expected: self.kind(),
                    found: kind_patch.kind(),
                });
            }
        }

        let mut updated = self.clone();
        patch.common.apply(updated.base_mut());
        match (&mut updated, &patch.kind) {
            (Element::Rect(e), Some(KindPatch::Rect(p))) => p.apply(e),
            (Element::Circle(e), Some(KindPatch::Circle(p))) => p.apply(e),
            (Element::Text(e), Some(KindPatch::Text(p))) => p.apply(e),
            (Element::Image(e), Some(KindPatch::Image(p))) => p.apply(e),
            (Element::Path(e), Some(KindPatch::Path(p))) => p.apply(e),
            _ => {}
        }
        let base = updated.base_mut();
        base.opacity = base.opacity.clamp(0.0, 1.0);

        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

impl From<RectElement> for Element {
    fn from(element: RectElement) -> Self {
        Element::Rect(element)
    }
}

impl From<CircleElement> for Element {
    fn from(element: CircleElement) -> Self {
        Element::Circle(element)
    }
}

impl From<TextElement> for Element {
    fn from(element: TextElement) -> Self {
        Element::Text(element)
    }
}

impl From<ImageElement> for Element {
    fn from(element: ImageElement) -> Self {
        Element::Image(element)
    }
}

impl From<PathElement> for Element {
    fn from(element: PathElement) -> Self {
        Element::Path(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_center_from_bounding_box() {
        let circle: Element = CircleElement::new(Point::new(200.0, 200.0), 50.0).into();
        let center = circle.center();
        assert!((center.x - 250.0).abs() < f64::EPSILON);
        assert!((center.y - 250.0).abs() < f64::EPSILON);
        assert_eq!(circle.local_offset(), Vec2::ZERO);
    }

    #[test]
    fn test_rect_center_and_offset() {
        let rect: Element = RectElement::new(Point::new(10.0, 20.0), 100.0, 50.0).into();
        let center = rect.center();
        assert!((center.x - 60.0).abs() < f64::EPSILON);
        assert!((center.y - 45.0).abs() < f64::EPSILON);
        assert_eq!(rect.local_offset(), Vec2::new(50.0, 25.0));
    }

    #[test]
    fn test_effective_shadow_first_enabled() {
        let mut rect = RectElement::new(Point::ZERO, 10.0, 10.0);
        let mut disabled = Shadow::hard(SerializableColor::black(), 1.0, 1.0);
        disabled.enabled = false;
        rect.base.shadows = vec![
            disabled,
            Shadow::hard(SerializableColor::white(), 5.0, 5.0),
            Shadow::hard(SerializableColor::black(), 9.0, 9.0),
        ];
        let element: Element = rect.into();
        let shadow = element.effective_shadow().map(|s| s.offset_x);
        assert_eq!(shadow, Some(5.0));
    }

    #[test]
    fn test_patch_kind_mismatch_is_rejected() {
        let mut circle: Element = CircleElement::new(Point::ZERO, 40.0).into();
        let before = circle.clone();
        let patch = ElementPatch::rect(RectPatch {
            width: Some(500.0),
            ..Default::default()
        });
        let result = circle.apply_patch(&patch);
        assert!(matches!(
            result,
            Err(PatchError::KindMismatch {
                expected: ElementKind::Circle,
                found: ElementKind::Rect
            })
        ));
        assert_eq!(circle, before);
    }

    #[test]
    fn test_patch_rejects_small_radius() {
        let mut circle: Element = CircleElement::new(Point::ZERO, 40.0).into();
        let patch = ElementPatch::circle(CirclePatch {
            radius: Some(5.0),
            ..Default::default()
        });
        assert!(circle.apply_patch(&patch).is_err());
        assert_eq!(circle.size(), Size::new(80.0, 80.0));
    }

    #[test]
    fn test_kind_patches_apply_to_their_kind() {
        let mut rect: Element = RectElement::new(Point::ZERO, 10.0, 10.0).into();
        let patch = ElementPatch::rect(RectPatch {
            width: Some(40.0),
            ..Default::default()
        });
        assert!(rect.apply_patch(&patch).is_ok());
        assert_eq!(rect.size(), Size::new(40.0, 10.0));

        let mut circle: Element = CircleElement::new(Point::ZERO, 40.0).into();
        let patch = ElementPatch::circle(CirclePatch {
            radius: Some(25.0),
            ..Default::default()
        });
        assert!(circle.apply_patch(&patch).is_ok());
        assert_eq!(circle.size(), Size::new(50.0, 50.0));

        let mut text: Element = TextElement::new(Point::ZERO, "Hi").into();
        let patch = ElementPatch::text(TextPatch {
            text: Some("Hello".into()),
            ..Default::default()
        });
        assert!(text.apply_patch(&patch).is_ok());
        assert!(matches!(&text, Element::Text(t) if t.text == "Hello"));

        let mut image: Element = ImageElement::new(Point::ZERO, 10.0, 10.0, "a.png").into();
        let patch = ElementPatch::image(ImagePatch {
            src: Some("b.png".into()),
            ..Default::default()
        });
        assert!(image.apply_patch(&patch).is_ok());
        assert!(matches!(&image, Element::Image(i) if i.src == "b.png"));

        let mut path: Element = PathElement::from_points(
            &[Point::new(0.0, 0.0), Point::new(10.0, 5.0)],
            Stroke::new(SerializableColor::black(), 2.0),
        )
        .map(Element::from)
        .unwrap();
        let patch = ElementPatch::path(PathPatch {
            closed: Some(true),
            ..Default::default()
        });
        assert!(path.apply_patch(&patch).is_ok());
        assert!(matches!(&path, Element::Path(p) if p.closed));
    }

    #[test]
    fn test_common_patch_applies_to_any_kind() {
        let mut text: Element = TextElement::new(Point::ZERO, "Hi").into();
        let patch = ElementPatch::position(15.0, 25.0).with_rotation(30.0);
        assert!(text.apply_patch(&patch).is_ok());
        assert!((text.base().x - 15.0).abs() < f64::EPSILON);
        assert!((text.base().y - 25.0).abs() < f64::EPSILON);
        assert!((text.base().rotation - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_patch_clamps_opacity() {
        let mut rect: Element = RectElement::new(Point::ZERO, 10.0, 10.0).into();
        let patch = ElementPatch::common(CommonPatch {
            opacity: Some(3.0),
            ..Default::default()
        });
        assert!(rect.apply_patch(&patch).is_ok());
        assert!((rect.base().opacity - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_serde_roundtrip_keeps_kind() {
        let element: Element = PathElement::from_points(
            &[Point::new(0.0, 0.0), Point::new(10.0, 5.0)],
            Stroke::new(SerializableColor::black(), 2.0),
        )
        .map(Element::from)
        .expect("two points make a path");
        let json = serde_json::to_string(&element).expect("serialize");
        let back: Element = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.kind(), ElementKind::Path);
        assert_eq!(back.id(), element.id());
    }
}
