//! Typed partial updates.
//!
//! A patch carries optional common fields plus at most one kind-specific part.
//! Kind-specific fields only exist on the patch type of their own kind, so a
//! patch can never introduce a field that does not belong to the element.

use super::{
    Blur, BlendMode, CircleElement, CornerRadii, Crop, ElementBase, ElementKind, Fill,
    FontStyle, ImageElement, PathElement, RectElement, Shadow, Stroke, TextAlign, TextElement,
    TransformStyle,
};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a patch was not applied.
#[derive(Debug, Error, PartialEq)]
pub enum PatchError {
    #[error("Patch for {found} element applied to {expected} element")]
    KindMismatch {
        expected: ElementKind,
        found: ElementKind,
    },
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
}

/// Result type for patch operations.
pub type PatchResult<T> = Result<T, PatchError>;

/// Fields every element kind has.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommonPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub rotation: Option<f64>,
    pub z_index: Option<i64>,
    pub opacity: Option<f64>,
    pub visible: Option<bool>,
    pub locked: Option<bool>,
    pub lock_aspect_ratio: Option<bool>,
    pub transform: Option<TransformStyle>,
    pub shadows: Option<Vec<Shadow>>,
    pub blur: Option<Blur>,
    pub blend_mode: Option<BlendMode>,
    pub name: Option<Option<String>>,
}

fn merge<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *target = value.clone();
    }
}

impl CommonPatch {
    pub(crate) fn apply(&self, base: &mut ElementBase) {
        merge(&mut base.x, &self.x);
        merge(&mut base.y, &self.y);
        merge(&mut base.rotation, &self.rotation);
        merge(&mut base.z_index, &self.z_index);
        merge(&mut base.opacity, &self.opacity);
        merge(&mut base.visible, &self.visible);
        merge(&mut base.locked, &self.locked);
        merge(&mut base.lock_aspect_ratio, &self.lock_aspect_ratio);
        merge(&mut base.transform, &self.transform);
        merge(&mut base.shadows, &self.shadows);
        merge(&mut base.blur, &self.blur);
        merge(&mut base.blend_mode, &self.blend_mode);
        merge(&mut base.name, &self.name);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RectPatch {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub fill: Option<Fill>,
    pub stroke: Option<Stroke>,
    pub corner_radius: Option<f64>,
    pub corner_radii: Option<Option<CornerRadii>>,
}

impl RectPatch {
    pub(super) fn apply(&self, element: &mut RectElement) {
        merge(&mut element.width, &self.width);
        merge(&mut element.height, &self.height);
        merge(&mut element.fill, &self.fill);
        merge(&mut element.stroke, &self.stroke);
        merge(&mut element.corner_radius, &self.corner_radius);
        merge(&mut element.corner_radii, &self.corner_radii);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CirclePatch {
    pub radius: Option<f64>,
    pub fill: Option<Fill>,
    pub stroke: Option<Stroke>,
}

impl CirclePatch {
    pub(super) fn apply(&self, element: &mut CircleElement) {
        merge(&mut element.radius, &self.radius);
        merge(&mut element.fill, &self.fill);
        merge(&mut element.stroke, &self.stroke);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextPatch {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub text: Option<String>,
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    pub font_weight: Option<String>,
    pub font_style: Option<FontStyle>,
    pub align: Option<TextAlign>,
    pub line_height: Option<f64>,
    pub letter_spacing: Option<f64>,
    pub fill: Option<Fill>,
    pub stroke: Option<Option<Stroke>>,
}

impl TextPatch {
    pub(super) fn apply(&self, element: &mut TextElement) {
        merge(&mut element.width, &self.width);
        merge(&mut element.height, &self.height);
        merge(&mut element.text, &self.text);
        merge(&mut element.font_size, &self.font_size);
        merge(&mut element.font_family, &self.font_family);
        merge(&mut element.font_weight, &self.font_weight);
        merge(&mut element.font_style, &self.font_style);
        merge(&mut element.align, &self.align);
        merge(&mut element.line_height, &self.line_height);
        merge(&mut element.letter_spacing, &self.letter_spacing);
        merge(&mut element.fill, &self.fill);
        merge(&mut element.stroke, &self.stroke);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImagePatch {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub src: Option<String>,
    pub crop: Option<Option<Crop>>,
}

impl ImagePatch {
    pub(super) fn apply(&self, element: &mut ImageElement) {
        merge(&mut element.width, &self.width);
        merge(&mut element.height, &self.height);
        merge(&mut element.src, &self.src);
        merge(&mut element.crop, &self.crop);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathPatch {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub points: Option<Vec<Point>>,
    pub stroke: Option<Stroke>,
    pub tension: Option<f64>,
    pub closed: Option<bool>,
    pub fill: Option<Option<Fill>>,
}

impl PathPatch {
    pub(super) fn apply(&self, element: &mut PathElement) {
        merge(&mut element.width, &self.width);
        merge(&mut element.height, &self.height);
        merge(&mut element.points, &self.points);
        merge(&mut element.stroke, &self.stroke);
        merge(&mut element.tension, &self.tension);
        merge(&mut element.closed, &self.closed);
        merge(&mut element.fill, &self.fill);
    }
}

/// Kind-specific part of a patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum KindPatch {
    Rect(RectPatch),
    Circle(CirclePatch),
    Text(TextPatch),
    Image(ImagePatch),
    Path(PathPatch),
}

impl KindPatch {
    pub fn kind(&self) -> ElementKind {
        match self {
            KindPatch::Rect(_) => ElementKind::Rect,
            KindPatch::Circle(_) => ElementKind::Circle,
            KindPatch::Text(_) => ElementKind::Text,
            KindPatch::Image(_) => ElementKind::Image,
            KindPatch::Path(_) => ElementKind::Path,
        }
    }
}

/// Partial update for one element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementPatch {
    pub common: CommonPatch,
    pub kind: Option<KindPatch>,
}

impl ElementPatch {
    pub fn common(common: CommonPatch) -> Self {
        Self { common, kind: None }
    }

    /// Move to a new stored position.
    pub fn position(x: f64, y: f64) -> Self {
        Self::common(CommonPatch {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        })
    }

    pub fn rect(patch: RectPatch) -> Self {
        Self {
            common: CommonPatch::default(),
            kind: Some(KindPatch::Rect(patch)),
        }
    }

    pub fn circle(patch: CirclePatch) -> Self {
        Self {
            common: CommonPatch::default(),
            kind: Some(KindPatch::Circle(patch)),
        }
    }

    pub fn text(patch: TextPatch) -> Self {
        Self {
            common: CommonPatch::default(),
            kind: Some(KindPatch::Text(patch)),
        }
    }

    pub fn image(patch: ImagePatch) -> Self {
        Self {
            common: CommonPatch::default(),
            kind: Some(KindPatch::Image(patch)),
        }
    }

    pub fn path(patch: PathPatch) -> Self {
        Self {
            common: CommonPatch::default(),
            kind: Some(KindPatch::Path(patch)),
        }
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.common.x = Some(x);
        self.common.y = Some(y);
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.common.rotation = Some(rotation);
        self
    }

    pub fn with_z_index(mut self, z_index: i64) -> Self {
        self.common.z_index = Some(z_index);
        self
    }

    pub fn with_locked(mut self, locked: bool) -> Self {
        self.common.locked = Some(locked);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.common == CommonPatch::default() && self.kind.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Element, SerializableColor};

    #[test]
    fn test_rect_patch_merges_only_given_fields() {
        let mut element: Element = RectElement::new(Point::ZERO, 100.0, 50.0)
            .with_fill(Fill::hex("#FFE566"))
            .into();
        let patch = ElementPatch::rect(RectPatch {
            height: Some(80.0),
            ..Default::default()
        });
        assert!(element.apply_patch(&patch).is_ok());
        let Element::Rect(rect) = &element else {
            panic!("kind changed");
        };
        assert!((rect.width - 100.0).abs() < f64::EPSILON);
        assert!((rect.height - 80.0).abs() < f64::EPSILON);
        assert_eq!(rect.fill, Fill::hex("#FFE566"));
    }

    #[test]
    fn test_text_patch_never_touches_image() {
        let mut element: Element = ImageElement::new(Point::ZERO, 200.0, 200.0, "a.png").into();
        let before = element.clone();
        let patch = ElementPatch::text(TextPatch {
            text: Some("hello".into()),
            ..Default::default()
        })
        .with_position(99.0, 99.0);
        assert!(element.apply_patch(&patch).is_err());
        assert_eq!(element, before);
    }

    #[test]
    fn test_patch_can_clear_optional_field() {
        let mut text = TextElement::new(Point::ZERO, "x");
        text.stroke = Some(Stroke::new(SerializableColor::black(), 2.0));
        let mut element: Element = text.into();
        let patch = ElementPatch::text(TextPatch {
            stroke: Some(None),
            ..Default::default()
        });
        assert!(element.apply_patch(&patch).is_ok());
        assert!(element.stroke().is_none());
    }

    #[test]
    fn test_empty_patch() {
        assert!(ElementPatch::default().is_empty());
        assert!(!ElementPatch::position(1.0, 2.0).is_empty());
    }

    #[test]
    fn test_zero_width_rejected() {
        let mut element: Element = RectElement::new(Point::ZERO, 100.0, 50.0).into();
        let patch = ElementPatch::rect(RectPatch {
            width: Some(0.0),
            ..Default::default()
        });
        assert!(matches!(
            element.apply_patch(&patch),
            Err(PatchError::InvalidGeometry(_))
        ));
    }
}
