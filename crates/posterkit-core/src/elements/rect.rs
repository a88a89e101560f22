//! Rectangle element.

use super::{ElementBase, ElementKind, ElementTrait, Fill, Stroke};
use kurbo::{BezPath, Point, Rect, RoundedRect, RoundedRectRadii, Shape as KurboShape, Size};
use serde::{Deserialize, Serialize};

/// Per-corner radii.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CornerRadii {
    pub top_left: f64,
    pub top_right: f64,
    pub bottom_right: f64,
    pub bottom_left: f64,
}

/// A rectangle with optional rounded corners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectElement {
    pub base: ElementBase,
    pub width: f64,
    pub height: f64,
    pub fill: Fill,
    #[serde(default)]
    pub stroke: Stroke,
    /// Uniform corner radius (0 = sharp corners).
    #[serde(default)]
    pub corner_radius: f64,
    /// Independent radii; overrides `corner_radius` when set.
    #[serde(default)]
    pub corner_radii: Option<CornerRadii>,
}

impl RectElement {
    /// Create a new rectangle with its top-left corner at `position`.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            base: ElementBase::new(position.x, position.y),
            width,
            height,
            fill: Fill::default(),
            stroke: Stroke::default(),
            corner_radius: 0.0,
            corner_radii: None,
        }
    }

    pub fn with_fill(mut self, fill: Fill) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = stroke;
        self
    }

    pub fn with_corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = radius;
        self
    }

    fn radii(&self) -> RoundedRectRadii {
        match self.corner_radii {
            Some(r) => {
                RoundedRectRadii::new(r.top_left, r.top_right, r.bottom_right, r.bottom_left)
            }
            None => RoundedRectRadii::from_single_radius(self.corner_radius),
        }
    }
}

impl ElementTrait for RectElement {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Rect
    }

    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    fn local_path(&self) -> BezPath {
        let rect = Rect::new(0.0, 0.0, self.width, self.height);
        let radii = self.radii();
        let rounded = radii.top_left > 0.0
            || radii.top_right > 0.0
            || radii.bottom_right > 0.0
            || radii.bottom_left > 0.0;
        if rounded {
            RoundedRect::from_rect(rect, radii).to_path(0.1)
        } else {
            rect.to_path(0.1)
        }
    }

    fn fill(&self) -> Option<&Fill> {
        Some(&self.fill)
    }

    fn stroke(&self) -> Option<&Stroke> {
        Some(&self.stroke)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_creation() {
        let rect = RectElement::new(Point::new(10.0, 20.0), 100.0, 50.0);
        assert!((rect.base.x - 10.0).abs() < f64::EPSILON);
        assert!((rect.base.y - 20.0).abs() < f64::EPSILON);
        assert!((rect.width - 100.0).abs() < f64::EPSILON);
        assert!((rect.height - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_local_path_is_corner_anchored() {
        let rect = RectElement::new(Point::new(300.0, 300.0), 100.0, 50.0);
        let bbox = rect.local_path().bounding_box();
        assert!((bbox.x0 - 0.0).abs() < 1e-9);
        assert!((bbox.y0 - 0.0).abs() < 1e-9);
        assert!((bbox.x1 - 100.0).abs() < 1e-9);
        assert!((bbox.y1 - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_independent_radii_override() {
        let mut rect = RectElement::new(Point::ZERO, 100.0, 100.0).with_corner_radius(8.0);
        rect.corner_radii = Some(CornerRadii {
            top_left: 20.0,
            ..Default::default()
        });
        let radii = rect.radii();
        assert!((radii.top_left - 20.0).abs() < f64::EPSILON);
        assert!((radii.top_right - 0.0).abs() < f64::EPSILON);
    }
}
