//! Circle element.

use super::{ElementBase, ElementKind, ElementTrait, Fill, Stroke};
use kurbo::{BezPath, Circle, Point, Shape as KurboShape, Size, Vec2};
use serde::{Deserialize, Serialize};

/// A circle. `base.x`/`base.y` is the top-left of its bounding box; the center
/// sits at `(x + radius, y + radius)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleElement {
    pub base: ElementBase,
    pub radius: f64,
    pub fill: Fill,
    #[serde(default)]
    pub stroke: Stroke,
}

impl CircleElement {
    /// Create a circle whose bounding box starts at `top_left`.
    pub fn new(top_left: Point, radius: f64) -> Self {
        Self {
            base: ElementBase::new(top_left.x, top_left.y),
            radius,
            fill: Fill::default(),
            stroke: Stroke::default(),
        }
    }

    /// Create a circle around a center point.
    pub fn centered(center: Point, radius: f64) -> Self {
        Self::new(Point::new(center.x - radius, center.y - radius), radius)
    }

    pub fn with_fill(mut self, fill: Fill) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = stroke;
        self
    }

    pub fn center(&self) -> Point {
        Point::new(self.base.x + self.radius, self.base.y + self.radius)
    }
}

impl ElementTrait for CircleElement {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Circle
    }

    fn size(&self) -> Size {
        Size::new(self.radius * 2.0, self.radius * 2.0)
    }

    fn center_offset(&self) -> Vec2 {
        Vec2::new(self.radius, self.radius)
    }

    fn local_offset(&self) -> Vec2 {
        Vec2::ZERO
    }

    fn local_path(&self) -> BezPath {
        Circle::new(Point::ZERO, self.radius).to_path(0.1)
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
    fn test_centered_constructor() {
        let circle = CircleElement::centered(Point::new(100.0, 100.0), 60.0);
        assert!((circle.base.x - 40.0).abs() < f64::EPSILON);
        assert!((circle.base.y - 40.0).abs() < f64::EPSILON);
        assert_eq!(circle.center(), Point::new(100.0, 100.0));
    }

    #[test]
    fn test_size_is_diameter() {
        let circle = CircleElement::new(Point::ZERO, 25.0);
        assert_eq!(circle.size(), Size::new(50.0, 50.0));
    }

    #[test]
    fn test_local_path_centered_on_origin() {
        let circle = CircleElement::new(Point::new(500.0, 500.0), 30.0);
        let bbox = circle.local_path().bounding_box();
        assert!((bbox.center().x).abs() < 1e-6);
        assert!((bbox.center().y).abs() < 1e-6);
        assert!((bbox.width() - 60.0).abs() < 1e-6);
    }
}
