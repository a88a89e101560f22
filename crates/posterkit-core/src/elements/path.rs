//! Freehand path element.

use super::{ElementBase, ElementKind, ElementTrait, Fill, Stroke};
use kurbo::{BezPath, Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// A polyline or smoothed curve. Points are relative to the element's top-left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathElement {
    pub base: ElementBase,
    pub width: f64,
    pub height: f64,
    pub points: Vec<Point>,
    pub stroke: Stroke,
    /// Curve smoothing; 0 draws straight segments.
    #[serde(default)]
    pub tension: f64,
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub fill: Option<Fill>,
}

impl PathElement {
    /// Build a path from absolute points.
    ///
    /// The layout box is the points' bounding box, with each side at least 1
    /// unit, and the stored points become relative to its top-left corner.
    /// Returns `None` for fewer than two points.
    pub fn from_points(points: &[Point], stroke: Stroke) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        let bounds = points
            .iter()
            .skip(1)
            .fold(Rect::from_points(points[0], points[0]), |acc, p| {
                acc.union_pt(*p)
            });
        let origin = bounds.origin();
        Some(Self {
            base: ElementBase::new(origin.x, origin.y),
            width: bounds.width().max(1.0),
            height: bounds.height().max(1.0),
            points: points.iter().map(|p| (*p - origin).to_point()).collect(),
            stroke,
            tension: 0.0,
            closed: false,
            fill: None,
        })
    }

    pub fn with_tension(mut self, tension: f64) -> Self {
        self.tension = tension;
        self
    }

    /// Scale the stored points along with the layout box.
    pub fn scale_points(&mut self, sx: f64, sy: f64) {
        for point in &mut self.points {
            point.x *= sx;
            point.y *= sy;
        }
    }

    /// Control points before and after `points[i]` for the smoothed curve.
    fn control_points(&self, i: usize) -> (Point, Point) {
        let p0 = self.points[i - 1];
        let p1 = self.points[i];
        let p2 = self.points[i + 1];
        let d01 = (p1 - p0).hypot();
        let d12 = (p2 - p1).hypot();
        let total = d01 + d12;
        if total < f64::EPSILON {
            return (p1, p1);
        }
        let fa = self.tension * d01 / total;
        let fb = self.tension * d12 / total;
        let span = p2 - p0;
        (p1 - span * fa, p1 + span * fb)
    }
}

impl ElementTrait for PathElement {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Path
    }

    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    fn local_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let Some(first) = self.points.first() else {
            return path;
        };
        path.move_to(*first);

        let n = self.points.len();
        if self.tension.abs() < f64::EPSILON || n < 3 {
            for point in &self.points[1..] {
                path.line_to(*point);
            }
        } else {
            let controls: Vec<(Point, Point)> =
                (1..n - 1).map(|i| self.control_points(i)).collect();
            path.quad_to(controls[0].0, self.points[1]);
            for i in 1..n - 2 {
                path.curve_to(controls[i - 1].1, controls[i].0, self.points[i + 1]);
            }
            path.quad_to(controls[n - 3].1, self.points[n - 1]);
        }

        if self.closed {
            path.close_path();
        }
        path
    }

    fn fill(&self) -> Option<&Fill> {
        self.fill.as_ref()
    }

    fn stroke(&self) -> Option<&Stroke> {
        Some(&self.stroke)
    }
}
