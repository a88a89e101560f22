//! Geometry engine: marquee hit testing, transform composition and resize commit.

use crate::elements::{
    CirclePatch, Element, ElementId, ElementPatch, ImagePatch, PathPatch, RectPatch, TextPatch,
};
use kurbo::{Affine, Point, Rect, Shape as KurboShape, Vec2};
use thiserror::Error;

/// Smallest width or height an interactive resize may produce.
pub const MIN_RESIZE_DIMENSION: f64 = 20.0;

/// Why a resize was rejected.
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("Resize to {width}x{height} is below the minimum of {min}")]
    BelowMinimum { width: f64, height: f64, min: f64 },
    #[error("Scale factor ({0}, {1}) is not usable")]
    DegenerateScale(f64, f64),
}

/// Result type for geometry operations.
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Normalize a rectangle given by origin and possibly negative extent.
pub fn normalize_rect(origin: Point, extent: Vec2) -> Rect {
    Rect::from_origin_size(origin, (extent.x, extent.y)).abs()
}

/// Closest point on `rect` to `point`.
fn closest_point(rect: Rect, point: Point) -> Point {
    Point::new(
        point.x.clamp(rect.x0, rect.x1),
        point.y.clamp(rect.y0, rect.y1),
    )
}

/// Whether an element overlaps a marquee rectangle.
///
/// Circles use an exact circle/box test. Every other kind compares its own
/// untransformed layout box; rotation and skew are ignored.
pub fn intersects_marquee(element: &Element, marquee: Rect) -> bool {
    let marquee = marquee.abs();
    match element {
        Element::Circle(circle) => {
            let center = circle.center();
            let nearest = closest_point(marquee, center);
            (center - nearest).hypot2() <= circle.radius * circle.radius
        }
        Element::Rect(_) | Element::Text(_) | Element::Image(_) | Element::Path(_) => {
            let bounds = element.bounds();
            !(bounds.x1 < marquee.x0
                || bounds.x0 > marquee.x1
                || bounds.y1 < marquee.y0
                || bounds.y0 > marquee.y1)
        }
    }
}

/// Ids of the visible elements overlapping the marquee, in collection order.
pub fn elements_in_marquee(elements: &[Element], marquee: Rect) -> Vec<ElementId> {
    elements
        .iter()
        .filter(|e| e.is_visible() && intersects_marquee(e, marquee))
        .map(Element::id)
        .collect()
}

/// Shear matrix for skew angles given in degrees.
fn skew(skew_x_deg: f64, skew_y_deg: f64) -> Affine {
    let kx = skew_x_deg.to_radians().tan();
    let ky = skew_y_deg.to_radians().tan();
    Affine::new([1.0, ky, kx, 1.0, 0.0, 0.0])
}

/// Map from an element's local drawing space to logical canvas units.
///
/// Local points are first shifted by the local offset (so the unrotated visual
/// center lands on the origin), then scaled with flips as negative factors,
/// skewed, rotated clockwise, and finally placed at the geometric center.
pub fn element_transform(element: &Element) -> Affine {
    let base = element.base();
    let (sx, sy) = base.transform.signed_scale();
    Affine::translate(element.center().to_vec2())
        * Affine::rotate(base.rotation.to_radians())
        * skew(base.transform.skew_x, base.transform.skew_y)
        * Affine::scale_non_uniform(sx, sy)
        * Affine::translate(-element.local_offset())
}

/// Whether a logical point falls on an element, honoring its full transform.
pub fn hit_test(element: &Element, point: Point, tolerance: f64) -> bool {
    let transform = element_transform(element);
    if transform.determinant().abs() < f64::EPSILON {
        return false;
    }
    let local = transform.inverse() * point;
    match element {
        Element::Circle(circle) => local.to_vec2().hypot() <= circle.radius + tolerance,
        Element::Rect(_) | Element::Text(_) | Element::Image(_) => {
            let size = element.size();
            Rect::new(0.0, 0.0, size.width, size.height)
                .inflate(tolerance, tolerance)
                .contains(local)
        }
        Element::Path(path) => {
            if path.fill.is_some()
                && path.closed
                && path.points.len() > 2
                && element.local_path().contains(local)
            {
                return true;
            }
            let reach = path.stroke.width / 2.0 + tolerance;
            point_to_polyline_dist(local, &path.points) <= reach
        }
    }
}

/// Topmost visible element at a logical point. `paint_order` runs back to front.
pub fn topmost_at(paint_order: &[&Element], point: Point, tolerance: f64) -> Option<ElementId> {
    paint_order
        .iter()
        .rev()
        .find(|e| e.is_visible() && hit_test(e, point, tolerance))
        .map(|e| e.id())
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    (point - (a + seg * t)).hypot()
}

/// Minimum distance from a point to a polyline.
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    match points {
        [] => f64::INFINITY,
        [single] => (point - *single).hypot(),
        _ => points
            .windows(2)
            .map(|w| point_to_segment_dist(point, w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

/// State of the interactive transform node wrapping an element on the stage.
///
/// The node sits at the element's geometric center; its scale accumulates
/// while a resize handle is dragged and is absorbed into the element on commit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformNode {
    pub position: Point,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Clockwise degrees.
    pub rotation: f64,
}

impl TransformNode {
    /// Node at rest over an element.
    pub fn for_element(element: &Element) -> Self {
        Self {
            position: element.center(),
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: element.base().rotation,
        }
    }

    pub fn reset_scale(&mut self) {
        self.scale_x = 1.0;
        self.scale_y = 1.0;
    }
}

/// Bounding-box filter applied while a resize handle moves: a proposed box
/// smaller than `min` in either direction is refused and the old box kept.
pub fn bound_box(old: Rect, proposed: Rect, min: f64) -> Rect {
    if proposed.width().abs() < min || proposed.height().abs() < min {
        old
    } else {
        proposed
    }
}

/// Fold the node's accumulated scale into the element's stored size.
///
/// The new stored position keeps the node position as the geometric center,
/// and the node rotation is persisted.
pub fn commit_resize(
    element: &Element,
    node: &TransformNode,
    min: f64,
) -> GeometryResult<ElementPatch> {
    let (sx, sy) = (node.scale_x.abs(), node.scale_y.abs());
    let usable = |s: f64| s.is_finite() && s > 0.0;
    if !usable(sx) || !usable(sy) {
        return Err(GeometryError::DegenerateScale(node.scale_x, node.scale_y));
    }

    let check = |width: f64, height: f64| {
        if width < min || height < min {
            Err(GeometryError::BelowMinimum { width, height, min })
        } else {
            Ok(())
        }
    };

    let size = element.size();
    let (width, height) = (size.width * sx, size.height * sy);
    let patch = match element {
        Element::Circle(circle) => {
            let radius = circle.radius * sx;
            check(radius * 2.0, radius * 2.0)?;
            return Ok(ElementPatch::circle(CirclePatch {
                radius: Some(radius),
                ..Default::default()
            })
            .with_position(node.position.x - radius, node.position.y - radius)
            .with_rotation(node.rotation));
        }
        Element::Rect(_) => ElementPatch::rect(RectPatch {
            width: Some(width),
            height: Some(height),
            ..Default::default()
        }),
        Element::Text(_) => ElementPatch::text(TextPatch {
            width: Some(width),
            height: Some(height),
            ..Default::default()
        }),
        Element::Image(_) => ElementPatch::image(ImagePatch {
            width: Some(width),
            height: Some(height),
            ..Default::default()
        }),
        Element::Path(path) => {
            let mut scaled = path.clone();
            scaled.scale_points(sx, sy);
            ElementPatch::path(PathPatch {
                width: Some(width),
                height: Some(height),
                points: Some(scaled.points),
                ..Default::default()
            })
        }
    };
    check(width, height)?;
    let patch = patch.with_position(node.position.x - width / 2.0, node.position.y - height / 2.0);
    Ok(patch.with_rotation(node.rotation))
}
