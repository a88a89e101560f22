//! Fill resolution: descriptor + element geometry → concrete paint parameters.
//!
//! Coordinates are in the element's local drawing space: corner-anchored kinds
//! span `(0, 0)..(w, h)`, circles are centered on the origin.

use crate::elements::{Element, Fill, Gradient, GradientStop, SerializableColor};
use kurbo::{Point, Vec2};
use peniko::{Brush, ColorStop, Extend};

/// Geometry a fill is resolved against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FillGeometry {
    /// Corner-anchored box.
    Box { width: f64, height: f64 },
    /// Center-anchored circle.
    Circle { radius: f64 },
}

impl FillGeometry {
    pub fn of(element: &Element) -> Self {
        match element {
            Element::Circle(circle) => FillGeometry::Circle {
                radius: circle.radius,
            },
            Element::Rect(_) | Element::Text(_) | Element::Image(_) | Element::Path(_) => {
                let size = element.size();
                FillGeometry::Box {
                    width: size.width,
                    height: size.height,
                }
            }
        }
    }
}

/// Paint parameters ready for a renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedFill {
    Solid(SerializableColor),
    Linear {
        start: Point,
        end: Point,
        stops: Vec<GradientStop>,
        repeat: bool,
    },
    Radial {
        center: Point,
        start_radius: f64,
        end_radius: f64,
        stops: Vec<GradientStop>,
        repeat: bool,
    },
}

/// Unit direction for a CSS gradient angle (0° points up, 90° points right).
pub fn gradient_direction(angle_deg: f64) -> Vec2 {
    let rad = (angle_deg - 90.0).to_radians();
    Vec2::new(rad.cos(), rad.sin())
}

fn linear(
    angle: f64,
    stops: Vec<GradientStop>,
    geometry: FillGeometry,
    repeat: bool,
) -> ResolvedFill {
    let direction = gradient_direction(angle);
    let (center, half_span) = match geometry {
        FillGeometry::Box { width, height } => (
            Point::new(width / 2.0, height / 2.0),
            (width * width + height * height).sqrt() / 2.0,
        ),
        FillGeometry::Circle { radius } => (Point::ZERO, radius),
    };
    ResolvedFill::Linear {
        start: center - direction * half_span,
        end: center + direction * half_span,
        stops,
        repeat,
    }
}

fn radial(stops: Vec<GradientStop>, geometry: FillGeometry, repeat: bool) -> ResolvedFill {
    let (center, end_radius) = match geometry {
        FillGeometry::Box { width, height } => {
            (Point::new(width / 2.0, height / 2.0), width.max(height) / 2.0)
        }
        FillGeometry::Circle { radius } => (Point::ZERO, radius),
    };
    ResolvedFill::Radial {
        center,
        start_radius: 0.0,
        end_radius,
        stops,
        repeat,
    }
}

/// Resolve a fill descriptor against element geometry.
///
/// Conic gradients have no primitive here and fall back to their first stop.
pub fn resolve_fill(fill: &Fill, geometry: FillGeometry) -> ResolvedFill {
    let Fill::Gradient(gradient) = fill else {
        return ResolvedFill::Solid(fill.fallback_color());
    };
    let stops = gradient.sorted_stops();
    match gradient {
        Gradient::Linear { angle, .. } => linear(*angle, stops, geometry, false),
        Gradient::RepeatingLinear { angle, .. } => linear(*angle, stops, geometry, true),
        Gradient::Radial { .. } => radial(stops, geometry, false),
        Gradient::RepeatingRadial { .. } => radial(stops, geometry, true),
        Gradient::Conic { .. } => ResolvedFill::Solid(fill.fallback_color()),
    }
}

/// Resolve an element's own fill, if it has one.
pub fn resolve_element_fill(element: &Element) -> Option<ResolvedFill> {
    element
        .fill()
        .map(|fill| resolve_fill(fill, FillGeometry::of(element)))
}

/// Peniko stops, rescaled to the repeat period when repeating.
fn period_stops(stops: &[GradientStop], repeat: bool) -> (f64, Vec<ColorStop>) {
    let last = stops.last().map_or(1.0, |s| s.offset);
    let period = if repeat && last > 0.0 && last < 1.0 { last } else { 1.0 };
    let color_stops = stops
        .iter()
        .map(|s| ColorStop::from(((s.offset / period) as f32, peniko::Color::from(s.color))))
        .collect();
    (period, color_stops)
}

impl ResolvedFill {
    /// Convert into a peniko brush in local drawing space.
    ///
    /// Repeating gradients repeat over `0..=last stop`, so the gradient extent
    /// is shortened to that span and the stops are stretched to fill it.
    pub fn to_brush(&self) -> Brush {
        let extend = |repeat: bool| if repeat { Extend::Repeat } else { Extend::Pad };
        match self {
            ResolvedFill::Solid(color) => Brush::Solid((*color).into()),
            ResolvedFill::Linear {
                start,
                end,
                stops,
                repeat,
            } => {
                let (period, stops) = period_stops(stops, *repeat);
                let end = *start + (*end - *start) * period;
                Brush::Gradient(
                    peniko::Gradient::new_linear(*start, end)
                        .with_stops(stops.as_slice())
                        .with_extend(extend(*repeat)),
                )
            }
            ResolvedFill::Radial {
                center,
                end_radius,
                stops,
                repeat,
                ..
            } => {
                let (period, stops) = period_stops(stops, *repeat);
                Brush::Gradient(
                    peniko::Gradient::new_radial(*center, (*end_radius * period) as f32)
                        .with_stops(stops.as_slice())
                        .with_extend(extend(*repeat)),
                )
            }
        }
    }

    /// Single representative color.
    pub fn fallback_color(&self) -> SerializableColor {
        match self {
            ResolvedFill::Solid(color) => *color,
            ResolvedFill::Linear { stops, .. } | ResolvedFill::Radial { stops, .. } => stops
                .first()
                .map(|s| s.color)
                .unwrap_or_else(SerializableColor::black),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(width: f64, height: f64) -> FillGeometry {
        FillGeometry::Box { width, height }
    }

    fn stops() -> Vec<GradientStop> {
        vec![
            GradientStop::new(1.0, SerializableColor::black()),
            GradientStop::new(0.0, SerializableColor::white()),
        ]
    }

    fn linear_fill(angle: f64) -> Fill {
        Fill::Gradient(Gradient::Linear {
            angle,
            stops: stops(),
        })
    }

    #[test]
    fn test_solid_passthrough() {
        let color = SerializableColor::new(1, 2, 3, 255);
        let resolved = resolve_fill(&Fill::Solid(color), boxed(10.0, 10.0));
        assert_eq!(resolved, ResolvedFill::Solid(color));
    }

    #[test]
    fn test_linear_spans_diagonal_at_any_angle() {
        let (w, h): (f64, f64) = (300.0, 200.0);
        let diagonal: f64 = (w * w + h * h).sqrt();
        for angle in [0.0, 17.0, 45.0, 90.0, 135.0, 180.0, 233.0, 359.0] {
            let resolved = resolve_fill(&linear_fill(angle), boxed(w, h));
            let ResolvedFill::Linear { start, end, .. } = resolved else {
                panic!("expected linear");
            };
            let mid = start.midpoint(end);
            assert!((mid.x - w / 2.0).abs() < 1e-9);
            assert!((mid.y - h / 2.0).abs() < 1e-9);
            assert!(((end - start).hypot() - diagonal).abs() < 1e-9);
        }
    }

    #[test]
    fn test_linear_angle_convention() {
        let resolved = resolve_fill(&linear_fill(90.0), boxed(100.0, 0.0));
        let ResolvedFill::Linear { start, end, .. } = resolved else {
            panic!("expected linear");
        };
        assert!((start.x - 0.0).abs() < 1e-9);
        assert!((end.x - 100.0).abs() < 1e-9);

        let up = gradient_direction(0.0);
        assert!(up.x.abs() < 1e-9);
        assert!((up.y + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_on_circle_is_center_anchored() {
        let resolved = resolve_fill(&linear_fill(180.0), FillGeometry::Circle { radius: 40.0 });
        let ResolvedFill::Linear { start, end, .. } = resolved else {
            panic!("expected linear");
        };
        assert!((start.y + 40.0).abs() < 1e-9);
        assert!((end.y - 40.0).abs() < 1e-9);
        assert!(start.x.abs() < 1e-9);
    }

    #[test]
    fn test_stops_sorted() {
        let resolved = resolve_fill(&linear_fill(0.0), boxed(1.0, 1.0));
        let ResolvedFill::Linear { stops, .. } = resolved else {
            panic!("expected linear");
        };
        assert!((stops[0].offset - 0.0).abs() < f64::EPSILON);
        assert_eq!(stops[0].color, SerializableColor::white());
    }

    #[test]
    fn test_radial_box_and_circle() {
        let fill = Fill::Gradient(Gradient::Radial { stops: stops() });
        let resolved = resolve_fill(&fill, boxed(300.0, 120.0));
        assert!(matches!(
            resolved,
            ResolvedFill::Radial { center, start_radius, end_radius, repeat: false, .. }
                if center == Point::new(150.0, 60.0) && start_radius == 0.0 && end_radius == 150.0
        ));

        let resolved = resolve_fill(&fill, FillGeometry::Circle { radius: 35.0 });
        assert!(matches!(
            resolved,
            ResolvedFill::Radial { center, end_radius, .. }
                if center == Point::ZERO && end_radius == 35.0
        ));
    }

    #[test]
    fn test_repeating_kinds_flagged() {
        let fill = Fill::Gradient(Gradient::RepeatingRadial { stops: stops() });
        let resolved = resolve_fill(&fill, FillGeometry::Circle { radius: 10.0 });
        assert!(matches!(resolved, ResolvedFill::Radial { repeat: true, .. }));

        let fill = Fill::Gradient(Gradient::RepeatingLinear {
            angle: 45.0,
            stops: stops(),
        });
        let resolved = resolve_fill(&fill, boxed(10.0, 10.0));
        assert!(matches!(resolved, ResolvedFill::Linear { repeat: true, .. }));
    }

    #[test]
    fn test_conic_falls_back_to_first_stop() {
        let fill = Fill::Gradient(Gradient::Conic {
            angle: 30.0,
            stops: stops(),
        });
        let resolved = resolve_fill(&fill, boxed(10.0, 10.0));
        // First stop as authored, not after sorting.
        assert_eq!(resolved, ResolvedFill::Solid(SerializableColor::black()));
    }

    #[test]
    fn test_to_brush_variants() {
        let solid = ResolvedFill::Solid(SerializableColor::white());
        assert!(matches!(solid.to_brush(), Brush::Solid(_)));
        let resolved = resolve_fill(&linear_fill(45.0), boxed(10.0, 10.0));
        assert!(matches!(resolved.to_brush(), Brush::Gradient(_)));
    }

    #[test]
    fn test_repeating_brush_spans_stop_range() {
        let resolved = ResolvedFill::Linear {
            start: Point::ZERO,
            end: Point::new(100.0, 0.0),
            stops: vec![
                GradientStop::new(0.0, SerializableColor::black()),
                GradientStop::new(0.25, SerializableColor::white()),
            ],
            repeat: true,
        };
        let Brush::Gradient(gradient) = resolved.to_brush() else {
            panic!("expected gradient");
        };
        assert_eq!(gradient.extend, Extend::Repeat);
        let peniko::GradientKind::Linear(line) = gradient.kind else {
            panic!("expected linear");
        };
        assert!((line.end.x - 25.0).abs() < 1e-9);
        assert!((gradient.stops[1].offset - 1.0).abs() < f32::EPSILON);
    }
}
