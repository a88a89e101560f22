//! Tool modes and the freehand brush.

use crate::elements::{BlendMode, LineCap, LineJoin, PathElement, SerializableColor, Stroke};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Select,
    Brush,
    Eraser,
}

/// Settings applied to new brush strokes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushSettings {
    pub color: SerializableColor,
    /// Stroke width in logical units.
    pub size: f64,
    pub opacity: f64,
    /// Multiplied into opacity.
    pub flow: f64,
    /// Curve tension for the resulting path.
    pub smoothing: f64,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub blend_mode: BlendMode,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            color: SerializableColor::black(),
            size: 8.0,
            opacity: 1.0,
            flow: 1.0,
            smoothing: 0.5,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            blend_mode: BlendMode::Normal,
        }
    }
}

impl BrushSettings {
    fn stroke(&self) -> Stroke {
        Stroke {
            color: self.color,
            width: self.size,
            dash: None,
            line_cap: self.line_cap,
            line_join: self.line_join,
        }
    }

    /// Turn absolute stroke points into a path element.
    pub fn build_path(&self, points: &[Point]) -> Option<PathElement> {
        let mut path =
            PathElement::from_points(points, self.stroke())?.with_tension(self.smoothing);
        path.base.opacity = (self.opacity * self.flow).clamp(0.0, 1.0);
        path.base.blend_mode = self.blend_mode;
        Some(path)
    }
}

/// State of a tool interaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ToolState {
    #[default]
    Idle,
    /// A brush stroke is being drawn.
    Drawing { points: Vec<Point> },
}

/// Manages the current tool and the in-progress brush stroke.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    pub current_tool: ToolKind,
    pub state: ToolState,
    pub brush: BrushSettings,
}

impl ToolManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch tools, dropping any stroke in progress.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if self.current_tool != tool {
            log::debug!("Tool changed: {:?} -> {:?}", self.current_tool, tool);
        }
        self.current_tool = tool;
        self.state = ToolState::Idle;
    }

    /// Start a stroke. Only the brush draws.
    pub fn begin(&mut self, point: Point) -> bool {
        if self.current_tool != ToolKind::Brush {
            return false;
        }
        self.state = ToolState::Drawing {
            points: vec![point],
        };
        true
    }

    pub fn update(&mut self, point: Point) {
        if let ToolState::Drawing { points } = &mut self.state {
            points.push(point);
        }
    }

    /// Finish the stroke and build its path, if it has at least two points.
    pub fn end(&mut self) -> Option<PathElement> {
        let ToolState::Drawing { points } = std::mem::take(&mut self.state) else {
            return None;
        };
        let path = self.brush.build_path(&points);
        if path.is_none() {
            log::debug!("Discarding brush stroke with {} point(s)", points.len());
        }
        path
    }

    pub fn cancel(&mut self) {
        self.state = ToolState::Idle;
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, ToolState::Drawing { .. })
    }

    /// Points of the stroke in progress, for previewing.
    pub fn stroke_points(&self) -> &[Point] {
        match &self.state {
            ToolState::Drawing { points } => points,
            ToolState::Idle => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brush_stroke_builds_path() {
        let mut tools = ToolManager::new();
        tools.set_tool(ToolKind::Brush);
        tools.brush.opacity = 0.8;
        tools.brush.flow = 0.5;

        assert!(tools.begin(Point::new(100.0, 200.0)));
        tools.update(Point::new(150.0, 180.0));
        tools.update(Point::new(130.0, 260.0));
        assert_eq!(tools.stroke_points().len(), 3);

        let path = tools.end().unwrap();
        assert!((path.base.x - 100.0).abs() < f64::EPSILON);
        assert!((path.base.y - 180.0).abs() < f64::EPSILON);
        assert!((path.width - 50.0).abs() < f64::EPSILON);
        assert!((path.height - 80.0).abs() < f64::EPSILON);
        assert_eq!(path.points[0], Point::new(0.0, 20.0));
        assert!((path.base.opacity - 0.4).abs() < 1e-12);
        assert!((path.tension - 0.5).abs() < f64::EPSILON);
        assert!((path.stroke.width - 8.0).abs() < f64::EPSILON);
        assert_eq!(path.stroke.line_cap, LineCap::Round);
        assert!(!tools.is_active());
    }

    #[test]
    fn test_single_point_discarded() {
        let mut tools = ToolManager::new();
        tools.set_tool(ToolKind::Brush);
        tools.begin(Point::new(5.0, 5.0));
        assert!(tools.end().is_none());
    }

    #[test]
    fn test_straight_stroke_has_min_box() {
        let settings = BrushSettings::default();
        let path = settings
            .build_path(&[Point::new(0.0, 10.0), Point::new(40.0, 10.0)])
            .unwrap();
        assert!((path.height - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_select_tool_does_not_draw() {
        let mut tools = ToolManager::new();
        assert!(!tools.begin(Point::ZERO));
        tools.update(Point::new(10.0, 10.0));
        assert!(tools.end().is_none());
    }

    #[test]
    fn test_switching_tool_cancels_stroke() {
        let mut tools = ToolManager::new();
        tools.set_tool(ToolKind::Brush);
        tools.begin(Point::ZERO);
        tools.set_tool(ToolKind::Eraser);
        assert!(!tools.is_active());
    }
}
