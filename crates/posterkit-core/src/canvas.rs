//! Canvas settings: logical size, background and guide overlays.

use crate::elements::{Fill, SerializableColor};
use kurbo::{Line, Point, Rect, Size};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CANVAS_WIDTH: f64 = 1080.0;
pub const DEFAULT_CANVAS_HEIGHT: f64 = 1920.0;
pub const DEFAULT_CANVAS_NAME: &str = "neo-card";

/// Document-level properties of the poster being edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    pub width: f64,
    pub height: f64,
    /// Solid color or gradient painted behind every element.
    pub background: Fill,
    pub corner_radius: f64,
    pub show_grid: bool,
    pub grid_size: f64,
    pub show_safe_area: bool,
    pub safe_area_padding: f64,
    /// Used as the export filename stem.
    pub name: String,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
            background: Fill::Solid(SerializableColor::white()),
            corner_radius: 0.0,
            show_grid: false,
            grid_size: 50.0,
            show_safe_area: false,
            safe_area_padding: 50.0,
            name: DEFAULT_CANVAS_NAME.to_string(),
        }
    }
}

impl CanvasSettings {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Resize the canvas. Non-positive or non-finite sizes are ignored.
    pub fn set_dimensions(&mut self, width: f64, height: f64) -> bool {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            log::warn!("Ignoring invalid canvas size {width}x{height}");
            return false;
        }
        self.width = width;
        self.height = height;
        true
    }

    pub fn apply_dimension_preset(&mut self, preset: &DimensionPreset) {
        self.set_dimensions(preset.width, preset.height);
    }

    /// Inner rectangle inset by the safe-area padding, if visible.
    pub fn safe_area_rect(&self) -> Option<Rect> {
        if !self.show_safe_area {
            return None;
        }
        let inset = self
            .safe_area_padding
            .clamp(0.0, self.width.min(self.height) / 2.0);
        Some(self.rect().inset(-inset))
    }

    /// Grid overlay lines, excluding the canvas edges.
    pub fn grid_lines(&self) -> Vec<Line> {
        if !self.show_grid || self.grid_size <= 0.0 {
            return Vec::new();
        }
        let mut lines = Vec::new();
        let mut x = self.grid_size;
        while x < self.width {
            lines.push(Line::new(Point::new(x, 0.0), Point::new(x, self.height)));
            x += self.grid_size;
        }
        let mut y = self.grid_size;
        while y < self.height {
            lines.push(Line::new(Point::new(0.0, y), Point::new(self.width, y)));
            y += self.grid_size;
        }
        lines
    }

    /// The dimension preset matching the current size, if any.
    pub fn matching_preset(&self) -> Option<&'static DimensionPreset> {
        DIMENSION_PRESETS
            .iter()
            .find(|p| p.width == self.width && p.height == self.height)
    }
}

/// A named canvas size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub width: f64,
    pub height: f64,
}

pub const DIMENSION_PRESETS: &[DimensionPreset] = &[
    DimensionPreset {
        id: "poster-vertical",
        name: "Vertical poster",
        width: 1080.0,
        height: 1920.0,
    },
    DimensionPreset {
        id: "portrait-3-4",
        name: "Portrait 3:4",
        width: 1080.0,
        height: 1440.0,
    },
    DimensionPreset {
        id: "portrait-small",
        name: "Portrait small",
        width: 900.0,
        height: 1200.0,
    },
    DimensionPreset {
        id: "square",
        name: "Square",
        width: 1080.0,
        height: 1080.0,
    },
];

pub fn find_dimension_preset(id: &str) -> Option<&'static DimensionPreset> {
    DIMENSION_PRESETS.iter().find(|p| p.id == id)
}

/// Reduced aspect ratio such as `"9:16"`.
pub fn aspect_ratio(width: u32, height: u32) -> String {
    fn gcd(a: u32, b: u32) -> u32 {
        if b == 0 { a } else { gcd(b, a % b) }
    }
    let divisor = gcd(width, height).max(1);
    format!("{}:{}", width / divisor, height / divisor)
}
