//! Text block element.

use super::{ElementBase, ElementKind, ElementTrait, Fill, Stroke};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Size};
use serde::{Deserialize, Serialize};

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

/// A text block laid out inside a fixed box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextElement {
    pub base: ElementBase,
    pub width: f64,
    pub height: f64,
    pub text: String,
    pub font_size: f64,
    pub font_family: String,
    /// CSS-style weight ("400", "bold", "900").
    pub font_weight: String,
    #[serde(default)]
    pub font_style: FontStyle,
    #[serde(default)]
    pub align: TextAlign,
    /// Line height as a multiple of the font size.
    pub line_height: f64,
    #[serde(default)]
    pub letter_spacing: f64,
    pub fill: Fill,
    #[serde(default)]
    pub stroke: Option<Stroke>,
}

impl TextElement {
    pub const DEFAULT_FONT_SIZE: f64 = 32.0;
    pub const DEFAULT_FONT_FAMILY: &'static str = "sans-serif";

    /// Create a text block at `position` with default typography.
    pub fn new(position: Point, text: impl Into<String>) -> Self {
        Self {
            base: ElementBase::new(position.x, position.y),
            width: 500.0,
            height: 100.0,
            text: text.into(),
            font_size: Self::DEFAULT_FONT_SIZE,
            font_family: Self::DEFAULT_FONT_FAMILY.to_string(),
            font_weight: "400".to_string(),
            font_style: FontStyle::default(),
            align: TextAlign::default(),
            line_height: 1.2,
            letter_spacing: 0.0,
            fill: Fill::default(),
            stroke: None,
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_font(
        mut self,
        family: impl Into<String>,
        size: f64,
        weight: impl Into<String>,
    ) -> Self {
        self.font_family = family.into();
        self.font_size = size;
        self.font_weight = weight.into();
        self
    }

    pub fn with_fill(mut self, fill: Fill) -> Self {
        self.fill = fill;
        self
    }

    /// Distance between consecutive baselines.
    pub fn line_advance(&self) -> f64 {
        self.font_size * self.line_height
    }
}

impl ElementTrait for TextElement {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Text
    }

    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    fn local_path(&self) -> BezPath {
        // Glyph outlines belong to the text layout engine; the box stands in.
        Rect::new(0.0, 0.0, self.width, self.height).to_path(0.1)
    }

    fn fill(&self) -> Option<&Fill> {
        Some(&self.fill)
    }

    fn stroke(&self) -> Option<&Stroke> {
        self.stroke.as_ref()
    }
}
