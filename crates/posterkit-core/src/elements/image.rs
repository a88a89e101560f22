//! Raster image element.

use super::{ElementBase, ElementKind, ElementTrait, Fill, Stroke};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Size};
use serde::{Deserialize, Serialize};

/// Source crop window in bitmap pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Crop {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// An image placed on the canvas. `src` is a URL or data URL resolved
/// asynchronously by the resource cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageElement {
    pub base: ElementBase,
    pub width: f64,
    pub height: f64,
    pub src: String,
    #[serde(default)]
    pub crop: Option<Crop>,
}

impl ImageElement {
    pub fn new(position: Point, width: f64, height: f64, src: impl Into<String>) -> Self {
        Self {
            base: ElementBase::new(position.x, position.y),
            width,
            height,
            src: src.into(),
            crop: None,
        }
    }

    /// Whether there is anything to load.
    pub fn has_source(&self) -> bool {
        !self.src.trim().is_empty()
    }

    /// Scale to fit within a box while preserving the given source aspect ratio.
    pub fn fit_within(mut self, source: Size, max_width: f64, max_height: f64) -> Self {
        if source.width <= 0.0 || source.height <= 0.0 {
            return self;
        }
        let aspect = source.width / source.height;
        if aspect > max_width / max_height {
            self.width = max_width;
            self.height = max_width / aspect;
        } else {
            self.height = max_height;
            self.width = max_height * aspect;
        }
        self
    }
}

impl ElementTrait for ImageElement {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Image
    }

    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    fn local_path(&self) -> BezPath {
        Rect::new(0.0, 0.0, self.width, self.height).to_path(0.1)
    }

    fn fill(&self) -> Option<&Fill> {
        None
    }

    fn stroke(&self) -> Option<&Stroke> {
        None
    }
}
