//! Fits the fixed logical canvas into a variable screen viewport.

use kurbo::{Affine, Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Smallest display scale.
pub const MIN_SCALE: f64 = 0.1;
/// Largest display scale.
pub const MAX_SCALE: f64 = 1.2;
/// Space kept around the canvas, in screen pixels.
pub const DEFAULT_PADDING: f64 = 80.0;

/// Display scale for the canvas.
///
/// Logical coordinates are the canvas' own units; screen coordinates are
/// pointer positions relative to the canvas' on-screen origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewport {
    /// Current display scale.
    pub scale: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Padding subtracted from the viewport before fitting.
    pub padding: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            padding: DEFAULT_PADDING,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scale limits. Limits that are not finite, not positive or inverted are ignored.
    pub fn with_limits(mut self, min_scale: f64, max_scale: f64) -> Self {
        let usable = |v: f64| v.is_finite() && v > 0.0;
        if usable(min_scale) && usable(max_scale) && min_scale <= max_scale {
            self.min_scale = min_scale;
            self.max_scale = max_scale;
        } else {
            log::warn!("Ignoring scale limits {min_scale}..{max_scale}");
        }
        self
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Recompute the scale so `canvas` fits inside `viewport`.
    ///
    /// Never upscales past 1 before clamping. A viewport with no usable
    /// space leaves the scale untouched. Returns the resulting scale.
    pub fn fit(&mut self, canvas: Size, viewport: Size) -> f64 {
        let available = Size::new(
            viewport.width - self.padding,
            viewport.height - self.padding,
        );
        if available.width <= 0.0
            || available.height <= 0.0
            || canvas.width <= 0.0
            || canvas.height <= 0.0
        {
            log::debug!("Viewport {viewport:?} too small to fit canvas, keeping scale");
            return self.scale;
        }

        let fitted = (available.width / canvas.width)
            .min(available.height / canvas.height)
            .min(1.0);
        self.scale = self.clamp_scale(fitted);
        self.scale
    }

    /// Set the scale directly, clamped to the limits.
    pub fn set_scale(&mut self, scale: f64) {
        if scale.is_finite() {
            self.scale = self.clamp_scale(scale);
        }
    }

    // `f64::clamp` panics on inverted or NaN limits; the fields are public.
    fn clamp_scale(&self, scale: f64) -> f64 {
        scale.max(self.min_scale).min(self.max_scale)
    }

    /// Logical to screen transform.
    pub fn transform(&self) -> Affine {
        Affine::scale(self.scale)
    }

    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.scale)
    }

    pub fn screen_to_logical(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    pub fn logical_to_screen(&self, logical_point: Point) -> Point {
        self.transform() * logical_point
    }

    /// Convert a screen-space distance to logical units.
    pub fn screen_delta_to_logical(&self, delta: Vec2) -> Vec2 {
        delta / self.scale
    }

    /// On-screen size of the canvas at the current scale.
    pub fn display_size(&self, canvas: Size) -> Size {
        Size::new(canvas.width * self.scale, canvas.height * self.scale)
    }
}
