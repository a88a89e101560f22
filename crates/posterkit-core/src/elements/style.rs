//! Paint and effect properties shared by element kinds.

use peniko::Color;
use serde::{Deserialize, Serialize};

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse a CSS hex color (`#rgb`, `#rrggbb`, `#rrggbbaa`) or `transparent`.
    ///
    /// Returns `None` for anything else.
    pub fn parse(color: &str) -> Option<Self> {
        let color = color.trim();
        if color.eq_ignore_ascii_case("transparent") {
            return Some(Self::transparent());
        }

        let hex = color.strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        match hex.len() {
            3 => Some(Self::new(
                channel(0..1)? * 17,
                channel(1..2)? * 17,
                channel(2..3)? * 17,
                255,
            )),
            6 => Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?, 255)),
            8 => Some(Self::new(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => None,
        }
    }

    /// Parse a color, falling back to black for malformed input.
    pub fn parse_or_black(color: &str) -> Self {
        Self::parse(color).unwrap_or_else(|| {
            log::debug!("Unrecognized color '{color}', using black");
            Self::black()
        })
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Multiply alpha by `opacity` (clamped to [0, 1]).
    pub fn with_opacity(&self, opacity: f64) -> Self {
        let alpha = (self.a as f64 * opacity.clamp(0.0, 1.0)).round() as u8;
        Self::new(self.r, self.g, self.b, alpha)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// A single gradient color stop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Position along the gradient in [0, 1].
    pub offset: f64,
    pub color: SerializableColor,
}

impl GradientStop {
    pub fn new(offset: f64, color: SerializableColor) -> Self {
        Self { offset, color }
    }
}

/// Gradient descriptor before resolution against element geometry.
///
/// Angles are in degrees using the CSS convention (0 points up, 90 points right).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Gradient {
    Linear { angle: f64, stops: Vec<GradientStop> },
    Radial { stops: Vec<GradientStop> },
    Conic { angle: f64, stops: Vec<GradientStop> },
    RepeatingLinear { angle: f64, stops: Vec<GradientStop> },
    RepeatingRadial { stops: Vec<GradientStop> },
}

impl Gradient {
    pub fn stops(&self) -> &[GradientStop] {
        match self {
            Gradient::Linear { stops, .. }
            | Gradient::Radial { stops }
            | Gradient::Conic { stops, .. }
            | Gradient::RepeatingLinear { stops, .. }
            | Gradient::RepeatingRadial { stops } => stops,
        }
    }

    /// Stops ordered by offset.
    pub fn sorted_stops(&self) -> Vec<GradientStop> {
        let mut stops = self.stops().to_vec();
        stops.sort_by(|a, b| a.offset.total_cmp(&b.offset));
        stops
    }
}

/// Fill descriptor: a solid color or a gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Fill {
    Solid(SerializableColor),
    Gradient(Gradient),
}

impl Fill {
    /// Solid fill from a CSS hex string.
    pub fn hex(color: &str) -> Self {
        Fill::Solid(SerializableColor::parse_or_black(color))
    }

    /// Single color used where gradients cannot be drawn.
    pub fn fallback_color(&self) -> SerializableColor {
        match self {
            Fill::Solid(color) => *color,
            Fill::Gradient(gradient) => gradient
                .stops()
                .first()
                .map(|stop| stop.color)
                .unwrap_or_else(SerializableColor::black),
        }
    }
}

impl Default for Fill {
    fn default() -> Self {
        Fill::Solid(SerializableColor::black())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// Outline properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: SerializableColor,
    pub width: f64,
    /// Dash pattern; `None` draws a solid line.
    #[serde(default)]
    pub dash: Option<Vec<f64>>,
    #[serde(default)]
    pub line_cap: LineCap,
    #[serde(default)]
    pub line_join: LineJoin,
}

impl Stroke {
    pub fn new(color: SerializableColor, width: f64) -> Self {
        Self {
            color,
            width,
            dash: None,
            line_cap: LineCap::default(),
            line_join: LineJoin::default(),
        }
    }

    /// Whether this stroke paints anything.
    pub fn is_visible(&self) -> bool {
        self.width > 0.0 && self.color.a > 0
    }
}

impl Default for Stroke {
    fn default() -> Self {
        Self::new(SerializableColor::black(), 0.0)
    }
}

/// Drop shadow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub enabled: bool,
    pub color: SerializableColor,
    pub blur: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    #[serde(default)]
    pub spread: f64,
}

impl Shadow {
    /// Hard offset shadow with no blur.
    pub fn hard(color: SerializableColor, offset_x: f64, offset_y: f64) -> Self {
        Self {
            enabled: true,
            color,
            blur: 0.0,
            offset_x,
            offset_y,
            spread: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlurKind {
    #[default]
    Gaussian,
    Background,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Blur {
    pub enabled: bool,
    pub kind: BlurKind,
    pub radius: f64,
}

/// Compositing mode used when painting an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

impl BlendMode {
    /// Convert to the peniko blend mode used by renderers.
    pub fn to_peniko(self) -> peniko::BlendMode {
        use peniko::Mix;
        let mix = match self {
            BlendMode::Normal => Mix::Normal,
            BlendMode::Multiply => Mix::Multiply,
            BlendMode::Screen => Mix::Screen,
            BlendMode::Overlay => Mix::Overlay,
            BlendMode::Darken => Mix::Darken,
            BlendMode::Lighten => Mix::Lighten,
            BlendMode::ColorDodge => Mix::ColorDodge,
            BlendMode::ColorBurn => Mix::ColorBurn,
            BlendMode::HardLight => Mix::HardLight,
            BlendMode::SoftLight => Mix::SoftLight,
            BlendMode::Difference => Mix::Difference,
            BlendMode::Exclusion => Mix::Exclusion,
            BlendMode::Hue => Mix::Hue,
            BlendMode::Saturation => Mix::Saturation,
            BlendMode::Color => Mix::Color,
            BlendMode::Luminosity => Mix::Luminosity,
        };
        mix.into()
    }
}

/// Extra per-element transform applied around the geometric center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformStyle {
    pub scale_x: f64,
    pub scale_y: f64,
    /// Horizontal skew in degrees.
    pub skew_x: f64,
    /// Vertical skew in degrees.
    pub skew_y: f64,
    pub flip_h: bool,
    pub flip_v: bool,
}

impl TransformStyle {
    /// Scale factors with flips folded in as sign.
    pub fn signed_scale(&self) -> (f64, f64) {
        let sx = if self.flip_h { -self.scale_x } else { self.scale_x };
        let sy = if self.flip_v { -self.scale_y } else { self.scale_y };
        (sx, sy)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

impl Default for TransformStyle {
    fn default() -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
            skew_x: 0.0,
            skew_y: 0.0,
            flip_h: false,
            flip_v: false,
        }
    }
}
