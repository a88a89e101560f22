//! Editor configuration.

use crate::canvas::CanvasSettings;
use crate::clipboard::DUPLICATE_OFFSET;
use crate::export::MIN_EXPORT_PIXEL_RATIO;
use crate::geometry::MIN_RESIZE_DIMENSION;
use crate::marquee::MARQUEE_THRESHOLD;
use crate::shortcuts::Platform;
use crate::tools::BrushSettings;
use crate::viewport::{DEFAULT_PADDING, MAX_SCALE, MIN_SCALE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Tunables for an editor session. Every field has a default, so partial
/// JSON documents are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub min_scale: f64,
    pub max_scale: f64,
    /// Screen padding around the fitted canvas.
    pub viewport_padding: f64,
    /// Drag distance before a marquee selects.
    pub marquee_threshold: f64,
    /// Smallest width or height a resize may produce.
    pub min_resize: f64,
    /// Offset for pasted and duplicated elements.
    pub duplicate_offset: (f64, f64),
    pub nudge_step: f64,
    pub nudge_step_fast: f64,
    /// Floor for the automatic export pixel ratio.
    pub min_export_pixel_ratio: f64,
    /// Hit-test slack in logical units.
    pub hit_tolerance: f64,
    /// Use macOS modifier matching for shortcuts.
    pub mac_shortcuts: bool,
    pub canvas: CanvasSettings,
    pub brush: BrushSettings,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            viewport_padding: DEFAULT_PADDING,
            marquee_threshold: MARQUEE_THRESHOLD,
            min_resize: MIN_RESIZE_DIMENSION,
            duplicate_offset: (DUPLICATE_OFFSET.x, DUPLICATE_OFFSET.y),
            nudge_step: 1.0,
            nudge_step_fast: 10.0,
            min_export_pixel_ratio: MIN_EXPORT_PIXEL_RATIO,
            hit_tolerance: 0.0,
            mac_shortcuts: Platform::current() == Platform::MacOs,
            canvas: CanvasSettings::default(),
            brush: BrushSettings::default(),
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let positive = [
            ("min_scale", self.min_scale),
            ("max_scale", self.max_scale),
            ("min_resize", self.min_resize),
            ("min_export_pixel_ratio", self.min_export_pixel_ratio),
            ("canvas.width", self.canvas.width),
            ("canvas.height", self.canvas.height),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("expected a positive number, got {value}"),
                });
            }
        }
        if self.min_scale > self.max_scale {
            return Err(ConfigError::Invalid {
                field: "min_scale",
                reason: format!("{} exceeds max_scale {}", self.min_scale, self.max_scale),
            });
        }
        let non_negative = [
            ("marquee_threshold", self.marquee_threshold),
            ("viewport_padding", self.viewport_padding),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("expected a non-negative number, got {value}"),
                });
            }
        }
        Ok(())
    }

    pub fn platform(&self) -> Platform {
        if self.mac_shortcuts {
            Platform::MacOs
        } else {
            Platform::Other
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EditorConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.viewport_padding - 80.0).abs() < f64::EPSILON);
        assert!((config.min_resize - 20.0).abs() < f64::EPSILON);
        assert!((config.marquee_threshold - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_json() {
        let config =
            EditorConfig::from_json(r#"{"nudge_step_fast": 25, "canvas": {"width": 900}}"#)
                .unwrap();
        assert!((config.nudge_step_fast - 25.0).abs() < f64::EPSILON);
        assert!((config.canvas.width - 900.0).abs() < f64::EPSILON);
        assert!((config.canvas.height - 1920.0).abs() < f64::EPSILON);
        assert!((config.nudge_step - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_inverted_scale_range() {
        let result = EditorConfig::from_json(r#"{"min_scale": 2.0, "max_scale": 1.0}"#);
        assert!(matches!(result, Err(ConfigError::Invalid { field: "min_scale", .. })));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            EditorConfig::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_roundtrip() {
        let config = EditorConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(EditorConfig::from_json(&json).unwrap(), config);
    }
}
