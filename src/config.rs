//! Layout configuration: unit conversion between scene, logical and solver space.

use serde::{Deserialize, Serialize};

use crate::error::{FlexError, FlexResult};

/// Default quantization step: one solver point per hundredth of a logical unit.
pub const DEFAULT_PRECISION: f32 = 0.01;

/// Default solver-to-scene scale.
pub const DEFAULT_PIXEL_SIZE: f32 = 1.0;

/// Unit conversion settings of a layout tree.
///
/// - `precision`: logical units per solver point. Lengths are divided by it
///   before they reach the solver, so it is the smallest resolvable step.
/// - `pixel_size`: scene units per logical unit when reading results back.
///
/// # Example
///
/// ```
/// use spark_flex::config::LayoutConfig;
///
/// let config: LayoutConfig = serde_json::from_str(r#"{ "pixelSize": 2 }"#).unwrap();
/// assert_eq!(config.precision, 0.01);
/// assert_eq!(config.pixel_size, 2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    pub precision: f32,
    pub pixel_size: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            pixel_size: DEFAULT_PIXEL_SIZE,
        }
    }
}

impl LayoutConfig {
    pub fn with_precision(mut self, precision: f32) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_pixel_size(mut self, pixel_size: f32) -> Self {
        self.pixel_size = pixel_size;
        self
    }

    /// Both factors must be finite and positive.
    pub fn validate(&self) -> FlexResult<()> {
        if !(self.precision.is_finite() && self.precision > 0.0) {
            return Err(FlexError::invalid_config(format!(
                "precision must be positive, got {}",
                self.precision
            )));
        }
        if !(self.pixel_size.is_finite() && self.pixel_size > 0.0) {
            return Err(FlexError::invalid_config(format!(
                "pixel size must be positive, got {}",
                self.pixel_size
            )));
        }
        Ok(())
    }

    /// Scene units per solver point.
    pub fn scene_scale(&self) -> f32 {
        self.pixel_size * self.precision
    }
}
