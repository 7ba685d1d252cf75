//! Configuration for a composition session.

use crate::color::SerializableColor;
use crate::path::{SimplifyOptions, StrokePath};
use crate::removal::DEFAULT_DELETE_ZONE_PERCENT;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default stroke width (smallest step of the thickness slider).
pub const DEFAULT_THICKNESS: f64 = 5.0;
/// Default stroke opacity.
pub const DEFAULT_OPACITY: f64 = 1.0;

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Initial brush and strokes for the draw tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushDefaults {
    pub color: SerializableColor,
    pub thickness: f64,
    pub opacity: f64,
    /// Strokes already drawn when the tool opens.
    pub paths: Vec<StrokePath>,
}

impl Default for BrushDefaults {
    fn default() -> Self {
        Self {
            color: SerializableColor::black(),
            thickness: DEFAULT_THICKNESS,
            opacity: DEFAULT_OPACITY,
            paths: Vec::new(),
        }
    }
}

/// Canvas geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f64,
    pub height: f64,
    /// Pan positions below this percentage of the height hit the delete target.
    pub delete_zone_percent: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 390.0,
            height: 844.0,
            delete_zone_percent: DEFAULT_DELETE_ZONE_PERCENT,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    pub simplify: SimplifyOptions,
    pub brush: BrushDefaults,
    pub canvas: CanvasConfig,
    /// Override for the preferences directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,
}

impl CardConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !is_positive(self.canvas.width) || !is_positive(self.canvas.height) {
            return Err(ConfigError::Invalid(format!(
                "canvas size must be positive, got {}x{}",
                self.canvas.width, self.canvas.height
            )));
        }
        if !is_positive(self.brush.thickness) {
            return Err(ConfigError::Invalid(format!(
                "brush thickness must be positive, got {}",
                self.brush.thickness
            )));
        }
        if self.simplify.amount.is_nan() || self.simplify.amount < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "simplify amount must not be negative, got {}",
                self.simplify.amount
            )));
        }
        Ok(())
    }
}
