//! Editor configuration.

use crate::grid::GRID_CELL_SCREEN_SIZE;
use crate::snap::SnapConfig;
use crate::theme::ThemeMode;
use crate::units::{NumberLocale, Scale, WallThickness};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default wall height in meters.
pub const DEFAULT_WALL_HEIGHT: f64 = 2.7;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Editor configuration. Every field is optional in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub snap: SnapConfig,
    /// Grid cell size in device pixels.
    pub grid_cell_size: f64,
    pub grid_visible: bool,
    pub scale: Scale,
    pub wall_thickness: WallThickness,
    /// Wall height in meters for the 3D view.
    pub wall_height: f64,
    pub locale: NumberLocale,
    pub device_pixel_ratio: f64,
    pub theme: ThemeMode,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap: SnapConfig::default(),
            grid_cell_size: GRID_CELL_SCREEN_SIZE,
            grid_visible: true,
            scale: Scale::default(),
            wall_thickness: WallThickness::default(),
            wall_height: DEFAULT_WALL_HEIGHT,
            locale: NumberLocale::default(),
            device_pixel_ratio: 1.0,
            theme: ThemeMode::default(),
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

    /// Load and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).inspect_err(|e| {
            log::warn!("Failed to read config {}: {}", path.display(), e);
        })?;
        Self::from_json(&json).inspect_err(|e| {
            log::warn!("Rejected config {}: {}", path.display(), e);
        })
    }

    /// Load a configuration file, falling back to defaults on any failure.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Reject non-positive sizes, heights, ratios and thresholds.
    pub fn validate(&self) -> ConfigResult<()> {
        positive("grid_cell_size", self.grid_cell_size)?;
        positive("wall_height", self.wall_height)?;
        positive("device_pixel_ratio", self.device_pixel_ratio)?;
        positive("snap.threshold", self.snap.threshold)?;
        positive("snap.ortho_intent_threshold", self.snap.ortho_intent_threshold)?;
        positive("snap.low_grid_threshold", self.snap.low_grid_threshold)?;
        Ok(())
    }
}

fn positive(field: &str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{field} must be positive, got {value}")))
    }
}
