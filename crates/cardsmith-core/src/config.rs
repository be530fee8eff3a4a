//! Editor configuration.

use crate::error::ConfigError;
use crate::objects::SerializableColor;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunables for the alignment guide engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuideConfig {
    /// Maximum distance in canvas pixels at which two coordinates count as aligned.
    pub tolerance: f64,
    /// Candidates further than this from the closest one on the same axis are dropped.
    pub cluster_threshold: f64,
    /// Gaps at or above this are not annotated.
    pub distance_ceiling: f64,
    /// Overhang of a guide line past the aligned objects.
    pub extent_offset: f64,
}

impl Default for GuideConfig {
    fn default() -> Self {
        Self {
            tolerance: 2.0,
            cluster_threshold: 1.0,
            distance_ceiling: 500.0,
            extent_offset: 10.0,
        }
    }
}

/// Editor-wide settings. Every field has a default, so a partial JSON
/// document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub background: SerializableColor,
    pub guides: GuideConfig,
    /// Offset applied to duplicated objects, in both axes.
    pub duplicate_offset: f64,
    /// Oldest history entries are dropped beyond this count.
    pub max_history: usize,
    /// Inserted images are scaled to fit this fraction of the canvas.
    pub image_fit_fraction: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: 600.0,
            canvas_height: 840.0,
            background: SerializableColor::white(),
            guides: GuideConfig::default(),
            duplicate_offset: 20.0,
            max_history: 100,
            image_fit_fraction: 0.6,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_json(&contents)?;
        log::debug!("Loaded editor config from {}", path.display());
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.canvas_width > 0.0 && self.canvas_height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "canvas size must be positive, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        let guides = &self.guides;
        if guides.tolerance < 0.0 || guides.cluster_threshold < 0.0 || guides.extent_offset < 0.0 {
            return Err(ConfigError::Invalid(
                "guide tolerances must not be negative".to_string(),
            ));
        }
        if guides.distance_ceiling <= 0.0 {
            return Err(ConfigError::Invalid(
                "distance ceiling must be positive".to_string(),
            ));
        }
        if self.max_history == 0 {
            return Err(ConfigError::Invalid("max_history must be at least 1".to_string()));
        }
        if !(self.image_fit_fraction > 0.0 && self.image_fit_fraction <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "image_fit_fraction must be in (0, 1], got {}",
                self.image_fit_fraction
            )));
        }
        Ok(())
    }
}
