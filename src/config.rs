//! Canvas configuration.
//!
//! Every field has a default matching the stock viewer, so an empty TOML
//! document (or no document at all) yields [`CanvasConfig::default`].
//!
//! ```toml
//! [layout]
//! spacing_x = 480.0
//!
//! [zoom]
//! wheel_step = 0.05
//!
//! [default_transform]
//! pan_x = 20.0
//! ```

use std::{fs, path::Path};

use log::{debug, info};
use serde::Deserialize;

use crate::error::{CanvasError, ConfigError};
use crate::layout::LayoutConfig;
use crate::transform::{ScaleLimits, Transform};

/// Zoom behaviour for wheel and button input.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    #[serde(flatten)]
    pub limits: ScaleLimits,
    /// Scale delta per wheel notch.
    pub wheel_step: f32,
    /// Scale delta per zoom-in/zoom-out button press.
    pub button_step: f32,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            limits: ScaleLimits::default(),
            wheel_step: 0.1,
            button_step: 0.1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub layout: LayoutConfig,
    pub zoom: ZoomConfig,
    pub default_transform: Transform,
}

impl CanvasConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, CanvasError> {
        let config: CanvasConfig = toml::from_str(content).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist, cannot be read, or fails to
    /// parse or validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CanvasError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::MissingFile(path.to_path_buf()).into());
        }

        info!(path = path.display().to_string(); "Loading canvas configuration");
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load from `path` if given, otherwise fall back to defaults.
    pub fn load_or_default(path: Option<impl AsRef<Path>>) -> Result<Self, CanvasError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                debug!("No canvas configuration given, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let limits = self.zoom.limits;
        if !(limits.min_scale > 0.0 && limits.min_scale <= limits.max_scale) {
            return Err(ConfigError::Validation(format!(
                "zoom limits must satisfy 0 < min_scale <= max_scale (got {} and {})",
                limits.min_scale, limits.max_scale
            )));
        }
        if self.layout.metrics.char_width < 0.0 || self.layout.metrics.line_height < 0.0 {
            return Err(ConfigError::Validation(
                "node metrics must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}
