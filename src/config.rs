//! Scene configuration.
//!
//! Configurations are plain JSON. Every field has a default, so `{}` is a
//! complete config: 40 dots over 8 shapes.
//!
//! ```json
//! {
//!   "seed": 7,
//!   "swarm": { "count": 60, "color": "#FFE66D" },
//!   "field": { "palette": "Ocean" },
//!   "background": "#101018"
//! }
//! ```

use crate::error::ConfigError;
use crate::field::FieldConfig;
use crate::swarm::SwarmConfig;
use crate::visuals::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::Range;
use std::path::Path;

/// Native window settings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "swarmfield".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// Complete scene configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// Seed for every random draw. `None` seeds from the clock.
    pub seed: Option<u64>,
    /// `None` disables the swarm.
    pub swarm: Option<SwarmConfig>,
    /// `None` disables the background field.
    pub field: Option<FieldConfig>,
    pub background: Color,
    pub window: WindowConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: None,
            swarm: Some(SwarmConfig::default()),
            field: Some(FieldConfig::default()),
            background: Color::rgb(0x1E, 0x1E, 0x2E),
            window: WindowConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Parse and validate a JSON config string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check every value the engines rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(swarm) = &self.swarm {
            check_range("swarm.size", &swarm.size)?;
            if swarm.size.start <= 0.0 {
                return Err(ConfigError::invalid("swarm.size", "sizes must be positive"));
            }
            check_range("swarm.follow_rate", &swarm.follow_rate)?;
            if swarm.follow_rate.start <= 0.0 || swarm.follow_rate.end > 1.0 {
                return Err(ConfigError::invalid(
                    "swarm.follow_rate",
                    "rates must lie within (0, 1]",
                ));
            }
            check_non_negative("swarm.spread", swarm.spread)?;
            check_non_negative("swarm.float_amplitude", swarm.float_amplitude)?;
            check_non_negative("swarm.float_speed", swarm.float_speed)?;
            check_unit("swarm.opacity", swarm.opacity)?;
        }

        if let Some(field) = &self.field {
            check_range("field.size", &field.size)?;
            if field.size.start <= 0.0 {
                return Err(ConfigError::invalid("field.size", "sizes must be positive"));
            }
            check_non_negative("field.max_speed", field.max_speed)?;
            check_non_negative("field.max_spin", field.max_spin)?;
            check_unit("field.circle_chance", field.circle_chance)?;
            check_unit("field.opacity", field.opacity)?;
            if field.palette.colors().is_empty() {
                return Err(ConfigError::invalid("field.palette", "palette has no colours"));
            }
        }

        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::invalid("window", "width and height must be non-zero"));
        }
        Ok(())
    }
}

fn check_range(field: &'static str, range: &Range<f32>) -> Result<(), ConfigError> {
    if !(range.start.is_finite() && range.end.is_finite()) || range.start > range.end {
        return Err(ConfigError::invalid(
            field,
            format!("expected start <= end, got {}..{}", range.start, range.end),
        ));
    }
    Ok(())
}

fn check_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !(value.is_finite() && value >= 0.0) {
        return Err(ConfigError::invalid(field, format!("expected >= 0, got {value}")));
    }
    Ok(())
}

fn check_unit(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::invalid(field, format!("expected 0..=1, got {value}")));
    }
    Ok(())
}
