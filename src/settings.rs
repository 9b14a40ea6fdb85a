//! Formation settings
//!
//! Constants fixed for the lifetime of a wave. Loaded from JSON or taken from
//! the reference defaults; validated before any mover is built.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::error::ConfigError;
use crate::sim::state::PlayfieldBounds;

/// Formation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormationSettings {
    /// Seconds between two formation moves
    pub move_interval: f64,
    /// Horizontal step magnitude
    pub step_x: f32,
    /// Vertical step magnitude
    pub step_y: f32,
    /// Tolerance used when comparing actor bounds to a wall
    pub wall_epsilon: f32,

    // === Playfield ===
    pub playfield_width: f32,
    pub playfield_height: f32,
}

impl Default for FormationSettings {
    fn default() -> Self {
        Self {
            move_interval: MOVE_INTERVAL,
            step_x: STEP_X,
            step_y: STEP_Y,
            wall_epsilon: WALL_EPSILON,

            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,
        }
    }
}

impl FormationSettings {
    /// Check every field. Nothing is clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.move_interval.is_finite() && self.move_interval > 0.0) {
            return Err(ConfigError::NonPositiveInterval(self.move_interval));
        }
        for (axis, value) in [("horizontal", self.step_x), ("vertical", self.step_y)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositiveStep { axis, value });
            }
        }
        if !(self.wall_epsilon.is_finite() && self.wall_epsilon >= 0.0) {
            return Err(ConfigError::NegativeEpsilon(self.wall_epsilon));
        }
        self.playfield()?;
        Ok(())
    }

    /// Playfield described by these settings
    pub fn playfield(&self) -> Result<PlayfieldBounds, ConfigError> {
        PlayfieldBounds::new(self.playfield_width, self.playfield_height)
    }

    /// Parse and validate settings from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded formation settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
