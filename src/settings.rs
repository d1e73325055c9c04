//! Session settings
//!
//! Every tunable of a session lives here. Settings can be loaded from a JSON
//! file; missing fields fall back to the defaults.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, SettingsError};
use crate::sim::Arena;
use crate::sim::arena::check_dimension;

/// Session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Field ===
    /// Arena width in simulation units
    pub arena_width: f32,
    /// Arena height in simulation units
    pub arena_height: f32,
    /// Square tile edge length
    pub tile_size: f32,
    /// Share of the scene used by the field when fitting to a scene
    pub field_fraction: f32,

    // === Balls ===
    pub ball_radius: f32,
    /// Magnitude of the push applied by a touch
    pub force_magnitude: f32,

    // === Opening ===
    /// Seconds between `start` and the opening impulses
    pub launch_delay_secs: f32,
    pub light_impulse: [f32; 2],
    pub dark_impulse: [f32; 2],
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // A 1024x768 scene fitted at 85%
            arena_width: 836.0,
            arena_height: 616.0,
            tile_size: TILE_SIZE,
            field_fraction: FIELD_FRACTION,

            ball_radius: BALL_RADIUS,
            force_magnitude: FORCE_MAGNITUDE,

            launch_delay_secs: LAUNCH_DELAY_SECS,
            light_impulse: LIGHT_IMPULSE,
            dark_impulse: DARK_IMPULSE,
        }
    }
}

impl Settings {
    /// Size the arena to a scene: take `field_fraction` of each axis and
    /// round down to a whole number of tiles.
    pub fn fit_arena(&mut self, scene_width: f32, scene_height: f32) {
        let columns = (scene_width * self.field_fraction / self.tile_size).floor();
        let rows = (scene_height * self.field_fraction / self.tile_size).floor();
        self.arena_width = columns * self.tile_size;
        self.arena_height = rows * self.tile_size;
    }

    pub fn arena_size(&self) -> Vec2 {
        Vec2::new(self.arena_width, self.arena_height)
    }

    pub fn tile_size(&self) -> Vec2 {
        Vec2::splat(self.tile_size)
    }

    /// Build the arena these settings describe, validating everything a
    /// session depends on.
    pub fn arena(&self) -> Result<Arena, ConfigError> {
        let arena = Arena::new(self.arena_size(), self.tile_size())?;
        self.check_ball(&arena)?;
        Ok(arena)
    }

    /// The ball must have a positive radius and fit between opposite walls
    pub fn check_ball(&self, arena: &Arena) -> Result<(), ConfigError> {
        check_dimension("ball radius", self.ball_radius)?;

        let extent = arena.bounds.width().min(arena.bounds.height());
        if self.ball_radius * 2.0 > extent {
            return Err(ConfigError::BallTooLarge {
                radius: self.ball_radius,
                arena: extent,
            });
        }
        Ok(())
    }

    /// Validate without keeping the arena
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.arena().map(|_| ())
    }

    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json_string(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }
}
