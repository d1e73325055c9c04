//! Pong Wars - two balls fighting over a tiled arena
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, tile ownership, score)
//! - `settings`: Data-driven session configuration
//! - `error`: Configuration errors

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, SettingsError};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Upper bound on collision sub-steps inside a single tick
    pub const MAX_COLLISION_SUBSTEPS: u32 = 16;

    /// Default tile edge length
    pub const TILE_SIZE: f32 = 44.0;
    /// Default ball radius
    pub const BALL_RADIUS: f32 = 12.0;
    /// Share of the scene the playing field may occupy
    pub const FIELD_FRACTION: f32 = 0.85;

    /// Seconds before the opening impulses
    pub const LAUNCH_DELAY_SECS: f32 = 5.0;
    /// Magnitude of a touch push
    pub const FORCE_MAGNITUDE: f32 = 200.0;
    /// Opening impulse for the light ball
    pub const LIGHT_IMPULSE: [f32; 2] = [8.0, 2.0];
    /// Opening impulse for the dark ball
    pub const DARK_IMPULSE: [f32; 2] = [-4.0, -3.0];

    /// Simulation units per metre when deriving body mass
    pub const UNITS_PER_METER: f32 = 150.0;
    /// Body density (kg/m²)
    pub const BALL_DENSITY: f32 = 1.0;

    /// Restitution for every body; collisions are perfectly elastic
    pub const RESTITUTION: f32 = 1.0;

    /// Display fade bounds for tile columns
    pub const MIN_TILE_ALPHA: f32 = 0.2;
    pub const MAX_TILE_ALPHA: f32 = 1.0;
}

/// Normalize a vector, or `None` when it has no usable direction.
///
/// A zero-length (or non-finite) vector cannot be normalized; callers treat
/// `None` as "skip this force".
#[inline]
pub fn normalize_or_none(v: Vec2) -> Option<Vec2> {
    let len = v.length();
    if len > 0.0 && len.is_finite() {
        Some(v / len)
    } else {
        None
    }
}

/// Clamp a value into `[min, max]`
#[inline]
pub fn clamped(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}
