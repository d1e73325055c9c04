//! Error types
//!
//! The simulation itself is total over valid state; the only failures are
//! rejected configurations and unreadable settings files.

use std::fmt;

/// Which axis of the arena a size check concerns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Width,
    Height,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Width => write!(f, "width"),
            Self::Height => write!(f, "height"),
        }
    }
}

/// An arena configuration that cannot host a session
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A dimension is zero or negative
    NonPositiveDimension { what: &'static str, value: f32 },
    /// A dimension is NaN or infinite
    NonFinite { what: &'static str },
    /// A tile does not fit in one half of the arena
    TileTooLarge { axis: Axis, tile: f32, half: f32 },
    /// A ball cannot fit between the walls
    BallTooLarge { radius: f32, arena: f32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveDimension { what, value } => {
                write!(f, "{what} must be positive, got {value}")
            }
            Self::NonFinite { what } => write!(f, "{what} must be a finite number"),
            Self::TileTooLarge { axis, tile, half } => write!(
                f,
                "tile {axis} {tile} exceeds half the arena {axis} ({half})"
            ),
            Self::BallTooLarge { radius, arena } => write!(
                f,
                "ball radius {radius} does not fit an arena of extent {arena}"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Failure to read or parse a settings file
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(ConfigError),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read settings: {e}"),
            Self::Parse(e) => write!(f, "failed to parse settings: {e}"),
            Self::Invalid(e) => write!(f, "invalid settings: {e}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Invalid(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

impl From<ConfigError> for SettingsError {
    fn from(e: ConfigError) -> Self {
        Self::Invalid(e)
    }
}
