//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (Light before Dark, tiles by index)
//! - No rendering or platform dependencies

pub mod arena;
pub mod collision;
pub mod score;
pub mod side;
pub mod state;
pub mod tick;

pub use arena::{Arena, Rect, Tile, TileFlip, TileGrid, build_field};
pub use collision::{CollisionResult, ball_rect_collision, ball_wall_collision, reflect_velocity};
pub use score::{Score, ScoreTracker};
pub use side::{Category, Side};
pub use state::{Ball, BallView, GameEvent, GameState, LaunchTimer, TouchOutcome};
pub use tick::{TickInput, tick};
