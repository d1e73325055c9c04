//! Sides and collision categories
//!
//! Each ball only interacts with tiles owned by the other side. The rule is a
//! fixed table over four category bits rather than per-body mutable masks.

use serde::{Deserialize, Serialize};

/// One of the two competing factions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Light,
    Dark,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Light, Side::Dark];

    /// The other side
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Side::Light => Side::Dark,
            Side::Dark => Side::Light,
        }
    }

    /// Tile fill colour (RGBA)
    pub fn tile_color(self) -> u32 {
        match self {
            Side::Light => 0xD9E8E3FF,
            Side::Dark => 0x172B36FF,
        }
    }

    /// Ball colour (RGBA); a ball wears the colour of the territory it attacks
    pub fn ball_color(self) -> u32 {
        self.opposite().tile_color()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Light => "Light",
            Side::Dark => "Dark",
        }
    }
}

/// Collision category bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Category(pub u32);

impl Category {
    pub const NONE: Category = Category(0);
    pub const BALL_LIGHT: Category = Category(1 << 0);
    pub const BALL_DARK: Category = Category(1 << 1);
    pub const TILE_LIGHT: Category = Category(1 << 2);
    pub const TILE_DARK: Category = Category(1 << 3);

    /// Category of a ball of the given side
    #[inline]
    pub fn ball(side: Side) -> Self {
        match side {
            Side::Light => Self::BALL_LIGHT,
            Side::Dark => Self::BALL_DARK,
        }
    }

    /// Category of a tile owned by the given side
    #[inline]
    pub fn tile(side: Side) -> Self {
        match side {
            Side::Light => Self::TILE_LIGHT,
            Side::Dark => Self::TILE_DARK,
        }
    }

    /// Categories a body of this category physically collides with.
    ///
    /// Walls are a separate static body and are not part of the table.
    pub fn collision_mask(self) -> Self {
        match self {
            Self::BALL_LIGHT => Self::TILE_DARK,
            Self::BALL_DARK => Self::TILE_LIGHT,
            Self::TILE_LIGHT => Self::BALL_DARK,
            Self::TILE_DARK => Self::BALL_LIGHT,
            _ => Self::NONE,
        }
    }

    /// Categories that raise a contact event against this one
    #[inline]
    pub fn contact_mask(self) -> Self {
        self.collision_mask()
    }

    #[inline]
    pub fn intersects(self, other: Category) -> bool {
        self.0 & other.0 != 0
    }

    /// Whether two bodies collide
    #[inline]
    pub fn collides(a: Category, b: Category) -> bool {
        a.collision_mask().intersects(b)
    }
}
