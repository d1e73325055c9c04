//! Arena geometry and the tile grid
//!
//! The arena is an axis-aligned rectangle centred on the origin (y up). Its
//! left half is laid out with Light tiles and its right half with Dark tiles,
//! each half filled column by column starting at the vertical centreline and
//! working outward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::side::{Category, Side};
use crate::clamped;
use crate::consts::{MAX_TILE_ALPHA, MIN_TILE_ALPHA};
use crate::error::{Axis, ConfigError};

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Closest point inside the rectangle to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }

    /// Left half (for the Light side)
    pub fn left_half(&self) -> Rect {
        Rect::new(self.min, Vec2::new(self.center().x, self.max.y))
    }

    /// Right half (for the Dark side)
    pub fn right_half(&self) -> Rect {
        Rect::new(Vec2::new(self.center().x, self.min.y), self.max)
    }
}

/// The playing field: bounds plus tile geometry. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    pub bounds: Rect,
    pub tile_size: Vec2,
}

impl Arena {
    /// Build an arena of the given size centred on the origin.
    ///
    /// Rejects non-positive or non-finite sizes and tiles that do not fit in
    /// half the arena on either axis.
    pub fn new(size: Vec2, tile_size: Vec2) -> Result<Self, ConfigError> {
        check_dimension("arena width", size.x)?;
        check_dimension("arena height", size.y)?;
        check_dimension("tile width", tile_size.x)?;
        check_dimension("tile height", tile_size.y)?;

        let half = size * 0.5;
        if tile_size.x > half.x {
            return Err(ConfigError::TileTooLarge {
                axis: Axis::Width,
                tile: tile_size.x,
                half: half.x,
            });
        }
        if tile_size.y > half.y {
            return Err(ConfigError::TileTooLarge {
                axis: Axis::Height,
                tile: tile_size.y,
                half: half.y,
            });
        }

        Ok(Self {
            bounds: Rect::from_center_size(Vec2::ZERO, size),
            tile_size,
        })
    }

    /// Region laid out for a side
    pub fn region(&self, side: Side) -> Rect {
        match side {
            Side::Light => self.bounds.left_half(),
            Side::Dark => self.bounds.right_half(),
        }
    }

    /// Columns per side (floor-truncated)
    pub fn columns_per_side(&self) -> usize {
        (self.region(Side::Light).width() / self.tile_size.x).floor() as usize
    }

    /// Rows (floor-truncated)
    pub fn rows(&self) -> usize {
        (self.bounds.height() / self.tile_size.y).floor() as usize
    }

    pub fn total_tiles(&self) -> usize {
        self.columns_per_side() * self.rows() * 2
    }
}

pub(crate) fn check_dimension(what: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { what });
    }
    if value <= 0.0 {
        return Err(ConfigError::NonPositiveDimension { what, value });
    }
    Ok(())
}

/// Data carried by a tile flip, for presentation and scoring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileFlip {
    /// Index into the grid
    pub index: usize,
    /// Column within the tile's home half (0 at the centreline)
    pub column: usize,
    pub row: usize,
    /// Half of the arena the tile belongs to
    pub home: Side,
    /// Owner after the flip
    pub side: Side,
}

/// A grid cell with mutable ownership
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    pub index: usize,
    pub column: usize,
    pub row: usize,
    pub home: Side,
    pub bounds: Rect,
    /// Fade factor for rendering; no effect on the simulation
    pub color_alpha: f32,
    side: Side,
    category: Category,
}

impl Tile {
    pub fn new(index: usize, column: usize, row: usize, side: Side, bounds: Rect, color_alpha: f32) -> Self {
        Self {
            index,
            column,
            row,
            home: side,
            bounds,
            color_alpha,
            side,
            category: Category::tile(side),
        }
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Collision category for the current owner
    #[inline]
    pub fn category(&self) -> Category {
        self.category
    }

    /// Toggle ownership, refresh the collision category, and describe the flip
    pub fn switch_side(&mut self) -> TileFlip {
        self.side = self.side.opposite();
        self.category = Category::tile(self.side);
        TileFlip {
            index: self.index,
            column: self.column,
            row: self.row,
            home: self.home,
            side: self.side,
        }
    }
}

/// Lay out one side's tiles inside `region`.
///
/// Columns are filled top to bottom, starting at the column touching the
/// arena centreline and stepping outward (leftward for Light, rightward for
/// Dark). Any remainder that does not fit a whole tile is left empty.
/// `first_index` is the grid index assigned to the first tile.
pub fn build_field(region: Rect, tile_size: Vec2, side: Side, first_index: usize) -> Vec<Tile> {
    let columns = (region.width() / tile_size.x).floor() as usize;
    let rows = (region.height() / tile_size.y).floor() as usize;

    let initial_y = region.center().y + (region.height() - tile_size.y) * 0.5;
    let (initial_x, step_x) = match side {
        Side::Light => (region.max.x - tile_size.x * 0.5, -tile_size.x),
        Side::Dark => (region.min.x + tile_size.x * 0.5, tile_size.x),
    };

    let mut tiles = Vec::with_capacity(columns * rows);
    let mut x = initial_x;
    for column in 0..columns {
        let ratio = column as f32 / columns as f32;
        let color_alpha = clamped(1.0 - ratio, MIN_TILE_ALPHA, MAX_TILE_ALPHA);

        let mut y = initial_y;
        for row in 0..rows {
            let bounds = Rect::from_center_size(Vec2::new(x, y), tile_size);
            let index = first_index + tiles.len();
            tiles.push(Tile::new(index, column, row, side, bounds, color_alpha));
            y -= tile_size.y;
        }
        x += step_x;
    }
    tiles
}

/// Every tile in the arena. The tile set is fixed for the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileGrid {
    tiles: Vec<Tile>,
    columns_per_side: usize,
    rows: usize,
}

impl TileGrid {
    /// Light half first, then Dark half
    pub fn new(arena: &Arena) -> Self {
        let mut tiles = build_field(arena.region(Side::Light), arena.tile_size, Side::Light, 0);
        let dark = build_field(arena.region(Side::Dark), arena.tile_size, Side::Dark, tiles.len());
        tiles.extend(dark);
        Self {
            tiles,
            columns_per_side: arena.columns_per_side(),
            rows: arena.rows(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn columns_per_side(&self) -> usize {
        self.columns_per_side
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn get(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Find a tile by its home half and layout position
    pub fn find(&self, home: Side, column: usize, row: usize) -> Option<&Tile> {
        if column >= self.columns_per_side || row >= self.rows {
            return None;
        }
        let offset = match home {
            Side::Light => 0,
            Side::Dark => self.columns_per_side * self.rows,
        };
        self.tiles.get(offset + column * self.rows + row)
    }

    /// Flip the tile at `index`
    pub fn switch_side(&mut self, index: usize) -> Option<TileFlip> {
        self.tiles.get_mut(index).map(Tile::switch_side)
    }

    /// Number of tiles currently owned by `side` (full scan)
    pub fn count(&self, side: Side) -> usize {
        self.tiles.iter().filter(|t| t.side == side).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena_400() -> Arena {
        Arena::new(Vec2::new(400.0, 400.0), Vec2::new(40.0, 40.0)).unwrap()
    }

    #[test]
    fn test_grid_dimensions_400() {
        let arena = arena_400();
        assert_eq!(arena.columns_per_side(), 5);
        assert_eq!(arena.rows(), 10);

        let grid = TileGrid::new(&arena);
        assert_eq!(grid.len(), 100);
        assert_eq!(grid.count(Side::Light), 50);
        assert_eq!(grid.count(Side::Dark), 50);
    }

    #[test]
    fn test_dimensions_floor_truncate() {
        // 430 / 2 = 215 -> 5 columns of 40 (not 5.375 rounded)
        let arena = Arena::new(Vec2::new(430.0, 419.0), Vec2::new(40.0, 40.0)).unwrap();
        assert_eq!(arena.columns_per_side(), 5);
        assert_eq!(arena.rows(), 10);
        assert_eq!(TileGrid::new(&arena).len(), 100);
    }

    #[test]
    fn test_layout_starts_at_centerline_top() {
        let grid = TileGrid::new(&arena_400());

        let light = grid.find(Side::Light, 0, 0).unwrap();
        assert_eq!(light.bounds.center(), Vec2::new(-20.0, 180.0));
        let dark = grid.find(Side::Dark, 0, 0).unwrap();
        assert_eq!(dark.bounds.center(), Vec2::new(20.0, 180.0));

        // Rows step down, columns step outward
        let light_next_row = grid.find(Side::Light, 0, 1).unwrap();
        assert_eq!(light_next_row.bounds.center(), Vec2::new(-20.0, 140.0));
        let light_next_col = grid.find(Side::Light, 1, 0).unwrap();
        assert_eq!(light_next_col.bounds.center(), Vec2::new(-60.0, 180.0));
        let dark_next_col = grid.find(Side::Dark, 1, 0).unwrap();
        assert_eq!(dark_next_col.bounds.center(), Vec2::new(60.0, 180.0));
    }

    #[test]
    fn test_layout_is_column_major() {
        let grid = TileGrid::new(&arena_400());
        let first: Vec<(usize, usize)> = grid.iter().take(11).map(|t| (t.column, t.row)).collect();
        assert_eq!(first[0], (0, 0));
        assert_eq!(first[9], (0, 9));
        assert_eq!(first[10], (1, 0));
        for (i, tile) in grid.iter().enumerate() {
            assert_eq!(tile.index, i);
        }
    }

    #[test]
    fn test_tiles_stay_inside_bounds() {
        let arena = Arena::new(Vec2::new(470.0, 330.0), Vec2::new(44.0, 44.0)).unwrap();
        let grid = TileGrid::new(&arena);
        for tile in grid.iter() {
            assert!(arena.bounds.contains(tile.bounds.min));
            assert!(arena.bounds.contains(tile.bounds.max));
            let region = arena.region(tile.home);
            assert!(tile.bounds.min.x >= region.min.x - 1e-3);
            assert!(tile.bounds.max.x <= region.max.x + 1e-3);
        }
    }

    #[test]
    fn test_color_alpha_fades_outward() {
        let grid = TileGrid::new(&arena_400());
        let a0 = grid.find(Side::Light, 0, 0).unwrap().color_alpha;
        let a4 = grid.find(Side::Light, 4, 0).unwrap().color_alpha;
        assert_eq!(a0, 1.0);
        assert!((a4 - 0.2).abs() < 1e-6);

        let wide = Arena::new(Vec2::new(2000.0, 100.0), Vec2::new(40.0, 40.0)).unwrap();
        for tile in TileGrid::new(&wide).iter() {
            assert!(tile.color_alpha >= MIN_TILE_ALPHA && tile.color_alpha <= MAX_TILE_ALPHA);
        }
    }

    #[test]
    fn test_switch_side_twice_restores() {
        let mut grid = TileGrid::new(&arena_400());
        let before = grid.get(3).unwrap().side();
        let flip = grid.switch_side(3).unwrap();
        assert_eq!(flip.side, before.opposite());
        assert_eq!(grid.get(3).unwrap().category(), Category::tile(before.opposite()));
        grid.switch_side(3);
        assert_eq!(grid.get(3).unwrap().side(), before);
        assert_eq!(grid.get(3).unwrap().category(), Category::tile(before));
        assert!(grid.switch_side(1000).is_none());
    }

    #[test]
    fn test_invalid_arena_rejected() {
        assert!(matches!(
            Arena::new(Vec2::new(400.0, 400.0), Vec2::new(201.0, 40.0)),
            Err(ConfigError::TileTooLarge { axis: Axis::Width, .. })
        ));
        assert!(matches!(
            Arena::new(Vec2::new(400.0, 60.0), Vec2::new(40.0, 40.0)),
            Err(ConfigError::TileTooLarge { axis: Axis::Height, .. })
        ));
        assert!(matches!(
            Arena::new(Vec2::new(0.0, 400.0), Vec2::new(40.0, 40.0)),
            Err(ConfigError::NonPositiveDimension { .. })
        ));
        assert!(matches!(
            Arena::new(Vec2::new(400.0, 400.0), Vec2::new(-1.0, 40.0)),
            Err(ConfigError::NonPositiveDimension { .. })
        ));
        assert!(matches!(
            Arena::new(Vec2::new(f32::INFINITY, 400.0), Vec2::new(40.0, 40.0)),
            Err(ConfigError::NonFinite { .. })
        ));
    }
}
