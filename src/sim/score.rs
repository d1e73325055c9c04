//! Live tile counts per side

use serde::{Deserialize, Serialize};

use super::arena::{TileFlip, TileGrid};
use super::side::Side;

/// Score for both sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    pub light: usize,
    pub dark: usize,
}

impl Score {
    pub fn get(&self, side: Side) -> usize {
        match side {
            Side::Light => self.light,
            Side::Dark => self.dark,
        }
    }

    pub fn total(&self) -> usize {
        self.light + self.dark
    }
}

/// Tracks how many tiles each side owns.
///
/// Counts are kept incrementally per flip and always equal a full recount of
/// the grid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreTracker {
    score: Score,
}

impl ScoreTracker {
    pub fn new(grid: &TileGrid) -> Self {
        let mut tracker = Self::default();
        tracker.recount(grid);
        tracker
    }

    /// Full scan of the grid
    pub fn recount(&mut self, grid: &TileGrid) -> Score {
        self.score = Score {
            light: grid.count(Side::Light),
            dark: grid.count(Side::Dark),
        };
        self.score
    }

    /// Account for a single flip that has already been applied to the grid
    pub fn record_flip(&mut self, flip: &TileFlip) -> Score {
        let (gain, loss) = match flip.side {
            Side::Light => (&mut self.score.light, &mut self.score.dark),
            Side::Dark => (&mut self.score.dark, &mut self.score.light),
        };
        *gain += 1;
        *loss = loss.saturating_sub(1);
        self.score
    }

    #[inline]
    pub fn count(&self, side: Side) -> usize {
        self.score.get(side)
    }

    #[inline]
    pub fn score(&self) -> Score {
        self.score
    }
}
