//! Game state and core simulation types
//!
//! A session owns the arena, the tile grid, exactly two balls (one per side),
//! the opening timer and the queue of events for the presentation layer.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::arena::{Arena, TileFlip, TileGrid};
use super::score::{Score, ScoreTracker};
use super::side::{Category, Side};
use crate::consts::*;
use crate::error::ConfigError;
use crate::normalize_or_none;
use crate::settings::Settings;

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub side: Side,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Selected for control by the player
    pub active: bool,
    /// Force accumulated since the last tick, integrated over one step
    #[serde(default)]
    pub pending_force: Vec2,
    /// Tiles overlapped during the previous sub-step (for contact-begin detection)
    #[serde(default)]
    pub contacts: Vec<usize>,
}

impl Ball {
    pub fn new(side: Side, pos: Vec2, radius: f32) -> Self {
        Self {
            side,
            pos,
            vel: Vec2::ZERO,
            radius,
            active: false,
            pending_force: Vec2::ZERO,
            contacts: Vec::new(),
        }
    }

    /// Mass from unit density over the disc area, measured in metres
    pub fn mass(&self) -> f32 {
        let r = self.radius / UNITS_PER_METER;
        BALL_DENSITY * std::f32::consts::PI * r * r
    }

    #[inline]
    pub fn category(&self) -> Category {
        Category::ball(self.side)
    }

    /// Instantaneous change of momentum
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        self.vel += impulse / self.mass();
    }

    /// Queue a force to be integrated over the next step
    pub fn add_force(&mut self, force: Vec2) {
        self.pending_force += force;
    }

    /// Integrate and clear the pending force
    pub fn integrate_force(&mut self, dt: f32) {
        if self.pending_force != Vec2::ZERO {
            self.vel += self.pending_force / self.mass() * dt;
            self.pending_force = Vec2::ZERO;
        }
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        self.pos.distance_squared(point) <= self.radius * self.radius
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// What the presentation layer needs to draw a ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallView {
    pub side: Side,
    pub pos: Vec2,
    pub radius: f32,
    pub active: bool,
    pub color: u32,
}

/// One-shot timer for the opening impulses
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LaunchTimer {
    /// `start` has not been called
    Idle,
    /// Counting down
    Pending { remaining: f32 },
    /// Fired; never fires again
    Fired,
}

impl LaunchTimer {
    /// Advance by `dt`; returns true exactly once, on the tick the delay runs out
    pub fn advance(&mut self, dt: f32) -> bool {
        if let LaunchTimer::Pending { remaining } = self {
            *remaining -= dt;
            if *remaining <= 0.0 {
                *self = LaunchTimer::Fired;
                return true;
            }
        }
        false
    }
}

/// Notifications for renderers, audio and HUD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A tile changed owner
    TileFlipped(TileFlip),
    /// Tile counts after a flip
    ScoreChanged(Score),
    BallActivated { side: Side },
    BallDeactivated { side: Side },
    /// A touch pushed a ball
    ForceApplied { side: Side, force: Vec2 },
    /// The opening impulses were applied
    Launched,
}

/// What a pointer press did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchOutcome {
    /// Nothing selected and no ball under the pointer
    Ignored,
    Activated(Side),
    Deactivated(Side),
    /// The active ball was pushed away from the pointer
    Pushed(Side),
    /// The pointer sat exactly on the active ball's center; no direction
    PushSkipped(Side),
}

/// Complete session state (deterministic, single-threaded)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub arena: Arena,
    pub grid: TileGrid,
    pub score: ScoreTracker,
    /// Light ball then Dark ball
    pub balls: [Ball; 2],
    pub timer: LaunchTimer,
    /// Simulation tick counter
    pub time_ticks: u64,
    force_magnitude: f32,
    light_impulse: Vec2,
    dark_impulse: Vec2,
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl GameState {
    /// Set up a session with default settings for the given field
    pub fn configure(arena_size: Vec2, tile_size: Vec2) -> Result<Self, ConfigError> {
        let settings = Settings {
            arena_width: arena_size.x,
            arena_height: arena_size.y,
            tile_size: tile_size.x,
            ..Default::default()
        };
        if tile_size.x != tile_size.y {
            // Settings only describe square tiles
            let arena = Arena::new(arena_size, tile_size)?;
            settings.check_ball(&arena)?;
            return Ok(Self::with_arena(arena, &settings));
        }
        Self::from_settings(&settings)
    }

    /// Set up a session from settings
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let arena = settings.arena()?;
        Ok(Self::with_arena(arena, settings))
    }

    fn with_arena(arena: Arena, settings: &Settings) -> Self {
        let grid = TileGrid::new(&arena);
        let score = ScoreTracker::new(&grid);

        // Each ball starts against its own outer wall, vertically centred
        let bounds = arena.bounds;
        let r = settings.ball_radius;
        let light = Ball::new(
            Side::Light,
            Vec2::new(bounds.min.x + r, bounds.center().y),
            r,
        );
        let dark = Ball::new(
            Side::Dark,
            Vec2::new(bounds.max.x - r, bounds.center().y),
            r,
        );

        log::info!(
            "Configured arena {}x{}: {} tiles ({} columns per side, {} rows)",
            bounds.width(),
            bounds.height(),
            grid.len(),
            grid.columns_per_side(),
            grid.rows()
        );

        Self {
            arena,
            grid,
            score,
            balls: [light, dark],
            timer: LaunchTimer::Idle,
            time_ticks: 0,
            force_magnitude: settings.force_magnitude,
            light_impulse: Vec2::from(settings.light_impulse),
            dark_impulse: Vec2::from(settings.dark_impulse),
            events: Vec::new(),
        }
    }

    /// Schedule the opening impulses. Only the first call has any effect.
    pub fn start(&mut self, after_delay_secs: f32) -> bool {
        match self.timer {
            LaunchTimer::Idle => {
                self.timer = LaunchTimer::Pending {
                    remaining: after_delay_secs.max(0.0),
                };
                log::info!("Session starts in {after_delay_secs}s");
                true
            }
            _ => {
                log::warn!("start called twice; ignoring");
                false
            }
        }
    }

    /// Apply the opening impulses (timer callback)
    pub(crate) fn launch(&mut self) {
        let light_impulse = self.light_impulse;
        let dark_impulse = self.dark_impulse;
        self.ball_mut(Side::Light).apply_impulse(light_impulse);
        self.ball_mut(Side::Dark).apply_impulse(dark_impulse);
        self.events.push(GameEvent::Launched);
        log::info!(
            "Launched: light speed {:.1}, dark speed {:.1}",
            self.ball(Side::Light).speed(),
            self.ball(Side::Dark).speed()
        );
    }

    #[inline]
    fn slot(side: Side) -> usize {
        match side {
            Side::Light => 0,
            Side::Dark => 1,
        }
    }

    pub fn ball(&self, side: Side) -> &Ball {
        &self.balls[Self::slot(side)]
    }

    pub fn ball_mut(&mut self, side: Side) -> &mut Ball {
        &mut self.balls[Self::slot(side)]
    }

    /// The selected ball, if any
    pub fn active(&self) -> Option<Side> {
        self.balls.iter().find(|b| b.active).map(|b| b.side)
    }

    /// Ball under the pointer. Light wins if both overlap the point.
    pub fn ball_at(&self, point: Vec2) -> Option<Side> {
        self.balls
            .iter()
            .find(|b| b.contains_point(point))
            .map(|b| b.side)
    }

    /// Route a pointer press: select, deselect or push.
    pub fn on_pointer_down(&mut self, point: Vec2) -> TouchOutcome {
        let touched = self.ball_at(point);
        match (self.active(), touched) {
            (Some(_), Some(side)) => self.toggle_activation(side, point),
            (Some(active), None) => self.push(active, point),
            (None, Some(side)) => self.toggle_activation(side, point),
            (None, None) => TouchOutcome::Ignored,
        }
    }

    /// Handle a touch on `touched`.
    ///
    /// With nothing selected the ball becomes active. Touching the active ball
    /// deactivates it. Touching the other ball pushes the active one away
    /// from `point`; the active ball stays selected.
    pub fn toggle_activation(&mut self, touched: Side, point: Vec2) -> TouchOutcome {
        match self.active() {
            None => {
                self.ball_mut(touched).active = true;
                self.events.push(GameEvent::BallActivated { side: touched });
                log::debug!("{} ball activated", touched.as_str());
                TouchOutcome::Activated(touched)
            }
            Some(active) if active == touched => {
                self.ball_mut(touched).active = false;
                self.events.push(GameEvent::BallDeactivated { side: touched });
                log::debug!("{} ball deactivated", touched.as_str());
                TouchOutcome::Deactivated(touched)
            }
            Some(active) => self.push(active, point),
        }
    }

    fn push(&mut self, side: Side, point: Vec2) -> TouchOutcome {
        if self.apply_force(side, point) {
            TouchOutcome::Pushed(side)
        } else {
            TouchOutcome::PushSkipped(side)
        }
    }

    /// Push `side`'s ball directly away from `touch_point`.
    ///
    /// The force has a fixed magnitude and is integrated over the next step.
    /// Returns false (and does nothing) when the point is the ball's center.
    pub fn apply_force(&mut self, side: Side, touch_point: Vec2) -> bool {
        let magnitude = self.force_magnitude;
        let ball = self.ball_mut(side);
        let Some(direction) = normalize_or_none(ball.pos - touch_point) else {
            log::debug!("Force on {} ball skipped: zero-length vector", side.as_str());
            return false;
        };
        let force = direction * magnitude;
        ball.add_force(force);
        self.events.push(GameEvent::ForceApplied { side, force });
        true
    }

    /// Flip a tile and publish the flip and the new score
    pub(crate) fn flip_tile(&mut self, index: usize) {
        if let Some(flip) = self.grid.switch_side(index) {
            let score = self.score.record_flip(&flip);
            log::debug!(
                "Tile {} ({:?} col {} row {}) -> {}; light {} dark {}",
                flip.index,
                flip.home,
                flip.column,
                flip.row,
                flip.side.as_str(),
                score.light,
                score.dark
            );
            self.events.push(GameEvent::TileFlipped(flip));
            self.events.push(GameEvent::ScoreChanged(score));
        }
    }

    pub fn count(&self, side: Side) -> usize {
        self.score.count(side)
    }

    pub fn current_score(&self) -> Score {
        self.score.score()
    }

    pub fn total_tiles(&self) -> usize {
        self.grid.len()
    }

    pub fn ball_views(&self) -> [BallView; 2] {
        self.balls.each_ref().map(|b| BallView {
            side: b.side,
            pos: b.pos,
            radius: b.radius,
            active: b.active,
            color: b.side.ball_color(),
        })
    }

    /// Events raised since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_400() -> GameState {
        GameState::configure(Vec2::new(400.0, 400.0), Vec2::new(40.0, 40.0)).unwrap()
    }

    #[test]
    fn test_configure_scenario() {
        let state = state_400();
        assert_eq!(state.total_tiles(), 100);
        assert_eq!(state.count(Side::Light), 50);
        assert_eq!(state.count(Side::Dark), 50);
        assert_eq!(state.ball(Side::Light).pos, Vec2::new(-200.0 + BALL_RADIUS, 0.0));
        assert_eq!(state.ball(Side::Dark).pos, Vec2::new(200.0 - BALL_RADIUS, 0.0));
        assert_eq!(state.ball(Side::Light).vel, Vec2::ZERO);
        assert_eq!(state.active(), None);
        assert_eq!(state.timer, LaunchTimer::Idle);
    }

    #[test]
    fn test_configure_rejects_bad_arena() {
        assert!(GameState::configure(Vec2::new(400.0, 400.0), Vec2::new(250.0, 250.0)).is_err());
        assert!(GameState::configure(Vec2::new(-1.0, 400.0), Vec2::new(40.0, 40.0)).is_err());
        assert!(GameState::configure(Vec2::new(400.0, 400.0), Vec2::new(40.0, 250.0)).is_err());
    }

    #[test]
    fn test_non_square_tiles() {
        let state = GameState::configure(Vec2::new(400.0, 300.0), Vec2::new(40.0, 30.0)).unwrap();
        assert_eq!(state.grid.columns_per_side(), 5);
        assert_eq!(state.grid.rows(), 10);
    }

    #[test]
    fn test_touch_activates_then_deactivates() {
        let mut state = state_400();
        let light_pos = state.ball(Side::Light).pos;

        assert_eq!(state.on_pointer_down(light_pos), TouchOutcome::Activated(Side::Light));
        assert_eq!(state.active(), Some(Side::Light));
        assert_eq!(state.ball(Side::Light).vel, Vec2::ZERO);
        assert_eq!(state.ball(Side::Light).pending_force, Vec2::ZERO);

        assert_eq!(state.on_pointer_down(light_pos), TouchOutcome::Deactivated(Side::Light));
        assert_eq!(state.active(), None);
    }

    #[test]
    fn test_touch_empty_space_without_selection_is_ignored() {
        let mut state = state_400();
        assert_eq!(state.on_pointer_down(Vec2::new(0.0, 150.0)), TouchOutcome::Ignored);
        assert_eq!(state.active(), None);
        assert!(state.pending_events().is_empty());
    }

    #[test]
    fn test_touch_other_ball_pushes_active() {
        let mut state = state_400();
        let light_pos = state.ball(Side::Light).pos;
        let dark_pos = state.ball(Side::Dark).pos;

        state.on_pointer_down(light_pos);
        assert_eq!(state.on_pointer_down(dark_pos), TouchOutcome::Pushed(Side::Light));
        // Still selected
        assert_eq!(state.active(), Some(Side::Light));
        assert!(!state.ball(Side::Dark).active);

        // Pushed away from the touch point (dark ball is to the right)
        let force = state.ball(Side::Light).pending_force;
        assert!((force.length() - FORCE_MAGNITUDE).abs() < 1e-3);
        assert!(force.x < 0.0);
        assert_eq!(state.ball(Side::Dark).pending_force, Vec2::ZERO);
    }

    #[test]
    fn test_touch_empty_space_pushes_active() {
        let mut state = state_400();
        let light_pos = state.ball(Side::Light).pos;
        state.on_pointer_down(light_pos);
        let outcome = state.on_pointer_down(light_pos + Vec2::new(0.0, -100.0));
        assert_eq!(outcome, TouchOutcome::Pushed(Side::Light));
        let force = state.ball(Side::Light).pending_force;
        assert!(force.y > 0.0);
        assert!(force.x.abs() < 1e-3);
    }

    #[test]
    fn test_apply_force_degenerate_is_noop() {
        let mut state = state_400();
        let pos = state.ball(Side::Dark).pos;
        assert!(!state.apply_force(Side::Dark, pos));
        assert_eq!(state.ball(Side::Dark).pending_force, Vec2::ZERO);
        assert_eq!(state.ball(Side::Dark).vel, Vec2::ZERO);
        assert!(state.pending_events().is_empty());
    }

    #[test]
    fn test_at_most_one_active() {
        let mut state = state_400();
        let light_pos = state.ball(Side::Light).pos;
        let dark_pos = state.ball(Side::Dark).pos;
        let touches = [light_pos, dark_pos, dark_pos, light_pos, dark_pos, light_pos];
        for point in touches {
            state.on_pointer_down(point);
            assert!(state.balls.iter().filter(|b| b.active).count() <= 1);
        }
    }

    #[test]
    fn test_start_only_once() {
        let mut state = state_400();
        assert!(state.start(5.0));
        assert!(!state.start(1.0));
        assert_eq!(state.timer, LaunchTimer::Pending { remaining: 5.0 });
    }

    #[test]
    fn test_launch_timer_fires_once() {
        let mut timer = LaunchTimer::Pending { remaining: 0.02 };
        assert!(!timer.advance(0.01));
        assert!(timer.advance(0.015));
        assert_eq!(timer, LaunchTimer::Fired);
        assert!(!timer.advance(1.0));

        let mut idle = LaunchTimer::Idle;
        assert!(!idle.advance(100.0));
    }

    #[test]
    fn test_impulse_scales_by_mass() {
        let mut ball = Ball::new(Side::Light, Vec2::ZERO, BALL_RADIUS);
        ball.apply_impulse(Vec2::new(8.0, 2.0));
        let expected = Vec2::new(8.0, 2.0) / ball.mass();
        assert!((ball.vel - expected).length() < 1e-3);
    }

    #[test]
    fn test_force_integrates_once() {
        let mut ball = Ball::new(Side::Dark, Vec2::ZERO, BALL_RADIUS);
        ball.add_force(Vec2::new(200.0, 0.0));
        ball.integrate_force(SIM_DT);
        let v = ball.vel;
        assert!(v.x > 0.0);
        ball.integrate_force(SIM_DT);
        assert_eq!(ball.vel, v);
    }

    #[test]
    fn test_ball_views() {
        let mut state = state_400();
        let pos = state.ball(Side::Dark).pos;
        state.on_pointer_down(pos);
        let [light, dark] = state.ball_views();
        assert_eq!(light.side, Side::Light);
        assert!(!light.active);
        assert!(dark.active);
        assert_eq!(dark.color, Side::Light.tile_color());
    }
}
