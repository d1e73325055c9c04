//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. Input queued
//! for the tick is handled first, then the opening timer, then movement and
//! collisions. Nothing is interleaved mid-step.

use glam::Vec2;

use super::collision::{CollisionResult, ball_rect_collision, ball_wall_collision, bounce};
use super::side::Category;
use super::state::GameState;
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer presses since the previous tick, in arrival order
    pub pointer_down: Vec<Vec2>,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    for &point in &input.pointer_down {
        state.on_pointer_down(point);
    }

    state.time_ticks += 1;

    if state.timer.advance(dt) {
        state.launch();
    }

    for ball in &mut state.balls {
        ball.integrate_force(dt);
    }

    // Keep each sub-step's travel under half a radius so tiles are not skipped
    let substeps = state
        .balls
        .iter()
        .map(|b| {
            let travel = b.speed() * dt;
            (travel / (b.radius * 0.5)).ceil() as u32
        })
        .max()
        .unwrap_or(1)
        .clamp(1, MAX_COLLISION_SUBSTEPS);
    let h = dt / substeps as f32;

    for _ in 0..substeps {
        for slot in 0..state.balls.len() {
            step_ball(state, slot, h);
        }
    }
}

/// Surface to bounce off for a set of simultaneous tile contacts.
///
/// Adjacent tiles form one flat surface: when any contact is against a face,
/// corner contacts from neighbouring tiles are ignored. Face normals on both
/// axes (an inside corner) combine. Returns the unit normal and the push-out
/// depth.
fn contact_plane(hits: &[CollisionResult]) -> Option<(Vec2, f32)> {
    let deepest = hits.iter().max_by(|a, b| {
        a.penetration
            .partial_cmp(&b.penetration)
            .unwrap_or(std::cmp::Ordering::Equal)
    })?;

    let faces = hits.iter().filter(|h| h.is_face());
    let (sum, push) = faces.fold((Vec2::ZERO, 0.0f32), |(sum, push), h| {
        (sum + h.normal, push.max(h.penetration))
    });

    match crate::normalize_or_none(sum) {
        Some(normal) => Some((normal, push)),
        None => Some((deepest.normal, deepest.penetration)),
    }
}

/// Move one ball by `h` and resolve its contacts
fn step_ball(state: &mut GameState, slot: usize, h: f32) {
    let flips = {
        let ball = &mut state.balls[slot];
        ball.pos += ball.vel * h;

        // --- TILES ---
        // Only tiles the ball's category collides with take part
        let ball_category = ball.category();
        let reach = ball.radius;
        let mut touching: Vec<usize> = Vec::new();
        let mut flips: Vec<usize> = Vec::new();
        let mut hits: Vec<CollisionResult> = Vec::new();

        for tile in state.grid.iter() {
            if !Category::collides(ball_category, tile.category()) {
                continue;
            }
            let b = &tile.bounds;
            if ball.pos.x + reach < b.min.x
                || ball.pos.x - reach > b.max.x
                || ball.pos.y + reach < b.min.y
                || ball.pos.y - reach > b.max.y
            {
                continue;
            }

            let result = ball_rect_collision(ball.pos, ball.radius, b);
            if result.hit {
                touching.push(tile.index);
                // A contact begins when a tile overlaps now but did not last sub-step
                if ball_category.contact_mask().intersects(tile.category())
                    && !ball.contacts.contains(&tile.index)
                {
                    flips.push(tile.index);
                }
                hits.push(result);
            }
        }
        ball.contacts = touching;

        if let Some((normal, push)) = contact_plane(&hits) {
            ball.pos += normal * push;
            ball.vel = bounce(ball.vel, normal);
        }

        // --- WALLS ---
        // Resolved last so the ball always ends the sub-step inside the arena
        for wall in ball_wall_collision(ball.pos, ball.radius, &state.arena.bounds) {
            if wall.hit {
                ball.pos += wall.normal * wall.penetration;
                ball.vel = bounce(ball.vel, wall.normal);
            }
        }

        flips
    };

    for index in flips {
        state.flip_tile(index);
    }
}
