//! Collision detection and response for circles against rectangles
//!
//! Balls bounce inside the arena box and off the tiles they are allowed to
//! touch. All responses are pure reflections, so speed is preserved.

use glam::Vec2;

use super::arena::Rect;
use crate::consts::RESTITUTION;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Contact point on the surface (if hit)
    pub point: Vec2,
    /// Surface normal at contact (pointing toward ball center, for reflection)
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }

    /// Contact against a flat face rather than a corner of the rectangle
    #[inline]
    pub fn is_face(&self) -> bool {
        self.normal.x == 0.0 || self.normal.y == 0.0
    }
}

/// Reflect velocity off a surface
///
/// v' = v - (1 + e)(v·n)n, with `normal` unit length and e the restitution.
/// With e = 1 this is a mirror reflection.
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - (1.0 + RESTITUTION) * velocity.dot(normal) * normal
}

/// Reflect only if the ball is moving into the surface
#[inline]
pub fn bounce(velocity: Vec2, normal: Vec2) -> Vec2 {
    if velocity.dot(normal) < 0.0 {
        reflect_velocity(velocity, normal)
    } else {
        velocity
    }
}

/// Check a ball against the inside of the arena box.
///
/// Returns one result per axis (`[x, y]`) so a corner hit reflects both
/// components independently.
pub fn ball_wall_collision(ball_pos: Vec2, ball_radius: f32, bounds: &Rect) -> [CollisionResult; 2] {
    let mut results = [CollisionResult::miss(), CollisionResult::miss()];

    for axis in 0..2 {
        let p = ball_pos[axis];
        let min = bounds.min[axis];
        let max = bounds.max[axis];

        let (normal, penetration, surface) = if p - ball_radius < min {
            (-1.0, min - (p - ball_radius), min)
        } else if p + ball_radius > max {
            (1.0, p + ball_radius - max, max)
        } else {
            continue;
        };

        let mut n = Vec2::ZERO;
        // Wall normals point back into the arena
        n[axis] = -normal;
        let mut point = ball_pos;
        point[axis] = surface;

        results[axis] = CollisionResult {
            hit: true,
            point,
            normal: n,
            penetration,
        };
    }

    results
}

/// Check a ball against a solid rectangle.
///
/// Touching counts as contact. If the center has entered the rectangle the
/// normal points out through the nearest face.
pub fn ball_rect_collision(ball_pos: Vec2, ball_radius: f32, rect: &Rect) -> CollisionResult {
    let closest = rect.closest_point(ball_pos);
    let offset = ball_pos - closest;
    let dist_sq = offset.length_squared();

    if dist_sq > ball_radius * ball_radius {
        return CollisionResult::miss();
    }

    if dist_sq > 0.0 {
        let dist = dist_sq.sqrt();
        return CollisionResult {
            hit: true,
            point: closest,
            normal: offset / dist,
            penetration: ball_radius - dist,
        };
    }

    // Center is inside (or on the edge of) the rectangle
    let faces = [
        (ball_pos.x - rect.min.x, Vec2::NEG_X),
        (rect.max.x - ball_pos.x, Vec2::X),
        (ball_pos.y - rect.min.y, Vec2::NEG_Y),
        (rect.max.y - ball_pos.y, Vec2::Y),
    ];
    let (depth, normal) = faces
        .into_iter()
        .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
        .unwrap_or((0.0, Vec2::Y));

    CollisionResult {
        hit: true,
        point: ball_pos + normal * depth,
        normal,
        penetration: depth + ball_radius,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Rect {
        Rect::from_center_size(Vec2::ZERO, Vec2::new(400.0, 400.0))
    }

    #[test]
    fn test_reflect_velocity() {
        // Ball moving right, hits vertical wall (normal pointing left)
        let velocity = Vec2::new(5.0, 0.0);
        let normal = Vec2::new(-1.0, 0.0);

        let reflected = reflect_velocity(velocity, normal);
        assert!((reflected.x - (-5.0)).abs() < 0.001);
        assert!(reflected.y.abs() < 0.001);
    }

    #[test]
    fn test_reflect_preserves_speed() {
        let velocity = Vec2::new(3.0, -7.0);
        let normal = Vec2::new(1.0, 1.0).normalize();
        let reflected = reflect_velocity(velocity, normal);
        assert!((reflected.length() - velocity.length()).abs() < 1e-5);
    }

    #[test]
    fn test_bounce_ignores_separating_motion() {
        let velocity = Vec2::new(-5.0, 0.0);
        assert_eq!(bounce(velocity, Vec2::new(-1.0, 0.0)), velocity);
        assert_eq!(bounce(-velocity, Vec2::new(-1.0, 0.0)), velocity);
    }

    #[test]
    fn test_wall_collision_right() {
        let [x, y] = ball_wall_collision(Vec2::new(195.0, 0.0), 8.0, &bounds());
        assert!(x.hit);
        assert!(!y.hit);
        assert_eq!(x.normal, Vec2::new(-1.0, 0.0));
        assert!((x.penetration - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_wall_collision_corner() {
        let [x, y] = ball_wall_collision(Vec2::new(-196.0, -197.0), 8.0, &bounds());
        assert!(x.hit && y.hit);
        assert_eq!(x.normal, Vec2::X);
        assert_eq!(y.normal, Vec2::Y);
    }

    #[test]
    fn test_wall_collision_inside() {
        let [x, y] = ball_wall_collision(Vec2::new(100.0, 50.0), 8.0, &bounds());
        assert!(!x.hit && !y.hit);
    }

    #[test]
    fn test_rect_collision_from_above() {
        let tile = Rect::from_center_size(Vec2::ZERO, Vec2::new(40.0, 40.0));
        let result = ball_rect_collision(Vec2::new(0.0, 28.0), 10.0, &tile);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::Y);
        assert!((result.penetration - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_rect_collision_touching_counts() {
        let tile = Rect::from_center_size(Vec2::ZERO, Vec2::new(40.0, 40.0));
        assert!(ball_rect_collision(Vec2::new(0.0, 30.0), 10.0, &tile).hit);
        assert!(!ball_rect_collision(Vec2::new(0.0, 30.5), 10.0, &tile).hit);
    }

    #[test]
    fn test_rect_collision_corner_normal() {
        let tile = Rect::from_center_size(Vec2::ZERO, Vec2::new(40.0, 40.0));
        let result = ball_rect_collision(Vec2::new(24.0, 24.0), 10.0, &tile);
        assert!(result.hit);
        let expected = Vec2::new(1.0, 1.0).normalize();
        assert!((result.normal - expected).length() < 1e-5);
    }

    #[test]
    fn test_face_and_corner_contacts() {
        let tile = Rect::from_center_size(Vec2::ZERO, Vec2::new(40.0, 40.0));
        assert!(ball_rect_collision(Vec2::new(-28.0, 5.0), 10.0, &tile).is_face());
        // Exactly level with the edge still counts as the face
        assert!(ball_rect_collision(Vec2::new(-28.0, 20.0), 10.0, &tile).is_face());
        assert!(!ball_rect_collision(Vec2::new(-26.0, 23.0), 10.0, &tile).is_face());
    }

    #[test]
    fn test_rect_collision_center_inside() {
        let tile = Rect::from_center_size(Vec2::ZERO, Vec2::new(40.0, 40.0));
        let result = ball_rect_collision(Vec2::new(-17.0, 2.0), 10.0, &tile);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::NEG_X);
        assert!((result.penetration - 13.0).abs() < 1e-5);
    }
}
