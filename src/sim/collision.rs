//! Physics integration and platform collision
//!
//! The tricky part of a platformer: pushing a moving box back out of the
//! static level geometry without it sinking, sticking or jittering at rest.
//!
//! Overlaps are resolved one platform at a time, in list order, along the
//! axis of least penetration. Two platforms meeting at a seam are therefore
//! resolved independently within the same frame, which can cause small
//! snags at seams; this matches how the levels were authored and tuned.

use glam::Vec2;

use super::geom::Rect;
use super::level::Platform;
use crate::tuning::PhysicsTuning;

/// Position, velocity and fixed box size of a simulated entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// Multiplicative horizontal friction
#[inline]
pub fn apply_friction(body: &mut Body, friction: f32) {
    body.vel.x *= friction;
}

/// Add one frame of gravity, clamped to terminal velocity
#[inline]
pub fn apply_gravity(body: &mut Body, physics: &PhysicsTuning) {
    body.vel.y = (body.vel.y + physics.gravity).min(physics.max_fall_speed);
}

/// Move by one frame of velocity
#[inline]
pub fn integrate(body: &mut Body) {
    body.pos += body.vel;
}

/// Push `body` out of every platform it overlaps
///
/// Returns true if any platform pushed the body up onto its top surface.
pub fn resolve_platforms(body: &mut Body, platforms: &[Platform]) -> bool {
    let mut on_ground = false;

    for platform in platforms {
        let p = platform.rect;
        let r = body.rect();
        if !r.overlaps(&p) {
            continue;
        }

        let depth = r.overlap_depth(&p);
        let center = r.center();
        let p_center = p.center();

        if depth.y < depth.x {
            if center.y < p_center.y {
                // Landed on top
                body.pos.y = p.y - body.size.y;
                if body.vel.y > 0.0 {
                    body.vel.y = 0.0;
                }
                on_ground = true;
            } else {
                // Bumped the underside
                body.pos.y = p.bottom();
                if body.vel.y < 0.0 {
                    body.vel.y = 0.0;
                }
            }
        } else {
            body.pos.x = if center.x < p_center.x {
                p.x - body.size.x
            } else {
                p.right()
            };
            body.vel.x = 0.0;
        }
    }

    on_ground
}

/// Standard step for a body without extra forces: friction, gravity,
/// integration and collision. Returns whether the body ended up grounded.
pub fn step_body(
    body: &mut Body,
    friction: f32,
    platforms: &[Platform],
    physics: &PhysicsTuning,
) -> bool {
    apply_friction(body, friction);
    apply_gravity(body, physics);
    integrate(body);
    resolve_platforms(body, platforms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::PlatformStyle;

    fn floor() -> Vec<Platform> {
        vec![Platform::new(Rect::new(0.0, 100.0, 400.0, 50.0), PlatformStyle::Stone)]
    }

    #[test]
    fn test_gravity_clamps_to_terminal_velocity() {
        let physics = PhysicsTuning::default();
        let mut body = Body::new(Vec2::ZERO, Vec2::new(10.0, 10.0));
        for _ in 0..100 {
            apply_gravity(&mut body, &physics);
        }
        assert_eq!(body.vel.y, physics.max_fall_speed);
    }

    #[test]
    fn test_lands_on_platform_top() {
        let physics = PhysicsTuning::default();
        let platforms = floor();
        let mut body = Body::new(Vec2::new(50.0, 55.0), Vec2::new(24.0, 40.0));
        body.vel.y = 10.0;

        let grounded = step_body(&mut body, 0.85, &platforms, &physics);
        assert!(grounded);
        assert_eq!(body.pos.y, 60.0);
        assert_eq!(body.vel.y, 0.0);
    }

    #[test]
    fn test_resting_body_is_stable() {
        let physics = PhysicsTuning::default();
        let platforms = floor();
        let mut body = Body::new(Vec2::new(50.0, 60.0), Vec2::new(24.0, 40.0));

        for _ in 0..120 {
            let grounded = step_body(&mut body, 0.85, &platforms, &physics);
            assert!(grounded);
            assert!((body.pos.y - 60.0).abs() < 1e-4);
            assert_eq!(body.pos.x, 50.0);
        }
    }

    #[test]
    fn test_head_bump_only_cancels_upward_velocity() {
        let platforms = vec![Platform::new(Rect::new(0.0, 0.0, 400.0, 20.0), PlatformStyle::Wood)];
        let mut body = Body::new(Vec2::new(50.0, 18.0), Vec2::new(24.0, 40.0));
        body.vel.y = -5.0;
        assert!(!resolve_platforms(&mut body, &platforms));
        assert_eq!(body.pos.y, 20.0);
        assert_eq!(body.vel.y, 0.0);

        let mut falling = Body::new(Vec2::new(50.0, 18.0), Vec2::new(24.0, 40.0));
        falling.vel.y = 3.0;
        resolve_platforms(&mut falling, &platforms);
        assert_eq!(falling.vel.y, 3.0);
    }

    #[test]
    fn test_wall_pushes_to_near_side() {
        let wall = vec![Platform::new(Rect::new(100.0, 0.0, 50.0, 300.0), PlatformStyle::Fortress)];

        let mut from_left = Body::new(Vec2::new(80.0, 100.0), Vec2::new(24.0, 40.0));
        from_left.vel.x = 4.0;
        resolve_platforms(&mut from_left, &wall);
        assert_eq!(from_left.pos.x, 76.0);
        assert_eq!(from_left.vel.x, 0.0);

        let mut from_right = Body::new(Vec2::new(145.0, 100.0), Vec2::new(24.0, 40.0));
        from_right.vel.x = -4.0;
        resolve_platforms(&mut from_right, &wall);
        assert_eq!(from_right.pos.x, 150.0);
        assert_eq!(from_right.vel.x, 0.0);
    }

    #[test]
    fn test_no_overlap_no_change() {
        let platforms = floor();
        let mut body = Body::new(Vec2::new(50.0, 0.0), Vec2::new(24.0, 40.0));
        body.vel = Vec2::new(1.0, 1.0);
        let before = body;
        assert!(!resolve_platforms(&mut body, &platforms));
        assert_eq!(body, before);
    }
}
