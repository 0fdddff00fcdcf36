//! Swordcery - simulation core for a 2D side-scrolling action platformer
//!
//! Core modules:
//! - `sim`: Fixed-step simulation (physics, combat, entity state machines, level session)
//! - `progression`: Level scoring, ranks and sequential unlocks
//! - `persistence`: Progress storage backends
//! - `tuning`: Data-driven game balance
//!
//! Rendering, audio, menus and level authoring live outside this crate; they
//! consume [`sim::FrameSnapshot`] and [`sim::GameEvent`] and feed
//! [`sim::FrameInput`] back in.

pub mod error;
pub mod persistence;
pub mod progression;
pub mod sim;
pub mod tuning;

pub use error::{ContentError, StorageError};
pub use progression::{LevelResult, Progress, Rank};
pub use tuning::Tuning;

use glam::Vec2;
use rand::Rng;

/// Game configuration constants
pub mod consts {
    /// Simulation rate the frame-based constants are tuned for
    pub const FRAMES_PER_SECOND: u32 = 60;

    /// Number of hand-authored levels
    pub const LEVEL_COUNT: usize = 8;

    /// Anything below this depth is treated as having fallen out of the level
    pub const WORLD_DEPTH_LIMIT: f32 = 2000.0;

    /// Player centre within this distance of the exit point completes the level
    pub const EXIT_RADIUS: f32 = 50.0;

    /// Frames the player's death fade runs before the session is defeated
    pub const DEFEAT_FADE_FRAMES: u32 = 90;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Angle (radians) of the vector pointing from `from` to `to`
#[inline]
pub fn angle_to(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Unit vector for an angle in radians
#[inline]
pub fn direction_from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Uniform random float in `[min, max)`; returns `min` for an empty range
pub fn random_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    rng.random_range(min..max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
        assert_eq!(lerp(4.0, 8.0, 0.0), 4.0);
        assert_eq!(lerp(4.0, 8.0, 1.0), 8.0);
    }

    #[test]
    fn test_angle_to_and_back() {
        let from = Vec2::new(10.0, 10.0);
        let to = Vec2::new(10.0, 30.0);
        let angle = angle_to(from, to);
        assert!((angle - std::f32::consts::FRAC_PI_2).abs() < 1e-6);

        let dir = direction_from_angle(angle);
        assert!(dir.x.abs() < 1e-6);
        assert!((dir.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_random_range_bounds() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            let v = random_range(&mut rng, -2.0, 3.0);
            assert!((-2.0..3.0).contains(&v));
        }
        assert_eq!(random_range(&mut rng, 5.0, 5.0), 5.0);
    }
}
