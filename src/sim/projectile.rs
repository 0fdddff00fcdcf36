//! Projectiles
//!
//! Owned by whoever fired them. A projectile advances once per frame and is
//! dropped when its lifetime runs out or when it hits something, whichever
//! comes first.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectileKind {
    Arrow,
    MagicBolt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub kind: ProjectileKind,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Frames left before it expires
    pub lifetime: u32,
    pub damage: f32,
    /// Added to `vel.y` every frame; zero for gravity-free bolts
    pub gravity: f32,
}

impl Projectile {
    /// A projectile launched from `origin` along `angle` (radians)
    pub fn launch(
        kind: ProjectileKind,
        origin: Vec2,
        angle: f32,
        speed: f32,
        lifetime: u32,
        damage: f32,
        gravity: f32,
    ) -> Self {
        Self {
            kind,
            pos: origin,
            vel: crate::direction_from_angle(angle) * speed,
            lifetime,
            damage,
            gravity,
        }
    }

    #[inline]
    pub fn affected_by_gravity(&self) -> bool {
        self.gravity != 0.0
    }

    /// Heading in radians, for drawing
    pub fn heading(&self) -> f32 {
        self.vel.y.atan2(self.vel.x)
    }

    /// Advance one frame. Returns false once the projectile has expired.
    pub fn advance(&mut self) -> bool {
        self.pos += self.vel;
        if self.affected_by_gravity() {
            self.vel.y += self.gravity;
        }
        self.lifetime = self.lifetime.saturating_sub(1);
        self.lifetime > 0
    }

    /// Point-sampled hit test against a target box
    #[inline]
    pub fn hits(&self, target: &Rect) -> bool {
        target.contains_point(self.pos)
    }
}

/// Advance every projectile and drop the expired ones
pub fn advance_all(projectiles: &mut Vec<Projectile>) {
    projectiles.retain_mut(Projectile::advance);
}

/// Remove and return the first projectile that hits `target`, if any
///
/// Remaining projectiles keep their order.
pub fn take_first_hit(projectiles: &mut Vec<Projectile>, target: &Rect) -> Option<Projectile> {
    let idx = projectiles.iter().position(|p| p.hits(target))?;
    Some(projectiles.remove(idx))
}
