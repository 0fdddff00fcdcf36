//! Combat resolution primitives
//!
//! Health bookkeeping, knockback, melee hitboxes and the per-swing hit ledger.
//! Entities wrap these with their own gating rules (the player adds an
//! invincibility window on top of [`Vitals::take_damage`]).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use crate::direction_from_angle;

/// Result of a damage attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Target was already dead (or otherwise immune); nothing changed
    Ignored,
    /// Health dropped but the target survived
    Hurt,
    /// This hit took health to zero
    Killed,
}

impl DamageOutcome {
    /// Whether the hit changed the target's state
    #[inline]
    pub fn landed(self) -> bool {
        !matches!(self, DamageOutcome::Ignored)
    }
}

/// Health, life state and the timers tied to them
///
/// Invariant: `0 <= health <= max_health`, and `alive` turns false exactly
/// when health first reaches zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vitals {
    health: f32,
    max_health: f32,
    alive: bool,
    /// Frames since death (drives the fade-out)
    death_timer: u32,
    /// Cosmetic flash after any hit
    hit_flash: u32,
}

impl Vitals {
    pub fn new(max_health: f32) -> Self {
        let max_health = max_health.max(0.0);
        Self {
            health: max_health,
            max_health,
            alive: max_health > 0.0,
            death_timer: 0,
            hit_flash: 0,
        }
    }

    #[inline]
    pub fn health(&self) -> f32 {
        self.health
    }

    #[inline]
    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    #[inline]
    pub fn death_timer(&self) -> u32 {
        self.death_timer
    }

    #[inline]
    pub fn hit_flash(&self) -> u32 {
        self.hit_flash
    }

    /// Health as a fraction of max, for bars
    pub fn fraction(&self) -> f32 {
        if self.max_health > 0.0 {
            self.health / self.max_health
        } else {
            0.0
        }
    }

    /// Apply damage; negative amounts are treated as zero
    pub fn take_damage(&mut self, amount: f32, flash_frames: u32) -> DamageOutcome {
        if !self.alive {
            return DamageOutcome::Ignored;
        }
        let amount = if amount.is_finite() { amount.max(0.0) } else { self.health };
        self.health = (self.health - amount).max(0.0);
        self.hit_flash = flash_frames;
        if self.health <= 0.0 {
            self.kill();
            DamageOutcome::Killed
        } else {
            DamageOutcome::Hurt
        }
    }

    /// Restore health up to max. Dead entities stay dead.
    pub fn heal(&mut self, amount: f32) {
        if !self.alive || !amount.is_finite() {
            return;
        }
        self.health = (self.health + amount.max(0.0)).min(self.max_health);
    }

    /// Instant death that bypasses every immunity (world-depth fail-safe)
    pub fn kill(&mut self) {
        if self.alive {
            self.health = 0.0;
            self.alive = false;
            self.death_timer = 0;
        }
    }

    /// Advance the hit flash and, once dead, the fade timer
    pub fn tick(&mut self) {
        if self.hit_flash > 0 {
            self.hit_flash -= 1;
        }
        if !self.alive {
            self.death_timer = self.death_timer.saturating_add(1);
        }
    }
}

/// Transient velocity impulse that decays each frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Knockback {
    pub vel: Vec2,
}

impl Knockback {
    /// Push `target_center` away from `source` with the given force
    ///
    /// `lift` adds an extra upward bias so hits pop the target off the ground.
    pub fn apply(&mut self, source: Vec2, target_center: Vec2, force: f32, lift: f32) {
        let dir = direction_from_angle(crate::angle_to(source, target_center));
        self.vel = Vec2::new(dir.x * force, dir.y * force - lift);
    }

    /// Current impulse, then decay for the next frame
    pub fn take(&mut self, decay: f32) -> Vec2 {
        let v = self.vel;
        self.vel *= decay;
        v
    }
}

/// A damaging rectangle that exists only during an attack window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    pub rect: Rect,
    pub damage: f32,
}

/// Targets already struck by the current swing
///
/// Cleared when a new swing starts; with [`crate::tuning::MeleeHitPolicy::OncePerSwing`]
/// a target is only damaged if it was not yet recorded.
#[derive(Debug, Clone, Default)]
pub struct HitLedger {
    struck: Vec<usize>,
}

impl HitLedger {
    /// Forget all targets (new swing)
    pub fn reset(&mut self) {
        self.struck.clear();
    }

    /// Record a hit on `target`; returns false if it was already recorded
    pub fn record(&mut self, target: usize) -> bool {
        if self.struck.contains(&target) {
            false
        } else {
            self.struck.push(target);
            true
        }
    }

    pub fn contains(&self, target: usize) -> bool {
        self.struck.contains(&target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_take_damage_kills_at_zero() {
        let mut v = Vitals::new(40.0);
        assert_eq!(v.take_damage(30.0, 10), DamageOutcome::Hurt);
        assert_eq!(v.health(), 10.0);
        assert_eq!(v.hit_flash(), 10);
        assert_eq!(v.take_damage(30.0, 10), DamageOutcome::Killed);
        assert_eq!(v.health(), 0.0);
        assert!(!v.is_alive());
        assert_eq!(v.take_damage(30.0, 10), DamageOutcome::Ignored);
    }

    #[test]
    fn test_heal_clamps_and_ignores_dead() {
        let mut v = Vitals::new(100.0);
        v.take_damage(10.0, 0);
        v.heal(25.0);
        assert_eq!(v.health(), 100.0);

        v.kill();
        v.heal(50.0);
        assert_eq!(v.health(), 0.0);
        assert!(!v.is_alive());
    }

    #[test]
    fn test_death_timer_runs_only_when_dead() {
        let mut v = Vitals::new(10.0);
        v.tick();
        assert_eq!(v.death_timer(), 0);
        v.take_damage(10.0, 10);
        for _ in 0..5 {
            v.tick();
        }
        assert_eq!(v.death_timer(), 5);
        assert_eq!(v.hit_flash(), 5);
    }

    #[test]
    fn test_knockback_points_away_and_decays() {
        let mut kb = Knockback::default();
        kb.apply(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), 5.0, 2.0);
        assert!((kb.vel.x - 5.0).abs() < 1e-5);
        assert!((kb.vel.y + 2.0).abs() < 1e-5);

        let first = kb.take(0.8);
        assert!((first.x - 5.0).abs() < 1e-5);
        assert!((kb.vel.x - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_hit_ledger() {
        let mut ledger = HitLedger::default();
        assert!(ledger.record(3));
        assert!(!ledger.record(3));
        assert!(ledger.record(4));
        ledger.reset();
        assert!(!ledger.contains(3));
        assert!(ledger.record(3));
    }

    proptest! {
        #[test]
        fn prop_health_stays_in_range(hits in proptest::collection::vec(-50.0f32..200.0, 0..40)) {
            let mut v = Vitals::new(100.0);
            let mut was_alive = true;
            for amount in hits {
                let outcome = v.take_damage(amount, 10);
                prop_assert!(v.health() >= 0.0);
                prop_assert!(v.health() <= v.max_health());
                if outcome == DamageOutcome::Killed {
                    prop_assert!(was_alive);
                    prop_assert_eq!(v.health(), 0.0);
                }
                prop_assert_eq!(v.is_alive(), v.health() > 0.0);
                was_alive = v.is_alive();
            }
        }
    }
}
