//! Data-driven game balance
//!
//! All frame-based gameplay numbers live here so a balance pass never touches
//! simulation code. Every section is `#[serde(default)]`, so a tuning file
//! only needs the values it overrides.

use serde::{Deserialize, Serialize};

use crate::error::ContentError;

/// How often a single melee swing may damage the same enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeleeHitPolicy {
    /// At most one damage event per enemy per swing
    #[default]
    OncePerSwing,
    /// Damage on every frame the hitbox overlaps (chip damage across the swing)
    EveryFrame,
}

/// World physics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Downward acceleration per frame
    pub gravity: f32,
    /// Terminal falling speed
    pub max_fall_speed: f32,
    /// Horizontal velocity multiplier per frame for the player
    pub player_friction: f32,
    /// Horizontal velocity multiplier per frame for enemies
    pub enemy_friction: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: 0.6,
            max_fall_speed: 14.0,
            player_friction: 0.85,
            enemy_friction: 0.8,
        }
    }
}

/// Player movement and stats
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub width: f32,
    pub height: f32,
    pub walk_speed: f32,
    pub sprint_speed: f32,
    /// Fraction of the target speed added per frame of held input
    pub acceleration: f32,
    /// Vertical velocity set by a grounded jump (negative is up)
    pub jump_impulse: f32,
    /// Multiplier on the jump impulse for the air jump
    pub double_jump_factor: f32,
    pub max_health: f32,
    pub max_stamina: f32,
    pub stamina_regen: f32,
    pub sprint_drain: f32,
    pub attack_stamina_cost: f32,
    /// Frames an attack animation lasts
    pub attack_duration: u32,
    pub invincibility_frames: u32,
    /// Knockback velocity multiplier per frame
    pub knockback_decay: f32,
    /// Extra upward bias added to every knockback
    pub knockback_lift: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            width: 24.0,
            height: 40.0,
            walk_speed: 3.5,
            sprint_speed: 5.5,
            acceleration: 0.3,
            jump_impulse: -22.0,
            double_jump_factor: 0.85,
            max_health: 100.0,
            max_stamina: 100.0,
            stamina_regen: 0.3,
            sprint_drain: 0.5,
            attack_stamina_cost: 20.0,
            attack_duration: 15,
            invincibility_frames: 60,
            knockback_decay: 0.8,
            knockback_lift: 2.0,
        }
    }
}

/// Sword stats
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SwordTuning {
    pub damage: f32,
    pub cooldown: u32,
    /// Hitbox width at the start of the swing
    pub base_width: f32,
    pub height: f32,
    /// Extra width gained linearly over the swing
    pub reach: f32,
    /// Hitbox offset below the player's top edge
    pub y_offset: f32,
}

impl Default for SwordTuning {
    fn default() -> Self {
        Self {
            damage: 30.0,
            cooldown: 25,
            base_width: 30.0,
            height: 30.0,
            reach: 35.0,
            y_offset: 5.0,
        }
    }
}

/// Bow stats
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BowTuning {
    pub damage: f32,
    pub cooldown: u32,
    pub arrow_speed: f32,
    pub arrow_lifetime: u32,
    pub arrow_gravity: f32,
}

impl Default for BowTuning {
    fn default() -> Self {
        Self {
            damage: 20.0,
            cooldown: 35,
            arrow_speed: 10.0,
            arrow_lifetime: 120,
            arrow_gravity: 0.15,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponTuning {
    pub sword: SwordTuning,
    pub bow: BowTuning,
}

/// Damage exchange rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    pub melee_knockback: f32,
    pub contact_knockback: f32,
    pub projectile_knockback: f32,
    /// Fraction of an enemy's base damage dealt by touching it
    pub contact_damage_factor: f32,
    pub hit_flash_frames: u32,
    /// Frames a dead enemy keeps fading before going inert
    pub enemy_fade_frames: u32,
    pub melee_hits: MeleeHitPolicy,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            melee_knockback: 5.0,
            contact_knockback: 4.0,
            projectile_knockback: 3.0,
            contact_damage_factor: 0.5,
            hit_flash_frames: 10,
            enemy_fade_frames: 30,
            melee_hits: MeleeHitPolicy::OncePerSwing,
        }
    }
}

/// Complete balance table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub physics: PhysicsTuning,
    pub player: PlayerTuning,
    pub weapons: WeaponTuning,
    pub combat: CombatTuning,
}

impl Tuning {
    /// Parse a (possibly partial) tuning file
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        log::info!(
            "Loaded tuning (gravity {}, melee hits {:?})",
            tuning.physics.gravity,
            tuning.combat.melee_hits
        );
        Ok(tuning)
    }

    /// Frames between the last attack and the next for a weapon
    pub fn cooldown_for(&self, weapon: crate::sim::Weapon) -> u32 {
        match weapon {
            crate::sim::Weapon::Sword => self.weapons.sword.cooldown,
            crate::sim::Weapon::Bow => self.weapons.bow.cooldown,
        }
    }
}
