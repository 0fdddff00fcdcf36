//! Enemies
//!
//! Every archetype is a row in a static parameter table: box size, stats,
//! aggro radius and an engagement policy (when to close in, when to back
//! off, how to attack). One [`Enemy::update`] drives them all.
//!
//! Aggro is not latched. It is recomputed every frame from the distance to
//! the player, so an enemy standing on its aggro radius may flicker between
//! patrolling and engaging.

use std::str::FromStr;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{self, Body};
use super::combat::{DamageOutcome, Hitbox, Vitals};
use super::geom::Rect;
use super::level::Platform;
use super::player::Player;
use super::projectile::{self, Projectile, ProjectileKind};
use crate::consts::WORLD_DEPTH_LIMIT;
use crate::error::ContentError;
use crate::tuning::Tuning;

/// Frames between patrol direction changes
pub const PATROL_INTERVAL: u32 = 120;
/// Patrol walks at this fraction of the archetype's speed
pub const PATROL_SPEED_FACTOR: f32 = 0.5;

pub const ENEMY_ARROW_SPEED: f32 = 5.0;
pub const ENEMY_ARROW_LIFETIME: u32 = 90;
pub const ENEMY_ARROW_GRAVITY: f32 = 0.1;
pub const MAGIC_BOLT_LIFETIME: u32 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    Skeleton,
    SkeletonArcher,
    Witch,
    Troll,
    BossNecromancer,
}

impl Archetype {
    pub const ALL: [Archetype; 5] = [
        Archetype::Skeleton,
        Archetype::SkeletonArcher,
        Archetype::Witch,
        Archetype::Troll,
        Archetype::BossNecromancer,
    ];

    #[inline]
    pub fn params(self) -> &'static EnemyParams {
        &ENEMY_TABLE[self as usize]
    }

    pub fn as_str(self) -> &'static str {
        self.params().name
    }

    pub fn is_boss(self) -> bool {
        self == Archetype::BossNecromancer
    }
}

impl FromStr for Archetype {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Archetype::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| ContentError::UnknownArchetype(s.to_string()))
    }
}

/// How an aggroed enemy attacks
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttackStyle {
    /// Open a melee hitbox of `reach` in front when the player is within `trigger`
    Melee { trigger: f32, reach: f32, frames: u32 },
    /// Single gravity-affected arrow when the player is within `max_range`
    Arrow { max_range: f32 },
    /// Single gravity-free bolt whenever the cooldown is ready
    Magic { speed: f32 },
    /// Like `Magic`, but with `chance` to fire a three-bolt fan `offset` radians wide
    MagicSpread { speed: f32, chance: f64, offset: f32 },
}

/// Back off when the player gets closer than `within`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Retreat {
    pub within: f32,
    pub speed_factor: f32,
}

/// Fixed per-archetype parameters
#[derive(Debug, Clone, Copy)]
pub struct EnemyParams {
    pub name: &'static str,
    pub size: Vec2,
    pub max_health: f32,
    pub damage: f32,
    pub speed: f32,
    pub score_value: u32,
    pub aggro_radius: f32,
    /// Frames between attacks
    pub cooldown: u32,
    /// Walk toward the player while farther than this
    pub approach_beyond: f32,
    pub retreat: Option<Retreat>,
    pub attack: AttackStyle,
}

// Indexed by `Archetype as usize`
static ENEMY_TABLE: [EnemyParams; 5] = [
    EnemyParams {
        name: "skeleton",
        size: Vec2::new(20.0, 36.0),
        max_health: 40.0,
        damage: 10.0,
        speed: 1.2,
        score_value: 100,
        aggro_radius: 200.0,
        cooldown: 60,
        approach_beyond: 40.0,
        retreat: None,
        attack: AttackStyle::Melee { trigger: 50.0, reach: 30.0, frames: 20 },
    },
    EnemyParams {
        name: "skeleton_archer",
        size: Vec2::new(20.0, 36.0),
        max_health: 30.0,
        damage: 12.0,
        speed: 0.8,
        score_value: 150,
        aggro_radius: 350.0,
        cooldown: 90,
        approach_beyond: 200.0,
        retreat: Some(Retreat { within: 100.0, speed_factor: 1.0 }),
        attack: AttackStyle::Arrow { max_range: 350.0 },
    },
    EnemyParams {
        name: "witch",
        size: Vec2::new(22.0, 38.0),
        max_health: 60.0,
        damage: 18.0,
        speed: 1.5,
        score_value: 250,
        aggro_radius: 300.0,
        cooldown: 70,
        approach_beyond: 150.0,
        retreat: Some(Retreat { within: 100.0, speed_factor: 0.5 }),
        attack: AttackStyle::Magic { speed: 3.0 },
    },
    EnemyParams {
        name: "troll",
        size: Vec2::new(36.0, 50.0),
        max_health: 120.0,
        damage: 25.0,
        speed: 0.7,
        score_value: 400,
        aggro_radius: 180.0,
        cooldown: 80,
        approach_beyond: 50.0,
        retreat: None,
        attack: AttackStyle::Melee { trigger: 60.0, reach: 50.0, frames: 24 },
    },
    EnemyParams {
        name: "boss_necromancer",
        size: Vec2::new(30.0, 48.0),
        max_health: 300.0,
        damage: 30.0,
        speed: 1.0,
        score_value: 1000,
        aggro_radius: 400.0,
        cooldown: 50,
        approach_beyond: 200.0,
        retreat: None,
        attack: AttackStyle::MagicSpread { speed: 4.0, chance: 0.4, offset: 0.3 },
    },
];

/// What an enemy can see of the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    /// Top-left corner; aggro distance is measured between corners
    pub pos: Vec2,
    pub center: Vec2,
    pub alive: bool,
}

impl Target {
    pub fn of(player: &Player) -> Self {
        Self {
            pos: player.body.pos,
            center: player.center(),
            alive: player.is_alive(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub archetype: Archetype,
    pub body: Body,
    pub vitals: Vitals,
    pub facing: f32,
    /// Whether the enemy engaged the player this frame
    pub aggroed: bool,
    patrol_dir: f32,
    patrol_timer: u32,
    attack_cooldown: u32,
    /// Frames into the current melee attack
    attack_frame: Option<u32>,
    pub projectiles: Vec<Projectile>,
}

impl Enemy {
    pub fn spawn(archetype: Archetype, pos: Vec2) -> Self {
        let params = archetype.params();
        Self {
            archetype,
            body: Body::new(pos, params.size),
            vitals: Vitals::new(params.max_health),
            facing: -1.0,
            aggroed: false,
            patrol_dir: 1.0,
            patrol_timer: 0,
            attack_cooldown: 0,
            attack_frame: None,
            projectiles: Vec::new(),
        }
    }

    #[inline]
    pub fn params(&self) -> &'static EnemyParams {
        self.archetype.params()
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.vitals.is_alive()
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.body.center()
    }

    pub fn is_attacking(&self) -> bool {
        self.attack_frame.is_some()
    }

    pub fn attack_frame(&self) -> Option<u32> {
        self.attack_frame
    }

    pub fn attack_cooldown(&self) -> u32 {
        self.attack_cooldown
    }

    /// Dead and done fading; nothing left to draw
    pub fn is_faded(&self, tuning: &Tuning) -> bool {
        !self.is_alive() && self.vitals.death_timer() >= tuning.combat.enemy_fade_frames
    }

    /// Advance one frame of AI and physics
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        target: &Target,
        platforms: &[Platform],
        tuning: &Tuning,
        rng: &mut R,
    ) {
        self.vitals.tick();
        if !self.is_alive() {
            return;
        }
        if self.attack_cooldown > 0 {
            self.attack_cooldown -= 1;
        }

        let delta = target.pos - self.body.pos;
        let distance = delta.length();
        self.aggroed = target.alive && distance < self.params().aggro_radius;

        if self.aggroed {
            self.facing = if delta.x > 0.0 { 1.0 } else { -1.0 };
            self.engage(distance, target, rng);
        } else {
            self.patrol();
        }

        let attack_frames = match self.params().attack {
            AttackStyle::Melee { frames, .. } => frames,
            _ => 0,
        };
        if let Some(frame) = self.attack_frame.as_mut() {
            *frame += 1;
            if *frame >= attack_frames {
                self.attack_frame = None;
            }
        }

        collision::step_body(
            &mut self.body,
            tuning.physics.enemy_friction,
            platforms,
            &tuning.physics,
        );

        projectile::advance_all(&mut self.projectiles);

        if self.body.pos.y > WORLD_DEPTH_LIMIT {
            log::debug!("{} fell out of the world", self.archetype.as_str());
            self.vitals.kill();
        }
    }

    fn patrol(&mut self) {
        self.patrol_timer += 1;
        if self.patrol_timer > PATROL_INTERVAL {
            self.patrol_dir = -self.patrol_dir;
            self.patrol_timer = 0;
        }
        self.body.vel.x = self.patrol_dir * self.params().speed * PATROL_SPEED_FACTOR;
        self.facing = self.patrol_dir;
    }

    fn engage<R: Rng + ?Sized>(&mut self, distance: f32, target: &Target, rng: &mut R) {
        let params = self.params();

        if distance > params.approach_beyond {
            self.body.vel.x = self.facing * params.speed;
        } else if let Some(retreat) = params.retreat
            && distance < retreat.within
        {
            self.body.vel.x = -self.facing * params.speed * retreat.speed_factor;
        }

        if self.attack_cooldown > 0 {
            return;
        }
        let fired = match params.attack {
            AttackStyle::Melee { trigger, .. } => {
                let in_range = distance < trigger;
                if in_range {
                    self.attack_frame = Some(0);
                }
                in_range
            }
            AttackStyle::Arrow { max_range } => {
                let in_range = distance < max_range;
                if in_range {
                    self.shoot(ProjectileKind::Arrow, target.center, 0.0, ENEMY_ARROW_SPEED);
                }
                in_range
            }
            AttackStyle::Magic { speed } => {
                self.shoot(ProjectileKind::MagicBolt, target.center, 0.0, speed);
                true
            }
            AttackStyle::MagicSpread { speed, chance, offset } => {
                self.shoot(ProjectileKind::MagicBolt, target.center, 0.0, speed);
                if rng.random_bool(chance) {
                    self.shoot(ProjectileKind::MagicBolt, target.center, -offset, speed);
                    self.shoot(ProjectileKind::MagicBolt, target.center, offset, speed);
                }
                true
            }
        };
        if fired {
            self.attack_cooldown = params.cooldown;
        }
    }

    fn shoot(&mut self, kind: ProjectileKind, aim: Vec2, angle_offset: f32, speed: f32) {
        let params = self.params();
        let angle = crate::angle_to(self.center(), aim) + angle_offset;
        let origin = Vec2::new(
            self.body.pos.x + self.body.size.x / 2.0,
            self.body.pos.y + self.body.size.y / 3.0,
        );
        let (lifetime, gravity) = match kind {
            ProjectileKind::Arrow => (ENEMY_ARROW_LIFETIME, ENEMY_ARROW_GRAVITY),
            ProjectileKind::MagicBolt => (MAGIC_BOLT_LIFETIME, 0.0),
        };
        self.projectiles.push(Projectile::launch(
            kind,
            origin,
            angle,
            speed,
            lifetime,
            params.damage,
            gravity,
        ));
    }

    /// Melee hitbox while a melee attack is running
    pub fn attack_hitbox(&self) -> Option<Hitbox> {
        self.attack_frame?;
        let params = self.params();
        let AttackStyle::Melee { reach, .. } = params.attack else {
            return None;
        };
        let x = if self.facing > 0.0 {
            self.body.pos.x + self.body.size.x
        } else {
            self.body.pos.x - reach
        };
        Some(Hitbox {
            rect: Rect::new(x, self.body.pos.y, reach, self.body.size.y),
            damage: params.damage,
        })
    }

    pub fn take_damage(&mut self, amount: f32, tuning: &Tuning) -> DamageOutcome {
        self.vitals
            .take_damage(amount, tuning.combat.hit_flash_frames)
    }
}
