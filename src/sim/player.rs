//! The player character
//!
//! Movement, jumping, stamina, weapon selection and attacks. Input arrives as
//! an edge-detected [`FrameInput`]; the player never latches key state itself.

use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{self, Body};
use super::combat::{DamageOutcome, HitLedger, Hitbox, Knockback, Vitals};
use super::geom::Rect;
use super::input::{FrameInput, Keys};
use super::level::Platform;
use super::projectile::{self, Projectile, ProjectileKind};
use crate::consts::WORLD_DEPTH_LIMIT;
use crate::error::ContentError;
use crate::tuning::Tuning;

/// Selected weapon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weapon {
    /// Melee
    #[default]
    Sword,
    /// Ranged
    Bow,
}

impl Weapon {
    pub fn toggled(self) -> Self {
        match self {
            Weapon::Sword => Weapon::Bow,
            Weapon::Bow => Weapon::Sword,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Weapon::Sword => "sword",
            Weapon::Bow => "bow",
        }
    }
}

impl FromStr for Weapon {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sword" | "melee" => Ok(Weapon::Sword),
            "bow" | "ranged" => Ok(Weapon::Bow),
            other => Err(ContentError::UnknownWeapon(other.to_string())),
        }
    }
}

/// An attack in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attack {
    /// Weapon the attack was started with; switching mid-swing does not change it
    pub weapon: Weapon,
    /// Frames since the attack started
    pub frame: u32,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    /// -1 (left) or +1 (right)
    pub facing: f32,
    pub vitals: Vitals,
    stamina: f32,
    max_stamina: f32,
    pub weapon: Weapon,
    pub on_ground: bool,
    has_double_jumped: bool,
    /// Whether sprint drained stamina this frame
    sprinting: bool,
    attack_cooldown: u32,
    attack: Option<Attack>,
    invincible: u32,
    knockback: Knockback,
    /// Arrows in flight
    pub arrows: Vec<Projectile>,
    /// Enemies struck by the current swing
    pub swing_hits: HitLedger,
}

impl Player {
    pub fn new(spawn: Vec2, weapon: Weapon, tuning: &Tuning) -> Self {
        let t = &tuning.player;
        Self {
            body: Body::new(spawn, Vec2::new(t.width, t.height)),
            facing: 1.0,
            vitals: Vitals::new(t.max_health),
            stamina: t.max_stamina,
            max_stamina: t.max_stamina,
            weapon,
            on_ground: false,
            has_double_jumped: false,
            sprinting: false,
            attack_cooldown: 0,
            attack: None,
            invincible: 0,
            knockback: Knockback::default(),
            arrows: Vec::new(),
            swing_hits: HitLedger::default(),
        }
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

    pub fn stamina(&self) -> f32 {
        self.stamina
    }

    pub fn max_stamina(&self) -> f32 {
        self.max_stamina
    }

    pub fn is_sprinting(&self) -> bool {
        self.sprinting
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible > 0
    }

    pub fn invincible_frames(&self) -> u32 {
        self.invincible
    }

    pub fn attack_cooldown(&self) -> u32 {
        self.attack_cooldown
    }

    pub fn attack(&self) -> Option<Attack> {
        self.attack
    }

    pub fn is_attacking(&self) -> bool {
        self.attack.is_some()
    }

    pub fn has_double_jumped(&self) -> bool {
        self.has_double_jumped
    }

    /// Advance one frame of player control and physics
    pub fn update(&mut self, input: &FrameInput, platforms: &[Platform], tuning: &Tuning) {
        self.vitals.tick();
        if !self.is_alive() {
            return;
        }
        let t = &tuning.player;

        // Movement
        let axis = input.move_axis();
        let sprint_held = input.is_held(Keys::SPRINT) && self.stamina > 0.0;
        let speed = if sprint_held { t.sprint_speed } else { t.walk_speed };
        if axis != 0.0 {
            self.body.vel.x += axis * speed * t.acceleration;
            self.facing = axis;
        }
        self.sprinting = sprint_held && axis != 0.0;
        if self.sprinting {
            self.stamina = (self.stamina - t.sprint_drain).max(0.0);
        }

        // Jump / double jump
        if input.was_pressed(Keys::JUMP) {
            if self.on_ground {
                self.body.vel.y = t.jump_impulse;
                self.has_double_jumped = false;
            } else if !self.has_double_jumped {
                self.body.vel.y = t.jump_impulse * t.double_jump_factor;
                self.has_double_jumped = true;
            }
        }

        // Weapon selection never touches the cooldown
        if input.was_pressed(Keys::WEAPON_CYCLE) {
            self.weapon = self.weapon.toggled();
        }
        if input.is_held(Keys::WEAPON_1) {
            self.weapon = Weapon::Sword;
        }
        if input.is_held(Keys::WEAPON_2) {
            self.weapon = Weapon::Bow;
        }

        // Attack
        if self.attack_cooldown > 0 {
            self.attack_cooldown -= 1;
        }
        let swung = input.primary_action
            && self.attack_cooldown == 0
            && self.stamina >= t.attack_stamina_cost;
        if swung {
            self.start_attack(input.aim, tuning);
        }
        if let Some(attack) = self.attack.as_mut() {
            attack.frame += 1;
            if attack.frame >= t.attack_duration {
                self.attack = None;
            }
        }

        // Physics
        collision::apply_friction(&mut self.body, tuning.physics.player_friction);
        self.body.vel += self.knockback.take(t.knockback_decay);
        collision::apply_gravity(&mut self.body, &tuning.physics);
        collision::integrate(&mut self.body);
        self.on_ground = collision::resolve_platforms(&mut self.body, platforms);
        if self.on_ground {
            self.has_double_jumped = false;
        }

        if !self.sprinting && !swung && self.stamina < self.max_stamina {
            self.stamina = (self.stamina + t.stamina_regen).min(self.max_stamina);
        }

        if self.invincible > 0 {
            self.invincible -= 1;
        }

        projectile::advance_all(&mut self.arrows);

        if self.body.pos.y > WORLD_DEPTH_LIMIT {
            log::debug!("Player fell out of the world at y={}", self.body.pos.y);
            self.vitals.kill();
        }
    }

    fn start_attack(&mut self, aim: Vec2, tuning: &Tuning) {
        let weapon = self.weapon;
        self.attack = Some(Attack { weapon, frame: 0 });
        self.attack_cooldown = tuning.cooldown_for(weapon);
        self.stamina = (self.stamina - tuning.player.attack_stamina_cost).max(0.0);
        self.swing_hits.reset();

        if weapon == Weapon::Bow {
            let bow = &tuning.weapons.bow;
            let origin = self.center();
            let angle = crate::angle_to(origin, aim);
            self.arrows.push(Projectile::launch(
                ProjectileKind::Arrow,
                origin,
                angle,
                bow.arrow_speed,
                bow.arrow_lifetime,
                bow.damage,
                bow.arrow_gravity,
            ));
            self.facing = if angle.cos() >= 0.0 { 1.0 } else { -1.0 };
        }
    }

    /// Sword hitbox for the current frame; widens over the swing
    pub fn sword_hitbox(&self, tuning: &Tuning) -> Option<Hitbox> {
        let attack = self.attack?;
        if attack.weapon != Weapon::Sword {
            return None;
        }
        let sword = &tuning.weapons.sword;
        let progress = attack.frame as f32 / tuning.player.attack_duration.max(1) as f32;
        let x = if self.facing > 0.0 {
            self.body.pos.x + self.body.size.x
        } else {
            self.body.pos.x - sword.base_width
        };
        Some(Hitbox {
            rect: Rect::new(
                x,
                self.body.pos.y + sword.y_offset,
                sword.base_width + sword.reach * progress,
                sword.height,
            ),
            damage: sword.damage,
        })
    }

    /// Apply damage unless dead or inside the invincibility window
    pub fn take_damage(&mut self, amount: f32, tuning: &Tuning) -> DamageOutcome {
        if self.invincible > 0 {
            return DamageOutcome::Ignored;
        }
        let outcome = self
            .vitals
            .take_damage(amount, tuning.combat.hit_flash_frames);
        if outcome.landed() {
            self.invincible = tuning.player.invincibility_frames;
        }
        outcome
    }

    /// Launch the player away from `source`
    pub fn knock_back(&mut self, source: Vec2, force: f32, tuning: &Tuning) {
        let center = self.center();
        self.knockback
            .apply(source, center, force, tuning.player.knockback_lift);
    }

    pub fn knockback_velocity(&self) -> Vec2 {
        self.knockback.vel
    }

    pub fn restore_stamina(&mut self, amount: f32) {
        if amount.is_finite() {
            self.stamina = (self.stamina + amount.max(0.0)).min(self.max_stamina);
        }
    }
}
