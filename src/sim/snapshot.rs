//! Read-only frame snapshot for rendering
//!
//! Copies just what a view needs out of the session so drawing never holds
//! on to simulation state.

use glam::Vec2;
use serde::Serialize;

use super::enemy::Archetype;
use super::level::{GemTier, PickupKind};
use super::player::Weapon;
use super::projectile::{Projectile, ProjectileKind};
use super::state::{LevelState, SessionPhase};
use crate::consts::DEFEAT_FADE_FRAMES;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub size: Vec2,
    pub facing: f32,
    pub health: f32,
    pub max_health: f32,
    pub stamina: f32,
    pub max_stamina: f32,
    pub weapon: Weapon,
    /// Swing progress in `0..1` while attacking
    pub attack_progress: Option<f32>,
    pub invincible: bool,
    pub on_ground: bool,
    pub sprinting: bool,
    pub alive: bool,
    /// 1 while alive, falling to 0 over the death fade
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnemyView {
    pub archetype: Archetype,
    pub pos: Vec2,
    pub size: Vec2,
    pub facing: f32,
    pub health_fraction: f32,
    pub aggroed: bool,
    pub attacking: bool,
    pub hit_flash: bool,
    pub alive: bool,
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectileView {
    pub kind: ProjectileKind,
    pub pos: Vec2,
    pub heading: f32,
    /// Fired by an enemy
    pub hostile: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickupView {
    pub kind: PickupKind,
    pub pos: Vec2,
    pub bob: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GemView {
    pub pos: Vec2,
    pub value: u32,
    pub tier: GemTier,
    pub bob: f32,
}

/// Everything drawable for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub level_name: String,
    pub phase: SessionPhase,
    pub world: Vec2,
    pub exit: Vec2,
    pub elapsed_frames: u32,
    pub par_frames: u32,
    pub score: u32,
    pub kills: u32,
    pub total_enemies: u32,
    pub player: PlayerView,
    /// Living and still-fading enemies
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    /// Uncollected pickups only
    pub pickups: Vec<PickupView>,
    /// Uncollected gems only
    pub gems: Vec<GemView>,
}

fn projectile_view(p: &Projectile, hostile: bool) -> ProjectileView {
    ProjectileView {
        kind: p.kind,
        pos: p.pos,
        heading: p.heading(),
        hostile,
    }
}

fn fade(death_timer: u32, frames: u32) -> f32 {
    1.0 - (death_timer as f32 / frames.max(1) as f32).min(1.0)
}

impl FrameSnapshot {
    pub fn build(state: &LevelState) -> Self {
        let tuning = &state.tuning;
        let p = &state.player;

        let player = PlayerView {
            pos: p.body.pos,
            size: p.body.size,
            facing: p.facing,
            health: p.vitals.health(),
            max_health: p.vitals.max_health(),
            stamina: p.stamina(),
            max_stamina: p.max_stamina(),
            weapon: p.weapon,
            attack_progress: p
                .attack()
                .map(|a| a.frame as f32 / tuning.player.attack_duration.max(1) as f32),
            invincible: p.is_invincible(),
            on_ground: p.on_ground,
            sprinting: p.is_sprinting(),
            alive: p.is_alive(),
            opacity: if p.is_alive() {
                1.0
            } else {
                fade(p.vitals.death_timer(), DEFEAT_FADE_FRAMES)
            },
        };

        let enemies = state
            .enemies
            .iter()
            .filter(|e| !e.is_faded(tuning))
            .map(|e| EnemyView {
                archetype: e.archetype,
                pos: e.body.pos,
                size: e.body.size,
                facing: e.facing,
                health_fraction: e.vitals.fraction(),
                aggroed: e.aggroed,
                attacking: e.is_attacking(),
                hit_flash: e.vitals.hit_flash() > 0,
                alive: e.is_alive(),
                opacity: if e.is_alive() {
                    1.0
                } else {
                    fade(e.vitals.death_timer(), tuning.combat.enemy_fade_frames)
                },
            })
            .collect();

        let projectiles = p
            .arrows
            .iter()
            .map(|a| projectile_view(a, false))
            .chain(
                state
                    .enemies
                    .iter()
                    .flat_map(|e| e.projectiles.iter().map(|a| projectile_view(a, true))),
            )
            .collect();

        let pickups = state
            .level
            .pickups
            .iter()
            .filter(|p| p.active)
            .map(|p| PickupView {
                kind: p.kind,
                pos: p.pos,
                bob: p.bob,
            })
            .collect();

        let gems = state
            .level
            .gems
            .iter()
            .filter(|g| g.active)
            .map(|g| GemView {
                pos: g.pos,
                value: g.value,
                tier: g.tier(),
                bob: g.bob,
            })
            .collect();

        Self {
            level_name: state.level.name.clone(),
            phase: state.phase(),
            world: state.level.bounds(),
            exit: state.level.exit,
            elapsed_frames: state.elapsed_frames(),
            par_frames: state.level.par_frames,
            score: state.score(),
            kills: state.kills(),
            total_enemies: state.total_enemies(),
            player,
            enemies,
            projectiles,
            pickups,
            gems,
        }
    }
}
