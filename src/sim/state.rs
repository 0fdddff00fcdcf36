//! Level session state
//!
//! A [`LevelState`] owns everything that lives for one attempt at a level:
//! geometry, the player, every enemy, pickups and gems, counters and the
//! seeded RNG. Retrying a level builds a fresh one.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::combat::DamageOutcome;
use super::enemy::{Archetype, Enemy};
use super::level::{Level, LevelDescriptor, PickupKind};
use super::player::Player;
use super::snapshot::FrameSnapshot;
use crate::error::ContentError;
use crate::progression::LevelResult;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Active gameplay
    Playing,
    /// Player reached the exit
    Completed,
    /// Player died and the fade ran out
    Defeated,
}

/// Discrete things that happened during a frame, for view, audio and effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemyDamaged {
        index: usize,
        amount: f32,
        pos: Vec2,
    },
    EnemyKilled {
        index: usize,
        archetype: Archetype,
        score: u32,
        pos: Vec2,
    },
    PlayerDamaged {
        amount: f32,
        health: f32,
    },
    PickupConsumed {
        kind: PickupKind,
        pos: Vec2,
    },
    GemConsumed {
        value: u32,
        pos: Vec2,
    },
    LevelCompleted {
        result: LevelResult,
    },
    PlayerDefeated,
}

#[derive(Debug, Clone)]
pub struct LevelState {
    /// Position in the campaign
    pub level_index: usize,
    pub level: Level,
    pub player: Player,
    /// Never shrinks during a session; dead enemies stay with `alive == false`
    pub enemies: Vec<Enemy>,
    pub tuning: Tuning,
    pub(super) rng: Pcg32,
    pub(super) phase: SessionPhase,
    /// Points from kills and gems
    pub(super) score: u32,
    pub(super) elapsed_frames: u32,
    pub(super) kills: u32,
    total_enemies: u32,
    pub(super) events: Vec<GameEvent>,
    pub(super) result: Option<LevelResult>,
}

impl LevelState {
    /// Start a session on `descriptor`; rejects unknown identifiers
    pub fn new(
        level_index: usize,
        descriptor: &LevelDescriptor,
        tuning: Tuning,
        seed: u64,
    ) -> Result<Self, ContentError> {
        let mut rng = Pcg32::seed_from_u64(seed);
        let level = Level::build(descriptor, || crate::random_range(&mut rng, 0.0, TAU))?;

        let enemies = descriptor
            .enemies
            .iter()
            .map(|spawn| Ok(Enemy::spawn(spawn.archetype.parse()?, spawn.pos)))
            .collect::<Result<Vec<_>, ContentError>>()?;

        let player = Player::new(level.spawn, level.starting_weapon, &tuning);
        let total_enemies = enemies.len() as u32;

        log::info!(
            "Starting level {} \"{}\": {} enemies, {} pickups, {} gems, par {} frames",
            level_index + 1,
            level.name,
            total_enemies,
            level.pickups.len(),
            level.gems.len(),
            level.par_frames
        );

        Ok(Self {
            level_index,
            level,
            player,
            enemies,
            tuning,
            rng,
            phase: SessionPhase::Playing,
            score: 0,
            elapsed_frames: 0,
            kills: 0,
            total_enemies,
            events: Vec::new(),
            result: None,
        })
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase == SessionPhase::Playing
    }

    pub fn is_completed(&self) -> bool {
        self.phase == SessionPhase::Completed
    }

    pub fn is_defeated(&self) -> bool {
        self.phase == SessionPhase::Defeated
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn elapsed_frames(&self) -> u32 {
        self.elapsed_frames
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn total_enemies(&self) -> u32 {
        self.total_enemies
    }

    /// Score breakdown, once the level is completed
    pub fn result(&self) -> Option<&LevelResult> {
        self.result.as_ref()
    }

    /// Events since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take the pending events; call once per frame after [`super::tick`]
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot::build(self)
    }

    /// Damage enemy `index`, crediting score and kills on a kill
    pub(super) fn damage_enemy(&mut self, index: usize, amount: f32) -> DamageOutcome {
        let Some(enemy) = self.enemies.get_mut(index) else {
            return DamageOutcome::Ignored;
        };
        let outcome = enemy.take_damage(amount, &self.tuning);
        if !outcome.landed() {
            return outcome;
        }

        let pos = enemy.center();
        self.events.push(GameEvent::EnemyDamaged { index, amount, pos });
        if outcome == DamageOutcome::Killed {
            let archetype = enemy.archetype;
            let score = archetype.params().score_value;
            self.score = self.score.saturating_add(score);
            self.kills += 1;
            log::debug!("Killed {} #{} (+{})", archetype.as_str(), index, score);
            self.events.push(GameEvent::EnemyKilled {
                index,
                archetype,
                score,
                pos,
            });
        }
        outcome
    }

    /// Damage the player and knock them away from `source` if it lands
    pub(super) fn hurt_player(&mut self, amount: f32, source: Vec2, force: f32) -> DamageOutcome {
        let outcome = self.player.take_damage(amount, &self.tuning);
        if outcome.landed() {
            self.player.knock_back(source, force, &self.tuning);
            self.events.push(GameEvent::PlayerDamaged {
                amount,
                health: self.player.vitals.health(),
            });
            if outcome == DamageOutcome::Killed {
                log::info!("Player killed on level {}", self.level_index + 1);
            }
        }
        outcome
    }
}
