//! Fixed-order frame procedure
//!
//! One call to [`tick`] advances a [`LevelState`] by exactly one frame. The
//! steps run in a fixed order and later steps see the results of earlier
//! ones, so reordering them changes outcomes.

use super::enemy::Target;
use super::input::FrameInput;
use super::level::PickupKind;
use super::projectile;
use super::state::{GameEvent, LevelState, SessionPhase};
use super::view::Viewport;
use crate::consts::{DEFEAT_FADE_FRAMES, EXIT_RADIUS};
use crate::progression::LevelResult;
use crate::tuning::MeleeHitPolicy;

/// Advance the session by one frame. Does nothing once the level is over.
pub fn tick(state: &mut LevelState, input: &FrameInput, view: &mut dyn Viewport) {
    if state.phase != SessionPhase::Playing {
        return;
    }
    state.elapsed_frames += 1;

    // 1. Player
    state
        .player
        .update(input, &state.level.platforms, &state.tuning);

    // 2. View
    view.follow(state.player.rect(), state.level.bounds());

    // 3. Enemies
    let target = Target::of(&state.player);
    for enemy in &mut state.enemies {
        enemy.update(&target, &state.level.platforms, &state.tuning, &mut state.rng);
    }

    // 4. Consumables (cosmetic only)
    for pickup in &mut state.level.pickups {
        pickup.update();
    }
    for gem in &mut state.level.gems {
        gem.update();
    }

    // 5-7. Combat
    resolve_player_melee(state);
    resolve_player_arrows(state);
    resolve_enemy_attacks(state);

    // 8-9. Consumption
    collect_pickups(state);
    collect_gems(state);

    // 10. Exit
    if state.player.is_alive()
        && state.player.center().distance(state.level.exit) < EXIT_RADIUS
    {
        complete_level(state);
        return;
    }

    // 11. Defeat
    if !state.player.is_alive() && state.player.vitals.death_timer() > DEFEAT_FADE_FRAMES {
        state.phase = SessionPhase::Defeated;
        state.events.push(GameEvent::PlayerDefeated);
        log::info!(
            "Defeated on level {} after {} frames (score {})",
            state.level_index + 1,
            state.elapsed_frames,
            state.score
        );
    }
}

fn resolve_player_melee(state: &mut LevelState) {
    let Some(hitbox) = state.player.sword_hitbox(&state.tuning) else {
        return;
    };
    let once_per_swing = state.tuning.combat.melee_hits == MeleeHitPolicy::OncePerSwing;

    let mut struck = Vec::new();
    for (i, enemy) in state.enemies.iter().enumerate() {
        if !enemy.is_alive() || !hitbox.rect.overlaps(&enemy.rect()) {
            continue;
        }
        if once_per_swing && !state.player.swing_hits.record(i) {
            continue;
        }
        struck.push(i);
    }
    for i in struck {
        state.damage_enemy(i, hitbox.damage);
    }
}

/// Each arrow damages at most one enemy and is consumed by it
fn resolve_player_arrows(state: &mut LevelState) {
    let mut i = 0;
    while i < state.player.arrows.len() {
        let pos = state.player.arrows[i].pos;
        let hit = state
            .enemies
            .iter()
            .position(|e| e.is_alive() && e.rect().contains_point(pos));
        match hit {
            Some(target) => {
                let arrow = state.player.arrows.remove(i);
                state.damage_enemy(target, arrow.damage);
            }
            None => i += 1,
        }
    }
}

fn resolve_enemy_attacks(state: &mut LevelState) {
    let combat = state.tuning.combat.clone();

    for i in 0..state.enemies.len() {
        if !state.enemies[i].is_alive() {
            continue;
        }
        let player_rect = state.player.rect();
        let enemy = &state.enemies[i];
        let source = enemy.center();
        let melee = enemy
            .attack_hitbox()
            .filter(|h| h.rect.overlaps(&player_rect));
        let contact = enemy.rect().overlaps(&player_rect);
        let contact_damage = enemy.params().damage * combat.contact_damage_factor;

        if let Some(hitbox) = melee {
            state.hurt_player(hitbox.damage, source, combat.melee_knockback);
        }
        if contact && !state.player.is_invincible() {
            state.hurt_player(contact_damage, source, combat.contact_knockback);
        }
        while let Some(p) = projectile::take_first_hit(&mut state.enemies[i].projectiles, &player_rect) {
            state.hurt_player(p.damage, p.pos, combat.projectile_knockback);
        }
    }
}

fn collect_pickups(state: &mut LevelState) {
    if !state.player.is_alive() {
        return;
    }
    let player_rect = state.player.rect();
    for pickup in &mut state.level.pickups {
        if !pickup.active || !pickup.rect().overlaps(&player_rect) {
            continue;
        }
        pickup.active = false;
        let amount = pickup.kind.amount();
        match pickup.kind {
            PickupKind::Health => state.player.vitals.heal(amount),
            PickupKind::Stamina => state.player.restore_stamina(amount),
        }
        state.events.push(GameEvent::PickupConsumed {
            kind: pickup.kind,
            pos: pickup.pos,
        });
    }
}

fn collect_gems(state: &mut LevelState) {
    if !state.player.is_alive() {
        return;
    }
    let player_rect = state.player.rect();
    for gem in &mut state.level.gems {
        if !gem.active || !gem.rect().overlaps(&player_rect) {
            continue;
        }
        gem.active = false;
        state.score = state.score.saturating_add(gem.value);
        state.events.push(GameEvent::GemConsumed {
            value: gem.value,
            pos: gem.pos,
        });
    }
}

fn complete_level(state: &mut LevelState) {
    let result = LevelResult::compute(
        state.score,
        state.elapsed_frames,
        state.level.par_frames,
        state.kills,
        state.total_enemies(),
    );
    log::info!(
        "Completed level {} in {} frames: score {} + time {} + kills {} = {} (rank {})",
        state.level_index + 1,
        state.elapsed_frames,
        result.level_score,
        result.time_bonus,
        result.kill_bonus,
        result.total,
        result.rank.as_str()
    );
    state.phase = SessionPhase::Completed;
    state.result = Some(result);
    state.events.push(GameEvent::LevelCompleted { result });
}
