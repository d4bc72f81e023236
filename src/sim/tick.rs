//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. Order within a
//! tick: difficulty, spawn, motion, collisions, off-field cleanup, effect
//! aging.

use super::collision::player_entity_contact;
use super::difficulty::update_difficulty;
use super::spawn::maybe_spawn;
use super::state::{EffectKind, GameEvent, GamePhase, GameState};
use crate::consts::*;
use crate::wrap_degrees;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer/touch x in field coordinates
    pub pointer_x: Option<f32>,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing | GamePhase::Countdown => {
                state.phase = GamePhase::Paused;
                state.events.push(GameEvent::Paused);
                return;
            }
            GamePhase::Paused => {
                state.phase = if state.countdown_ticks > 0 {
                    GamePhase::Countdown
                } else {
                    GamePhase::Playing
                };
                state.events.push(GameEvent::Resumed);
            }
            GamePhase::GameOver => {}
        }
    }

    match state.phase {
        GamePhase::Paused => return,
        GamePhase::GameOver => {
            // Effects from the final hit still fade out
            age_effects(state);
            return;
        }
        _ => {}
    }

    if let Some(x) = input.pointer_x {
        if state.accepts_input() {
            state.player.center_on(x);
        }
    }

    match state.phase {
        GamePhase::Countdown => {
            state.countdown_ticks = state.countdown_ticks.saturating_sub(1);
            if state.countdown_ticks == 0 {
                state.phase = GamePhase::Playing;
                state.events.push(GameEvent::GameStarted);
                log::info!("Go! (seed {})", state.seed);
            }
        }

        GamePhase::Playing => {
            state.time_ticks += 1;
            state.clock_ms += f64::from(dt) * 1000.0;

            update_difficulty(state);
            maybe_spawn(state);
            integrate(state);
            resolve_collisions(state);
            drop_fallen(state);
        }

        _ => {}
    }

    age_effects(state);

    // Ensure deterministic ordering
    state.normalize_order();
}

/// Move and spin every entity
fn integrate(state: &mut GameState) {
    let speed = state.speed;
    let tuning = &state.tuning;
    for entity in &mut state.entities {
        entity.pos.y += entity.fall_step(speed, tuning);
        entity.rotation = wrap_degrees(entity.rotation + entity.rotation_vel);
    }
}

/// Remove entities whose top edge passed the bottom of the field
fn drop_fallen(state: &mut GameState) {
    state.entities.retain(|e| e.pos.y < FIELD_HEIGHT);
}

/// Test every entity once against the player and apply score/health changes
fn resolve_collisions(state: &mut GameState) {
    let player = state.player.clone();
    let mut i = 0;
    while i < state.entities.len() {
        // Nothing counts after the fatal hit
        if state.is_over() {
            break;
        }

        // Sweep over this tick's fall so nothing steps across the player
        let fall = state.entities[i].fall_step(state.speed, &state.tuning);
        let Some(contact) = player_entity_contact(&player, &state.entities[i], fall) else {
            i += 1;
            continue;
        };
        state.entities.remove(i);

        if contact.kind.is_obstacle() {
            state.health = state.health.saturating_sub(1);
            state.spawn_effect(EffectKind::Splash, contact.point);
            log::debug!("Hit by {}, health {}", contact.entity_id, state.health);
            state.events.push(GameEvent::ObstacleHit {
                entity_id: contact.entity_id,
                pos: contact.point,
                health: state.health,
            });

            if state.health == 0 {
                state.phase = GamePhase::GameOver;
                log::info!("Game over! Final score: {}", state.score);
                state.events.push(GameEvent::SessionEnded {
                    final_score: state.score,
                });
            }
        } else {
            state.score += 1;
            state.spawn_effect(EffectKind::Sparkle, contact.point);
            log::debug!("Reward {} collected, score {}", contact.entity_id, state.score);
            state.events.push(GameEvent::RewardCollected {
                entity_id: contact.entity_id,
                pos: contact.point,
                score: state.score,
            });
        }
    }
}

/// Count down effect lifetimes and drop expired ones
fn age_effects(state: &mut GameState) {
    for effect in &mut state.effects {
        effect.ttl_ticks = effect.ttl_ticks.saturating_sub(1);
    }
    state.effects.retain(|e| e.ttl_ticks > 0);
}
