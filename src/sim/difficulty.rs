//! Difficulty scheduler
//!
//! Every `increase_interval_ms` of play the fall speed and the player's size
//! go up. The phase is re-derived from elapsed time on every tick, so a
//! dropped or long frame never skips an increase.

use super::spawn::spawn_fast_burst;
use super::state::{DifficultyPhase, EntityKind, GameEvent, GameState};
use crate::tuning::Tuning;

/// Classify elapsed time since the last increase
pub fn evaluate(elapsed_ms: f64, tuning: &Tuning) -> DifficultyPhase {
    let interval = f64::from(tuning.increase_interval_ms);
    let warning_start = interval - f64::from(tuning.warning_window_ms);

    if elapsed_ms >= interval {
        DifficultyPhase::JustIncreased
    } else if elapsed_ms >= warning_start {
        let countdown = ((interval - elapsed_ms) / 1000.0).ceil() as u32;
        DifficultyPhase::Warning { countdown }
    } else {
        DifficultyPhase::Ramping
    }
}

/// Sample the scheduler and apply an increase when one is due
pub fn update_difficulty(state: &mut GameState) {
    let elapsed = state.clock_ms - state.last_increase_ms;
    let phase = evaluate(elapsed, &state.tuning);

    if phase == DifficultyPhase::JustIncreased {
        apply_increase(state);
    }
    state.difficulty = phase;
}

fn apply_increase(state: &mut GameState) {
    let size_before = state.player.size;

    state.speed += state.tuning.speed_step;
    state.player.size = (state.player.size + state.tuning.size_step).min(state.tuning.max_size);
    // A larger sprite may now poke out of the field
    state.player.clamp_to_field();
    state.last_increase_ms = state.clock_ms;

    log::info!(
        "Difficulty up: speed x{:.1}, size x{:.1}",
        state.speed,
        state.player.size
    );
    state.events.push(GameEvent::DifficultyIncreased {
        speed: state.speed,
        size: state.player.size,
    });

    // The previous burst only lives until the next increase
    state
        .entities
        .retain(|e| e.kind != EntityKind::FastObstacle);

    let count = state.tuning.fast_burst_count;
    if count > 0 && size_before >= state.tuning.fast_burst_min_size {
        spawn_fast_burst(state, count);
        log::info!("Fast obstacle burst: {}", count);
        state.events.push(GameEvent::FastObstacleBurst { count });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Entity;
    use glam::Vec2;

    fn quiet_state() -> GameState {
        let tuning = Tuning {
            spawn_chance: 0.0,
            pregame_countdown_secs: 0,
            ..Default::default()
        };
        GameState::with_tuning(11, tuning)
    }

    #[test]
    fn test_evaluate_phases() {
        let tuning = Tuning::default();
        assert_eq!(evaluate(0.0, &tuning), DifficultyPhase::Ramping);
        assert_eq!(evaluate(24_999.0, &tuning), DifficultyPhase::Ramping);
        assert_eq!(
            evaluate(25_000.0, &tuning),
            DifficultyPhase::Warning { countdown: 5 }
        );
        assert_eq!(
            evaluate(27_500.0, &tuning),
            DifficultyPhase::Warning { countdown: 3 }
        );
        assert_eq!(
            evaluate(29_999.0, &tuning),
            DifficultyPhase::Warning { countdown: 1 }
        );
        assert_eq!(evaluate(30_000.0, &tuning), DifficultyPhase::JustIncreased);
        assert_eq!(evaluate(95_000.0, &tuning), DifficultyPhase::JustIncreased);
    }

    #[test]
    fn test_increase_applies_steps() {
        let mut state = quiet_state();
        state.clock_ms = 30_000.0;
        update_difficulty(&mut state);

        assert!((state.speed - 1.2).abs() < 1e-5);
        assert!((state.player.size - 1.1).abs() < 1e-5);
        assert_eq!(state.last_increase_ms, 30_000.0);
        assert_eq!(state.difficulty, DifficultyPhase::JustIncreased);
        assert_eq!(state.difficulty.countdown(), None);
        assert!(matches!(
            state.events.last(),
            Some(GameEvent::DifficultyIncreased { .. })
        ));
    }

    #[test]
    fn test_size_is_capped() {
        let mut state = quiet_state();
        for i in 1..=20 {
            state.clock_ms = f64::from(i) * 30_000.0;
            update_difficulty(&mut state);
        }
        assert!(state.player.size <= 2.0);
        assert!((state.player.size - 2.0).abs() < 1e-5);
        // Speed is unbounded
        assert!((state.speed - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_burst_only_after_size_threshold() {
        let mut state = quiet_state();
        state.player.size = 1.3;
        state.clock_ms = 30_000.0;
        update_difficulty(&mut state);
        assert!(state.entities.is_empty());

        state.player.size = 1.4;
        state.clock_ms = 60_000.0;
        update_difficulty(&mut state);
        let fast = state
            .entities
            .iter()
            .filter(|e| e.kind == EntityKind::FastObstacle)
            .count();
        assert_eq!(fast, 3);
        assert!(
            state
                .events
                .contains(&GameEvent::FastObstacleBurst { count: 3 })
        );
    }

    #[test]
    fn test_next_increase_clears_old_burst() {
        let mut state = quiet_state();
        state.tuning.fast_burst_count = 0;
        state.entities.push(Entity {
            id: 99,
            pos: Vec2::new(10.0, 10.0),
            kind: EntityKind::FastObstacle,
            variant: 1,
            rotation: 0.0,
            rotation_vel: 0.0,
        });
        state.clock_ms = 30_000.0;
        update_difficulty(&mut state);
        assert!(state.entities.is_empty());
    }

    #[test]
    fn test_growth_keeps_player_in_field() {
        let mut state = quiet_state();
        state.player.x = crate::consts::FIELD_WIDTH - state.player.width();
        state.clock_ms = 30_000.0;
        update_difficulty(&mut state);
        assert!(state.player.bounds().max.x <= crate::consts::FIELD_WIDTH + 1e-3);
    }
}
