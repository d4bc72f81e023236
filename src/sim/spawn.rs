//! Entity spawning
//!
//! Generation is a pure function of the RNG so a seed replays exactly.

use glam::Vec2;
use rand::Rng;

use super::state::{Entity, EntityKind, GameState};
use crate::consts::*;
use crate::tuning::Tuning;

/// Roll a new reward or obstacle at the top edge
pub fn roll_entity<R: Rng>(rng: &mut R, id: u32, tuning: &Tuning) -> Entity {
    let kind = if rng.random_bool(0.5) {
        EntityKind::Reward
    } else {
        EntityKind::Obstacle
    };
    roll_entity_of_kind(rng, id, kind, tuning)
}

/// Roll an entity of a fixed kind at a random horizontal offset
pub fn roll_entity_of_kind<R: Rng>(
    rng: &mut R,
    id: u32,
    kind: EntityKind,
    tuning: &Tuning,
) -> Entity {
    let x = rng.random::<f32>() * (FIELD_WIDTH - ENTITY_SIZE);
    let variant = match kind {
        EntityKind::Reward => 0,
        EntityKind::Obstacle | EntityKind::FastObstacle => {
            rng.random_range(1..=OBSTACLE_VARIANTS)
        }
    };
    let rotation_vel = if tuning.max_rotation_vel > 0.0 {
        rng.random_range(-tuning.max_rotation_vel..=tuning.max_rotation_vel)
    } else {
        0.0
    };

    Entity {
        id,
        pos: Vec2::new(x, 0.0),
        kind,
        variant,
        rotation: 0.0,
        rotation_vel,
    }
}

/// Per-tick spawn roll: appends at most one entity
pub fn maybe_spawn(state: &mut GameState) -> Option<u32> {
    if !state.rng.random_bool(f64::from(state.tuning.spawn_chance)) {
        return None;
    }
    let id = state.next_entity_id();
    let entity = roll_entity(&mut state.rng, id, &state.tuning);
    state.entities.push(entity);
    Some(id)
}

/// Throw a burst of fast obstacles
pub fn spawn_fast_burst(state: &mut GameState, count: u32) {
    for _ in 0..count {
        let id = state.next_entity_id();
        let entity =
            roll_entity_of_kind(&mut state.rng, id, EntityKind::FastObstacle, &state.tuning);
        state.entities.push(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_roll_entity_in_bounds() {
        let mut rng = Pcg32::seed_from_u64(42);
        let tuning = Tuning::default();
        for id in 0..500 {
            let e = roll_entity(&mut rng, id, &tuning);
            assert!(e.pos.x >= 0.0 && e.pos.x < FIELD_WIDTH - ENTITY_SIZE);
            assert_eq!(e.pos.y, 0.0);
            assert!(e.rotation_vel.abs() <= tuning.max_rotation_vel);
            match e.kind {
                EntityKind::Reward => assert_eq!(e.variant, 0),
                EntityKind::Obstacle => {
                    assert!((1..=OBSTACLE_VARIANTS).contains(&e.variant))
                }
                EntityKind::FastObstacle => panic!("fast obstacles only come from bursts"),
            }
        }
    }

    #[test]
    fn test_roll_entity_mixes_kinds() {
        let mut rng = Pcg32::seed_from_u64(3);
        let tuning = Tuning::default();
        let rewards = (0..1000)
            .filter(|&id| roll_entity(&mut rng, id, &tuning).kind == EntityKind::Reward)
            .count();
        // Fair coin: comfortably inside 40%..60%
        assert!((400..600).contains(&rewards), "rewards = {rewards}");
    }

    #[test]
    fn test_roll_is_deterministic() {
        let tuning = Tuning::default();
        let mut a = Pcg32::seed_from_u64(99);
        let mut b = Pcg32::seed_from_u64(99);
        for id in 0..50 {
            let ea = roll_entity(&mut a, id, &tuning);
            let eb = roll_entity(&mut b, id, &tuning);
            assert_eq!(ea.kind, eb.kind);
            assert_eq!(ea.pos, eb.pos);
            assert_eq!(ea.variant, eb.variant);
        }
    }

    #[test]
    fn test_maybe_spawn_respects_chance() {
        let never = Tuning {
            spawn_chance: 0.0,
            ..Default::default()
        };
        let mut state = GameState::with_tuning(1, never);
        for _ in 0..200 {
            assert!(maybe_spawn(&mut state).is_none());
        }
        assert!(state.entities.is_empty());

        let always = Tuning {
            spawn_chance: 1.0,
            ..Default::default()
        };
        let mut state = GameState::with_tuning(1, always);
        for _ in 0..10 {
            assert!(maybe_spawn(&mut state).is_some());
        }
        assert_eq!(state.entities.len(), 10);
    }

    #[test]
    fn test_fast_burst() {
        let mut state = GameState::new(5);
        spawn_fast_burst(&mut state, 3);
        assert_eq!(state.entities.len(), 3);
        assert!(
            state
                .entities
                .iter()
                .all(|e| e.kind == EntityKind::FastObstacle)
        );
    }
}
