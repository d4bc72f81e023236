//! Session driver
//!
//! Owns one [`GameState`] and turns variable frame deltas from the host into
//! fixed simulation ticks. The host calls [`Session::advance`] once per
//! display refresh and draws the returned frame.

use crate::consts::*;
use crate::sim::{GameEvent, GamePhase, GameState, RenderableFrame, TickInput, tick};
use crate::tuning::Tuning;

pub struct Session {
    state: GameState,
    tuning: Tuning,
    input: TickInput,
    accumulator: f32,
    /// Events produced by restart outside of a tick
    pending: Vec<GameEvent>,
}

impl Session {
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        log::info!("Session started with seed: {}", seed);
        Self {
            state: GameState::with_tuning(seed, tuning.clone()),
            tuning,
            input: TickInput::default(),
            accumulator: 0.0,
            pending: Vec::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Latest pointer/touch x in field coordinates
    pub fn pointer_moved(&mut self, x: f32) {
        self.input.pointer_x = Some(x);
    }

    /// Request a pause toggle on the next tick
    pub fn toggle_pause(&mut self) {
        self.input.pause = true;
    }

    /// Pause unless already paused or finished
    pub fn pause(&mut self) {
        if matches!(self.state.phase, GamePhase::Playing | GamePhase::Countdown) {
            self.input.pause = true;
        }
    }

    /// Run as many fixed ticks as `dt` seconds cover and snapshot the result
    pub fn advance(&mut self, dt: f32) -> RenderableFrame {
        // A NaN would poison the accumulator for the rest of the run
        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.pause = false;
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog rather than spiral
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        let mut events = std::mem::take(&mut self.pending);
        events.extend(self.state.drain_events());
        RenderableFrame::capture(&self.state, events)
    }

    /// Discard the current run and start a fresh one
    pub fn restart(&mut self, seed: u64) {
        let previous_score = self.state.score;
        self.state = GameState::with_tuning(seed, self.tuning.clone());
        self.accumulator = 0.0;
        self.input = TickInput::default();
        self.pending.clear();
        self.pending
            .push(GameEvent::SessionRestarted { previous_score });
        log::info!("Session restarted with seed: {}", seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Entity, EntityKind, GameEvent};
    use glam::Vec2;

    fn quiet_tuning() -> Tuning {
        Tuning {
            spawn_chance: 0.0,
            pregame_countdown_secs: 0,
            ..Default::default()
        }
    }

    #[test]
    fn test_advance_runs_fixed_ticks() {
        let mut session = Session::with_tuning(1, quiet_tuning());
        session.advance(SIM_DT * 3.5);
        assert_eq!(session.state().time_ticks, 3);
        session.advance(SIM_DT * 0.6);
        assert_eq!(session.state().time_ticks, 4);
    }

    #[test]
    fn test_advance_caps_long_frames() {
        let mut session = Session::with_tuning(1, quiet_tuning());
        session.advance(5.0);
        assert!(session.state().time_ticks <= u64::from(MAX_SUBSTEPS));
    }

    #[test]
    fn test_non_finite_dt_is_ignored() {
        let mut session = Session::with_tuning(1, quiet_tuning());
        session.advance(f32::NAN);
        session.advance(f32::INFINITY);
        assert_eq!(session.state().time_ticks, 0);

        session.advance(SIM_DT);
        assert_eq!(session.state().time_ticks, 1);
    }

    #[test]
    fn test_pointer_applies() {
        let mut session = Session::with_tuning(1, quiet_tuning());
        session.pointer_moved(300.0);
        let frame = session.advance(SIM_DT);
        assert!((frame.player.center().x - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_pause_is_one_shot() {
        let mut session = Session::with_tuning(1, quiet_tuning());
        session.toggle_pause();
        let frame = session.advance(SIM_DT * 3.0);
        assert_eq!(frame.phase, GamePhase::Paused);
        assert!(frame.events.contains(&GameEvent::Paused));

        session.toggle_pause();
        let frame = session.advance(SIM_DT);
        assert_eq!(frame.phase, GamePhase::Playing);
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut session = Session::with_tuning(1, quiet_tuning());
        {
            let state = &mut session.state;
            state.score = 12;
            state.health = 2;
            state.speed = 1.6;
            state.player.size = 1.3;
            state.spawn_effect(crate::sim::EffectKind::Sparkle, Vec2::new(5.0, 5.0));
            let id = state.next_entity_id();
            state.entities.push(Entity {
                id,
                pos: Vec2::ZERO,
                kind: EntityKind::Reward,
                variant: 0,
                rotation: 0.0,
                rotation_vel: 0.0,
            });
        }

        session.restart(2);
        let state = session.state();
        assert_eq!(state.score, 0);
        assert_eq!(state.health, MAX_HEALTH);
        assert_eq!(state.speed, 1.0);
        assert_eq!(state.player.size, 1.0);
        assert!(state.entities.is_empty());
        assert!(state.effects.is_empty());

        let frame = session.advance(0.0);
        assert_eq!(
            frame.events,
            vec![GameEvent::SessionRestarted { previous_score: 12 }]
        );
    }

    #[test]
    fn test_session_ended_event_reaches_host() {
        let mut session = Session::with_tuning(1, quiet_tuning());
        {
            let state = &mut session.state;
            state.health = 1;
            let bounds = state.player.bounds();
            let id = state.next_entity_id();
            state.entities.push(Entity {
                id,
                pos: bounds.min + Vec2::splat(5.0),
                kind: EntityKind::Obstacle,
                variant: 1,
                rotation: 0.0,
                rotation_vel: 0.0,
            });
            state.score = 4;
        }
        let frame = session.advance(SIM_DT);
        assert!(frame.is_over());
        assert!(
            frame
                .events
                .contains(&GameEvent::SessionEnded { final_score: 4 })
        );
    }
}
