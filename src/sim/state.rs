//! Game state and core simulation types
//!
//! Everything one session needs lives in [`GameState`]; systems receive it by
//! `&mut` and nothing else is shared between ticks.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Pre-game "5, 4, 3..." countdown, nothing falls yet
    Countdown,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Health ran out (terminal)
    GameOver,
}

/// What a falling entity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Moxie token, worth one point
    Reward,
    /// Dagger, costs one heart
    Obstacle,
    /// Dagger thrown during a difficulty burst, falls faster
    FastObstacle,
}

impl EntityKind {
    pub fn is_obstacle(&self) -> bool {
        matches!(self, EntityKind::Obstacle | EntityKind::FastObstacle)
    }
}

/// A falling entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    /// Top-left corner of the hit box
    pub pos: Vec2,
    pub kind: EntityKind,
    /// Sprite variant (obstacles only, 1-based like the sprite files)
    pub variant: u8,
    /// Current rotation in degrees [0, 360)
    pub rotation: f32,
    /// Spin per tick in degrees
    pub rotation_vel: f32,
}

impl Entity {
    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, Vec2::splat(ENTITY_SIZE))
    }

    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }

    /// Hit box stretched up over the `fall` distance covered this tick
    pub fn swept_bounds(&self, fall: f32) -> Rect {
        let mut bounds = self.bounds();
        bounds.min.y -= fall.max(0.0);
        bounds
    }

    /// Distance fallen per tick at the given speed multiplier
    pub fn fall_step(&self, speed: f32, tuning: &Tuning) -> f32 {
        let step = tuning.base_fall_step * speed;
        match self.kind {
            EntityKind::FastObstacle => step * tuning.fast_obstacle_factor,
            _ => step,
        }
    }
}

/// The player's sprite, resting on the bottom edge of the field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Left edge
    pub x: f32,
    /// Size multiplier (1.0 - 2.0)
    pub size: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            x: (FIELD_WIDTH - PLAYER_WIDTH) / 2.0,
            size: BASE_SIZE_MULTIPLIER,
        }
    }
}

impl Player {
    #[inline]
    pub fn width(&self) -> f32 {
        PLAYER_WIDTH * self.size
    }

    #[inline]
    pub fn height(&self) -> f32 {
        PLAYER_HEIGHT * self.size
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(
            Vec2::new(self.x, FIELD_HEIGHT - self.height()),
            Vec2::new(self.width(), self.height()),
        )
    }

    /// Move so the pointer sits at the sprite's horizontal center
    pub fn center_on(&mut self, pointer_x: f32) {
        self.x = pointer_x - self.width() / 2.0;
        self.clamp_to_field();
    }

    /// Keep the full sprite inside the field
    pub fn clamp_to_field(&mut self) {
        let max_x = (FIELD_WIDTH - self.width()).max(0.0);
        self.x = self.x.clamp(0.0, max_x);
    }
}

/// Transient visual effect kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Red burst where an obstacle hit
    Splash,
    /// Purple burst where a reward was collected
    Sparkle,
}

/// A transient visual effect (not gameplay-affecting)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Effect {
    pub id: u32,
    pub kind: EffectKind,
    pub pos: Vec2,
    pub ttl_ticks: u32,
    pub lifetime_ticks: u32,
}

impl Effect {
    /// 0.0 when fresh, approaching 1.0 as it expires
    pub fn progress(&self) -> f32 {
        if self.lifetime_ticks == 0 {
            return 1.0;
        }
        1.0 - self.ttl_ticks as f32 / self.lifetime_ticks as f32
    }
}

/// Difficulty scheduler state, re-derived every tick from elapsed time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DifficultyPhase {
    /// Quiet part of the interval
    Ramping,
    /// Last seconds before an increase; `countdown` is whole seconds left
    Warning { countdown: u32 },
    /// An increase was applied this tick
    JustIncreased,
}

impl DifficultyPhase {
    /// Countdown to show, if any
    pub fn countdown(&self) -> Option<u32> {
        match self {
            DifficultyPhase::Warning { countdown } => Some(*countdown),
            _ => None,
        }
    }
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Pre-game countdown finished, spawning begins
    GameStarted,
    RewardCollected { entity_id: u32, pos: Vec2, score: u64 },
    ObstacleHit { entity_id: u32, pos: Vec2, health: u8 },
    DifficultyIncreased { speed: f32, size: f32 },
    FastObstacleBurst { count: u32 },
    Paused,
    Resumed,
    /// Health reached zero
    SessionEnded { final_score: u64 },
    /// A fresh session replaced the old one
    SessionRestarted { previous_score: u64 },
}

/// Complete per-session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Spawner randomness
    pub rng: Pcg32,
    /// Balance parameters for this run
    pub tuning: Tuning,
    pub score: u64,
    pub health: u8,
    /// Fall speed multiplier (>= 1, never decreases)
    pub speed: f32,
    pub player: Player,
    pub phase: GamePhase,
    /// Simulation tick counter (ticks spent Playing)
    pub time_ticks: u64,
    /// Simulated time spent Playing (ms)
    pub clock_ms: f64,
    /// `clock_ms` at the last difficulty increase
    pub last_increase_ms: f64,
    /// Scheduler state as of the last tick
    pub difficulty: DifficultyPhase,
    /// Pre-game countdown ticks remaining
    pub countdown_ticks: u32,
    /// Live falling entities (sorted by id)
    pub entities: Vec<Entity>,
    /// Live visual effects
    pub effects: Vec<Effect>,
    /// Events not yet collected by the driver
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new session with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new session with explicit tuning
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let countdown_ticks = tuning
            .pregame_countdown_secs
            .saturating_mul(ticks_per_second());
        let phase = if countdown_ticks > 0 {
            GamePhase::Countdown
        } else {
            GamePhase::Playing
        };

        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            health: tuning.max_health,
            tuning,
            score: 0,
            speed: BASE_SPEED_MULTIPLIER,
            player: Player::default(),
            phase,
            time_ticks: 0,
            clock_ms: 0.0,
            last_increase_ms: 0.0,
            difficulty: DifficultyPhase::Ramping,
            countdown_ticks,
            entities: Vec::new(),
            effects: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Terminal flag
    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Whether pointer input currently moves the player
    pub fn accepts_input(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Whole seconds left on the pre-game countdown (None once playing)
    pub fn pregame_countdown(&self) -> Option<u32> {
        if self.countdown_ticks == 0 {
            return None;
        }
        Some(self.countdown_ticks.div_ceil(ticks_per_second()))
    }

    /// Add a visual effect at `pos`
    pub fn spawn_effect(&mut self, kind: EffectKind, pos: Vec2) {
        let lifetime_ticks = match kind {
            EffectKind::Splash => self.tuning.splash_ticks(),
            EffectKind::Sparkle => self.tuning.sparkle_ticks(),
        };
        let id = self.next_entity_id();
        self.effects.push(Effect {
            id,
            kind,
            pos: crate::clamp_to_field(pos),
            ttl_ticks: lifetime_ticks,
            lifetime_ticks,
        });
    }

    /// Collect and clear pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.entities.sort_by_key(|e| e.id);
    }
}

/// Simulation ticks per second of game time
pub fn ticks_per_second() -> u32 {
    (1.0 / SIM_DT).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_defaults() {
        let state = GameState::new(7);
        assert_eq!(state.score, 0);
        assert_eq!(state.health, MAX_HEALTH);
        assert_eq!(state.speed, 1.0);
        assert_eq!(state.player.size, 1.0);
        assert_eq!(state.phase, GamePhase::Countdown);
        assert_eq!(state.pregame_countdown(), Some(5));
        assert!(state.entities.is_empty());
    }

    #[test]
    fn test_no_countdown_starts_playing() {
        let tuning = Tuning {
            pregame_countdown_secs: 0,
            ..Default::default()
        };
        let state = GameState::with_tuning(7, tuning);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.pregame_countdown(), None);
    }

    #[test]
    fn test_player_center_on_clamps() {
        let mut player = Player::default();

        player.center_on(450.0);
        assert!((player.x - 425.0).abs() < 1e-5);

        player.center_on(-100.0);
        assert_eq!(player.x, 0.0);

        player.center_on(10_000.0);
        assert!((player.x - (FIELD_WIDTH - PLAYER_WIDTH)).abs() < 1e-5);
    }

    #[test]
    fn test_player_bounds_rest_on_floor() {
        let player = Player {
            x: 100.0,
            size: 2.0,
        };
        let bounds = player.bounds();
        assert_eq!(bounds.max.y, FIELD_HEIGHT);
        assert_eq!(bounds.height(), PLAYER_HEIGHT * 2.0);
        assert_eq!(bounds.width(), PLAYER_WIDTH * 2.0);
    }

    #[test]
    fn test_fast_obstacle_falls_faster() {
        let tuning = Tuning::default();
        let mut entity = Entity {
            id: 1,
            pos: Vec2::ZERO,
            kind: EntityKind::Obstacle,
            variant: 1,
            rotation: 0.0,
            rotation_vel: 0.0,
        };
        let normal = entity.fall_step(1.2, &tuning);
        entity.kind = EntityKind::FastObstacle;
        let fast = entity.fall_step(1.2, &tuning);
        assert!((normal - 6.0).abs() < 1e-5);
        assert!((fast - normal * tuning.fast_obstacle_factor).abs() < 1e-5);
    }

    #[test]
    fn test_effect_progress() {
        let mut state = GameState::new(1);
        state.spawn_effect(EffectKind::Splash, Vec2::new(10.0, 10.0));
        let effect = &mut state.effects[0];
        assert_eq!(effect.progress(), 0.0);
        effect.ttl_ticks = effect.lifetime_ticks / 2;
        assert!((effect.progress() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_pregame_countdown_rounds_up() {
        let mut state = GameState::new(1);
        state.countdown_ticks = ticks_per_second() * 4 + 1;
        assert_eq!(state.pregame_countdown(), Some(5));
        state.countdown_ticks = ticks_per_second();
        assert_eq!(state.pregame_countdown(), Some(1));
    }
}
