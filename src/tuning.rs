//! Data-driven game balance
//!
//! Every number that shapes how a run plays lives here so balance can be
//! adjusted from JSON without touching the simulation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Longest accepted pre-game countdown
pub const MAX_PREGAME_COUNTDOWN_SECS: u32 = 60;

/// Errors produced while loading tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning value `{field}` out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

/// Gameplay balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Chance per tick that a new entity spawns (0-1)
    pub spawn_chance: f32,
    /// Vertical distance an entity falls per tick at speed multiplier 1.0
    pub base_fall_step: f32,
    /// Extra speed factor applied to fast obstacles
    pub fast_obstacle_factor: f32,
    /// Largest per-tick spin of a falling entity (degrees)
    pub max_rotation_vel: f32,

    /// Time between difficulty increases (ms)
    pub increase_interval_ms: u32,
    /// How long before an increase the countdown appears (ms)
    pub warning_window_ms: u32,
    /// Speed multiplier gained per increase
    pub speed_step: f32,
    /// Player size multiplier gained per increase
    pub size_step: f32,
    /// Upper bound for the player size multiplier
    pub max_size: f32,

    /// Size multiplier at which increases start throwing fast obstacles
    pub fast_burst_min_size: f32,
    /// Fast obstacles spawned per burst (0 disables bursts)
    pub fast_burst_count: u32,

    /// Starting (and maximum) health
    pub max_health: u8,
    /// Pre-game countdown length (whole seconds)
    pub pregame_countdown_secs: u32,

    /// Lifetime of the hit splash effect (ms)
    pub splash_lifetime_ms: u32,
    /// Lifetime of the pickup sparkle effect (ms)
    pub sparkle_lifetime_ms: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            spawn_chance: 0.1,
            base_fall_step: 5.0,
            fast_obstacle_factor: 3.0,
            max_rotation_vel: 4.0,

            increase_interval_ms: 30_000,
            warning_window_ms: 5_000,
            speed_step: 0.2,
            size_step: 0.1,
            max_size: MAX_SIZE_MULTIPLIER,

            fast_burst_min_size: 1.4,
            fast_burst_count: 3,

            max_health: MAX_HEALTH,
            pregame_countdown_secs: 5,

            splash_lifetime_ms: 500,
            sparkle_lifetime_ms: 1000,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON (missing fields keep their defaults)
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would break simulation invariants
    pub fn validate(&self) -> Result<(), TuningError> {
        fn out_of_range(field: &'static str, value: impl Into<f64>) -> TuningError {
            TuningError::OutOfRange {
                field,
                value: value.into(),
            }
        }

        for (field, value) in [
            ("spawn_chance", self.spawn_chance),
            ("base_fall_step", self.base_fall_step),
            ("fast_obstacle_factor", self.fast_obstacle_factor),
            ("max_rotation_vel", self.max_rotation_vel),
            ("speed_step", self.speed_step),
            ("size_step", self.size_step),
            ("max_size", self.max_size),
            ("fast_burst_min_size", self.fast_burst_min_size),
        ] {
            if !value.is_finite() {
                return Err(out_of_range(field, value));
            }
        }

        if !(0.0..=1.0).contains(&self.spawn_chance) {
            return Err(out_of_range("spawn_chance", self.spawn_chance));
        }
        if self.base_fall_step <= 0.0 {
            return Err(out_of_range("base_fall_step", self.base_fall_step));
        }
        if self.fast_obstacle_factor < 1.0 {
            return Err(out_of_range("fast_obstacle_factor", self.fast_obstacle_factor));
        }
        if self.increase_interval_ms == 0 {
            return Err(out_of_range("increase_interval_ms", self.increase_interval_ms));
        }
        if self.warning_window_ms > self.increase_interval_ms {
            return Err(out_of_range("warning_window_ms", self.warning_window_ms));
        }
        // Multipliers must never shrink during a run
        if self.speed_step < 0.0 {
            return Err(out_of_range("speed_step", self.speed_step));
        }
        if self.size_step < 0.0 {
            return Err(out_of_range("size_step", self.size_step));
        }
        if !(BASE_SIZE_MULTIPLIER..=MAX_SIZE_MULTIPLIER).contains(&self.max_size) {
            return Err(out_of_range("max_size", self.max_size));
        }
        if self.max_health == 0 {
            return Err(out_of_range("max_health", self.max_health));
        }
        if self.pregame_countdown_secs > MAX_PREGAME_COUNTDOWN_SECS {
            return Err(out_of_range(
                "pregame_countdown_secs",
                self.pregame_countdown_secs,
            ));
        }
        Ok(())
    }

    /// Splash lifetime in ticks
    pub fn splash_ticks(&self) -> u32 {
        crate::ms_to_ticks(self.splash_lifetime_ms)
    }

    /// Sparkle lifetime in ticks
    pub fn sparkle_ticks(&self) -> u32 {
        crate::ms_to_ticks(self.sparkle_lifetime_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let tuning = Tuning::from_json(r#"{ "spawn_chance": 0.25 }"#).unwrap();
        assert!((tuning.spawn_chance - 0.25).abs() < f32::EPSILON);
        assert_eq!(tuning.increase_interval_ms, 30_000);
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        let err = Tuning::from_json(r#"{ "spawn_chance": 1.5 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::OutOfRange {
                field: "spawn_chance",
                ..
            }
        ));

        let err = Tuning::from_json(r#"{ "max_size": 3.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::OutOfRange { field: "max_size", .. }));
    }

    #[test]
    fn test_from_json_parse_error() {
        let err = Tuning::from_json("not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_rejects_overlong_countdown() {
        let err = Tuning::from_json(r#"{ "pregame_countdown_secs": 100000000 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::OutOfRange {
                field: "pregame_countdown_secs",
                ..
            }
        ));
        assert!(Tuning::from_json(r#"{ "pregame_countdown_secs": 60 }"#).is_ok());
    }

    #[test]
    fn test_rejects_non_finite_floats() {
        // 1e39 overflows f32 to infinity
        let err = Tuning::from_json(r#"{ "speed_step": 1e39 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::OutOfRange {
                field: "speed_step",
                ..
            }
        ));

        let tuning = Tuning {
            base_fall_step: f32::NAN,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_huge_countdown_does_not_overflow_state() {
        let tuning = Tuning {
            pregame_countdown_secs: u32::MAX,
            ..Default::default()
        };
        let state = crate::sim::GameState::with_tuning(1, tuning);
        assert_eq!(state.countdown_ticks, u32::MAX);
    }

    #[test]
    fn test_effect_ticks() {
        let tuning = Tuning::default();
        assert_eq!(tuning.splash_ticks(), 30);
        assert_eq!(tuning.sparkle_ticks(), 60);
    }
}
