//! Moxie Mining - A falling-object arcade mini-game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, motion, collisions, difficulty)
//! - `session`: Fixed-timestep driver the host calls once per frame
//! - `renderer`: Canvas 2D drawing (wasm only)
//! - `platform`: Browser/native platform abstraction
//! - `tuning`: Data-driven game balance

pub mod history;
pub mod platform;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use history::GameHistory;
pub use session::Session;
pub use settings::{QualityPreset, Settings};
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per 60 Hz display refresh)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta accepted by the driver (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Logical play field (all sim coordinates live in this space)
    pub const FIELD_WIDTH: f32 = 900.0;
    pub const FIELD_HEIGHT: f32 = 400.0;

    /// Player sprite at size multiplier 1.0
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 50.0;

    /// Falling entity hit box edge
    pub const ENTITY_SIZE: f32 = 30.0;
    /// Number of obstacle sprite variants
    pub const OBSTACLE_VARIANTS: u8 = 2;

    /// Session starting values
    pub const MAX_HEALTH: u8 = 5;
    pub const BASE_SPEED_MULTIPLIER: f32 = 1.0;
    pub const BASE_SIZE_MULTIPLIER: f32 = 1.0;
    pub const MAX_SIZE_MULTIPLIER: f32 = 2.0;
}

/// Wrap an angle in degrees to [0, 360)
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Convert milliseconds to a whole number of simulation ticks (at least one)
#[inline]
pub fn ms_to_ticks(ms: u32) -> u32 {
    let ticks = (ms as f32 / 1000.0 / consts::SIM_DT).round() as u32;
    ticks.max(1)
}

/// Clamp a point into the play field
#[inline]
pub fn clamp_to_field(pos: Vec2) -> Vec2 {
    pos.clamp(
        Vec2::ZERO,
        Vec2::new(consts::FIELD_WIDTH, consts::FIELD_HEIGHT),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(0.0), 0.0);
        assert!((wrap_degrees(370.0) - 10.0).abs() < 1e-4);
        assert!((wrap_degrees(-10.0) - 350.0).abs() < 1e-4);
        assert!(wrap_degrees(-1e-9) < 360.0);
    }

    #[test]
    fn test_ms_to_ticks() {
        assert_eq!(ms_to_ticks(500), 30);
        assert_eq!(ms_to_ticks(1000), 60);
        assert_eq!(ms_to_ticks(0), 1);
    }

    #[test]
    fn test_clamp_to_field() {
        let p = clamp_to_field(Vec2::new(-5.0, 1000.0));
        assert_eq!(p, Vec2::new(0.0, consts::FIELD_HEIGHT));
    }
}
