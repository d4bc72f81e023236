//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod frame;
pub mod rect;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Contact, player_entity_contact};
pub use difficulty::{evaluate as evaluate_difficulty, update_difficulty};
pub use frame::RenderableFrame;
pub use rect::Rect;
pub use spawn::{maybe_spawn, roll_entity, roll_entity_of_kind, spawn_fast_burst};
pub use state::{
    DifficultyPhase, Effect, EffectKind, Entity, EntityKind, GameEvent, GamePhase, GameState,
    Player,
};
pub use tick::{TickInput, tick};
