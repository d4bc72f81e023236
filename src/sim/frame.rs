//! Render snapshot handed to the presentation layer once per frame

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::state::{EffectKind, EntityKind, GameEvent, GamePhase, GameState};

/// One falling entity as the renderer needs it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: u32,
    pub pos: Vec2,
    pub kind: EntityKind,
    pub variant: u8,
    pub rotation: f32,
}

/// One live effect as the renderer needs it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectView {
    pub id: u32,
    pub kind: EffectKind,
    pub pos: Vec2,
    /// 0.0 fresh .. 1.0 expired
    pub progress: f32,
}

/// Everything visible after an advance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderableFrame {
    pub phase: GamePhase,
    pub entities: Vec<EntityView>,
    pub effects: Vec<EffectView>,
    pub player: Rect,
    pub score: u64,
    pub health: u8,
    pub max_health: u8,
    pub speed: f32,
    pub size: f32,
    /// Seconds until the next difficulty increase (last few seconds only)
    pub countdown: Option<u32>,
    /// Seconds left before play starts
    pub pregame_countdown: Option<u32>,
    /// Events produced since the previous frame
    pub events: Vec<GameEvent>,
}

impl RenderableFrame {
    /// Snapshot the state; `events` are the ones drained for this frame
    pub fn capture(state: &GameState, events: Vec<GameEvent>) -> Self {
        Self {
            phase: state.phase,
            entities: state
                .entities
                .iter()
                .map(|e| EntityView {
                    id: e.id,
                    pos: e.pos,
                    kind: e.kind,
                    variant: e.variant,
                    rotation: e.rotation,
                })
                .collect(),
            effects: state
                .effects
                .iter()
                .map(|e| EffectView {
                    id: e.id,
                    kind: e.kind,
                    pos: e.pos,
                    progress: e.progress(),
                })
                .collect(),
            player: state.player.bounds(),
            score: state.score,
            health: state.health,
            max_health: state.tuning.max_health,
            speed: state.speed,
            size: state.player.size,
            countdown: if state.phase == GamePhase::Playing {
                state.difficulty.countdown()
            } else {
                None
            },
            pregame_countdown: state.pregame_countdown(),
            events,
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}
