//! Collision detection between the player and falling entities
//!
//! Hit boxes are axis-aligned rectangles. An entity touches the player when
//! the box it swept through during the last tick overlaps the player's box;
//! touching edges do not count. Sweeping keeps a fast entity from stepping
//! over the player between two ticks.

use glam::Vec2;

use super::state::{Entity, EntityKind, Player};

/// Result of a player/entity check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub entity_id: u32,
    pub kind: EntityKind,
    /// Where the effect should appear: entity center column, player's top edge
    pub point: Vec2,
}

/// Check one entity against the player; `fall` is how far it moved this tick
pub fn player_entity_contact(player: &Player, entity: &Entity, fall: f32) -> Option<Contact> {
    let player_box = player.bounds();
    if !player_box.overlaps(&entity.swept_bounds(fall)) {
        return None;
    }
    Some(Contact {
        entity_id: entity.id,
        kind: entity.kind,
        point: Vec2::new(entity.center().x, player_box.min.y),
    })
}
