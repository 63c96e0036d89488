//! Turns physics collision events into player status flags.

use crate::api::types::EntityId;
use crate::core::physics::CollisionPair;
use crate::core::scene::Scene;
use crate::world::tags;

/// Apply the collision events of the last physics step to every player
/// they involve.
///
/// Spikes count while touching. Ceiling and spring contacts only set a flag
/// on start; the player system consumes it.
pub fn apply_contacts(scene: &mut Scene, events: &[CollisionPair]) {
    let players: Vec<EntityId> = scene.players().map(|e| e.id).collect();

    for event in events {
        for &player in &players {
            let Some(other) = event.other(player) else {
                continue;
            };
            let Some(tag) = scene.tag_of(other).map(str::to_owned) else {
                continue;
            };
            let Some(state) = scene.get_mut(player).and_then(|e| e.player.as_mut()) else {
                continue;
            };

            match (tag.as_str(), event.started) {
                (tags::SPIKES, true) => state.lethal_contact_count += 1,
                (tags::SPIKES, false) => {
                    state.lethal_contact_count = state.lethal_contact_count.saturating_sub(1)
                }
                (tags::CEILING, true) => {
                    if !state.hit_ceiling {
                        log::debug!("player {:?} hit the ceiling", player);
                    }
                    state.hit_ceiling = true;
                }
                (tags::SPRING, true) => state.hit_spring = true,
                _ => {}
            }
        }
    }
}
