//! One-shot visual effects.

use crate::api::game::EngineContext;
use crate::world::tags;

/// Remove explosion effects whose animation has played through.
/// Returns how many were removed.
pub fn cleanup_finished_effects(ctx: &mut EngineContext) -> usize {
    let removed = ctx.scene.despawn_where(|e| {
        e.tag == tags::EXPLOSION && e.animation.as_ref().map_or(true, |a| a.is_finished())
    });
    for entity in &removed {
        if let Some(body) = &entity.body {
            ctx.physics.remove_body(body);
        }
    }
    removed.len()
}
