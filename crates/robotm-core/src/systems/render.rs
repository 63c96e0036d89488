use crate::components::entity::Entity;
use crate::renderer::instance::{RenderBuffer, RenderInstance};

/// Build the render buffer from a set of entities.
/// Inactive entities and entities without a sprite are skipped; at most
/// `max` instances are written.
pub fn build_render_buffer<'a>(
    entities: impl Iterator<Item = &'a Entity>,
    buffer: &mut RenderBuffer,
    max: usize,
) {
    buffer.clear();

    for entity in entities {
        if buffer.instances.len() >= max {
            log::warn!("render buffer full, dropping sprites past {max}");
            break;
        }
        if !entity.active {
            continue;
        }
        let Some(sprite) = &entity.sprite else {
            continue;
        };

        let (src_x, src_y, src_w, src_h) = sprite.source_rect();
        let width = if sprite.flip_x { -entity.scale.x } else { entity.scale.x };
        buffer.push(RenderInstance {
            x: entity.pos.x,
            y: entity.pos.y,
            width,
            height: entity.scale.y,
            src_x,
            src_y,
            src_w,
            src_h,
            atlas: sprite.region.atlas.0 as f32,
            alpha: sprite.alpha,
        });
    }
}
