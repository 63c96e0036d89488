//! Ground/air detection for the player, using three short downward rays.

use glam::Vec2;
use rapier2d::prelude::RigidBodyHandle;

use crate::core::physics::{PhysicsWorld, RayControl};
use crate::world::categories::CATEGORY_FLOOR_UNJUMPABLE;

/// Ray length below the body centre, before scaling.
const PROBE_DEPTH: f32 = 0.5;

/// What is under the player's feet this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroundContact {
    pub in_air: bool,
    pub can_jump: bool,
}

impl GroundContact {
    const AIRBORNE: Self = Self {
        in_air: true,
        can_jump: false,
    };
}

/// Cast rays down from `x - hw*scale`, `x` and `x + hw*scale`, each
/// `0.5*scale` long, ignoring `self_body`.
///
/// Any hit puts the player on the ground. Jump eligibility comes from the
/// last ray, left to right, that hit something; rays that miss leave it
/// unchanged.
pub fn probe(
    position: Vec2,
    half_width: f32,
    scale: f32,
    world: &PhysicsWorld,
    self_body: RigidBodyHandle,
) -> GroundContact {
    let mut contact = GroundContact::AIRBORNE;
    let offset = half_width * scale;
    let depth = PROBE_DEPTH * scale;

    for dx in [-offset, 0.0, offset] {
        let from = Vec2::new(position.x + dx, position.y);
        let to = Vec2::new(from.x, from.y - depth);

        let mut nearest = None;
        world.ray_cast(from, to, |hit| {
            if hit.body_handle == Some(self_body) {
                return RayControl::Skip;
            }
            nearest = Some(hit.filter.category);
            RayControl::Stop
        });

        if let Some(category) = nearest {
            contact.in_air = false;
            contact.can_jump = category != CATEGORY_FLOOR_UNJUMPABLE;
        }
    }
    contact
}
