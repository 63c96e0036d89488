//! Entity and body construction for everything in a level.

use glam::Vec2;

use crate::api::game::EngineContext;
use crate::api::types::EntityId;
use crate::components::animation::{AnimationComponent, AnimationDef};
use crate::components::entity::Entity;
use crate::components::player::{PlayerState, PlayerTuning};
use crate::components::sprite::SpriteComponent;
use crate::core::physics::{BodyDesc, ColliderDesc, ColliderMaterial, CollisionFilter};
use crate::world::categories::*;
use crate::world::level::{FloorKind, LevelDesc};
use crate::world::tags;

/// Atlas pixels per world unit.
pub const PPM: f32 = 64.0;

/// Atlas regions the builders draw from. A catalog lacking any of them
/// cannot build a level.
pub const REQUIRED_REGIONS: [&str; 6] = ["RobotM", "Explosion", "Grass", "Stone", "Spikes", "Spring"];

const TILE_PX: f32 = 64.0;
const PLAYER_HALF_WIDTH: f32 = 0.45;
const PLAYER_HALF_HEIGHT: f32 = 0.3;
const PLAYER_FOOT_Y: f32 = -0.375;
const PLAYER_DENSITY: f32 = 0.5;
const EXPLOSION_FRAMES: u32 = 8;
const EXPLOSION_FPS: f32 = 16.0;
const EXPLOSION_SIZE: f32 = 1.5;

/// Builds level entities into an `EngineContext`, using its physics world,
/// scene and asset catalog.
///
/// Builders panic when an atlas region is missing from the catalog.
pub struct WorldBuilder<'a> {
    ctx: &'a mut EngineContext,
    tuning: PlayerTuning,
}

impl<'a> WorldBuilder<'a> {
    pub fn new(ctx: &'a mut EngineContext) -> Self {
        Self {
            ctx,
            tuning: PlayerTuning::default(),
        }
    }

    /// Tuning handed to players created by this builder.
    pub fn with_tuning(mut self, tuning: PlayerTuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Spawn the robot at (`x`, `y`): a box body with a flat foot edge.
    pub fn create_player(&mut self, x: f32, y: f32) -> EntityId {
        let region = self
            .ctx
            .assets
            .require_sub_region("RobotM", 0.0, 0.0, 64.0, 48.0);
        let animation = AnimationComponent::default()
            .with("idle", AnimationDef::still(3.0, 0.0))
            .with("move", AnimationDef::horizontal_strip(0.0, 0.0, 3, 10.0))
            .with("fall", AnimationDef::still(4.0, 0.0));

        let id = self.ctx.next_id();
        let entity = Entity::new(id)
            .with_tag(tags::PLAYER)
            .with_scale(Vec2::new(64.0 / PPM, 48.0 / PPM) * self.tuning.scale)
            .with_sprite(SpriteComponent::new(region).with_frame(3.0, 0.0))
            .with_animation(animation)
            .with_player(PlayerState::new(self.tuning));

        let desc = BodyDesc::dynamic(ColliderDesc::Cuboid {
            half_width: PLAYER_HALF_WIDTH,
            half_height: PLAYER_HALF_HEIGHT,
        })
        .with_extra_collider(ColliderDesc::Segment {
            a: Vec2::new(-PLAYER_HALF_WIDTH, PLAYER_FOOT_Y),
            b: Vec2::new(PLAYER_HALF_WIDTH, PLAYER_FOOT_Y),
        })
        .with_position(Vec2::new(x, y))
        .with_fixed_rotation(true)
        .with_filter(CollisionFilter::new(CATEGORY_PLAYER, MASK_PLAYER));

        let material = ColliderMaterial {
            density: PLAYER_DENSITY,
            ..Default::default()
        };
        self.ctx.spawn_with_body(entity, desc, material);
        log::info!("player {:?} spawned at ({x}, {y})", id);
        id
    }

    /// A horizontal strip of `width` unit tiles starting at (`x`, `y`).
    /// End tiles get end-cap art; a single tile gets the standalone piece.
    pub fn create_floor(&mut self, x: f32, y: f32, width: u32, kind: FloorKind) {
        let (category, tag) = match kind {
            FloorKind::Grass => (CATEGORY_FLOOR, tags::FLOOR),
            FloorKind::Stone => (CATEGORY_FLOOR_UNJUMPABLE, tags::FLOOR),
            FloorKind::Spikes => (CATEGORY_HAZARD, tags::SPIKES),
            FloorKind::Spring => (CATEGORY_SPRING, tags::SPRING),
        };

        for i in 0..width {
            let cell = if width == 1 {
                0.0
            } else if i == 0 {
                1.0
            } else if i == width - 1 {
                3.0
            } else {
                2.0
            };
            self.spawn_tile(Vec2::new(x + i as f32, y), kind.region(), cell, category, tag);
        }
    }

    /// Two columns of `height` tiles at `left` and `right`, from `top` upwards.
    pub fn create_wall(&mut self, left: f32, right: f32, top: f32, height: u32, kind: FloorKind) {
        for i in 0..height {
            let y = top + i as f32;
            for x in [left, right] {
                self.spawn_tile(Vec2::new(x, y), kind.region(), 5.0, CATEGORY_STATIC_OBSTACLE, tags::WALL);
            }
        }
    }

    /// The spike strip at the top of the screen.
    pub fn create_ceiling(&mut self, x: f32, y: f32, width: u32) {
        for i in 0..width {
            self.spawn_tile(Vec2::new(x + i as f32, y), "Spikes", 4.0, CATEGORY_CEILING, tags::CEILING);
        }
    }

    /// A one-shot explosion animation; removed when it finishes.
    pub fn create_player_explosion_effect(&mut self, x: f32, y: f32) -> EntityId {
        let region = self
            .ctx
            .assets
            .require_sub_region("Explosion", 0.0, 0.0, TILE_PX, TILE_PX);
        let animation = AnimationComponent::single(
            "explode",
            AnimationDef::horizontal_strip(0.0, 0.0, EXPLOSION_FRAMES, EXPLOSION_FPS).once(),
        );
        let id = self.ctx.next_id();
        self.ctx.scene.spawn(
            Entity::new(id)
                .with_tag(tags::EXPLOSION)
                .with_pos(Vec2::new(x, y))
                .with_scale(Vec2::splat(EXPLOSION_SIZE))
                .with_sprite(SpriteComponent::new(region))
                .with_animation(animation),
        );
        id
    }

    /// Build every piece of `level` and spawn the player. Returns the player.
    pub fn build_level(&mut self, level: &LevelDesc) -> EntityId {
        for wall in &level.walls {
            self.create_wall(wall.left, wall.right, wall.top, wall.height, wall.kind);
        }
        for floor in &level.floors {
            self.create_floor(floor.x, floor.y, floor.width, floor.kind);
        }
        if let Some(ceiling) = &level.ceiling {
            self.create_ceiling(ceiling.x, ceiling.y, ceiling.width);
        }
        let player = self.create_player(level.player_spawn.x, level.player_spawn.y);
        self.ctx.physics.update_queries();
        player
    }

    fn spawn_tile(&mut self, pos: Vec2, region: &str, cell: f32, category: u32, tag: &str) {
        let region = self
            .ctx
            .assets
            .require_sub_region(region, cell * TILE_PX, 0.0, TILE_PX, TILE_PX);
        let id = self.ctx.next_id();
        let entity = Entity::new(id)
            .with_tag(tag)
            .with_sprite(SpriteComponent::new(region));
        let desc = BodyDesc::fixed(ColliderDesc::Cuboid {
            half_width: 0.5,
            half_height: 0.5,
        })
        .with_position(pos)
        .with_filter(CollisionFilter::new(category, MASK_STATIC_OBSTACLE));
        self.ctx.spawn_with_body(entity, desc, ColliderMaterial::default());
    }
}
