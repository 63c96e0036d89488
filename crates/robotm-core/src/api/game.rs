use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::types::{EntityId, GameEvent};
use crate::assets::catalog::AssetCatalog;
use crate::audio::AudioQueue;
use crate::components::entity::Entity;
use crate::components::player::PlayerTuning;
use crate::core::physics::{BodyDesc, ColliderMaterial, CollisionPair, PhysicsWorld};
use crate::core::scene::Scene;
use crate::core::session::GameSession;
use crate::input::keyboard::InputBindings;
use crate::input::queue::InputQueue;

/// Engine and gameplay configuration. Every field has a default, so a JSON
/// override only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Visible area in world units (metres).
    pub screen_width: f32,
    pub screen_height: f32,
    /// Camera centre at the start of a round.
    pub camera_y: f32,
    /// Gravity vector. The world is Y-up, so this points down.
    pub gravity: Vec2,
    /// Length of the "get ready" phase before input is accepted.
    pub ready_duration: f32,
    /// Maximum number of render instances per frame.
    pub max_instances: usize,
    /// Maximum number of audio commands per frame.
    pub max_audio: usize,
    /// Maximum number of game events per frame.
    pub max_events: usize,
    pub player: PlayerTuning,
    pub input: InputBindings,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            screen_width: 10.0,
            screen_height: 15.0,
            camera_y: 0.0,
            gravity: Vec2::new(0.0, -10.0),
            ready_duration: 2.0,
            max_instances: 512,
            max_audio: 32,
            max_events: 32,
            player: PlayerTuning::default(),
            input: InputBindings::default(),
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// The contract a game fulfils for the runner.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Build the world and spawn the starting entities.
    fn init(&mut self, ctx: &mut EngineContext);

    /// One fixed step of game logic. Physics is stepped by the runner
    /// afterwards; `input` holds the frame's events on the first step only.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);
}

/// Mutable access to engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    pub scene: Scene,
    pub physics: PhysicsWorld,
    pub audio: AudioQueue,
    pub events: Vec<GameEvent>,
    pub session: GameSession,
    pub assets: AssetCatalog,
    next_id: u32,
    collision_events: Vec<CollisionPair>,
}

impl EngineContext {
    pub fn new(config: &GameConfig) -> Self {
        let mut physics = PhysicsWorld::new(config.gravity);
        physics.set_dt(config.fixed_dt);
        let mut session =
            GameSession::new(config.screen_width, config.screen_height, config.player.full_hp);
        session.camera_y = config.camera_y;
        Self {
            scene: Scene::new(),
            physics,
            audio: AudioQueue::new(),
            events: Vec::new(),
            session,
            assets: AssetCatalog::bundled(),
            next_id: 1,
            collision_events: Vec::new(),
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Emit a game event to be forwarded to the host.
    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Clear per-frame transient data (audio commands, events).
    pub fn clear_frame_data(&mut self) {
        self.audio.clear();
        self.events.clear();
    }

    /// Spawn an entity with a physics body. Returns the EntityId.
    /// The entity's position is set from the BodyDesc.
    pub fn spawn_with_body(
        &mut self,
        entity: Entity,
        desc: BodyDesc,
        material: ColliderMaterial,
    ) -> EntityId {
        let id = entity.id;
        let body = self.physics.create_body(id, &desc, material);
        let entity = entity.with_pos(desc.position).with_body(body);
        self.scene.spawn(entity);
        id
    }

    /// Remove every entity and body, keeping configuration and assets.
    pub fn clear_world(&mut self) {
        for entity in self.scene.iter() {
            if let Some(body) = &entity.body {
                self.physics.remove_body(body);
            }
        }
        self.scene.clear();
        self.collision_events.clear();
        self.physics.update_queries();
    }

    /// Collision events from the most recent physics step.
    pub fn collisions(&self) -> &[CollisionPair] {
        &self.collision_events
    }

    /// Step the physics simulation and sync positions back to entities.
    /// Called by the runner after `Game::update()`.
    pub fn step_physics(&mut self) {
        self.collision_events.clear();
        self.physics.step_into(&mut self.collision_events);

        for entity in self.scene.iter_mut() {
            if let Some(body) = &entity.body {
                entity.pos = self.physics.body_position(body);
            }
        }
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new(&GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::physics::ColliderDesc;

    #[test]
    fn spawn_with_body_creates_entity_and_physics() {
        let mut ctx = EngineContext::default();
        let id = ctx.next_id();
        let desc = BodyDesc::dynamic(ColliderDesc::Cuboid { half_width: 0.5, half_height: 0.5 })
            .with_position(Vec2::new(1.0, 2.0));

        ctx.spawn_with_body(Entity::new(id), desc, ColliderMaterial::default());

        assert_eq!(ctx.scene.len(), 1);
        assert_eq!(ctx.physics.body_count(), 1);
        assert_eq!(ctx.scene.get(id).unwrap().pos, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn clear_world_drops_bodies() {
        let mut ctx = EngineContext::default();
        for _ in 0..3 {
            let id = ctx.next_id();
            let desc = BodyDesc::fixed(ColliderDesc::Cuboid { half_width: 0.5, half_height: 0.5 });
            ctx.spawn_with_body(Entity::new(id), desc, ColliderMaterial::default());
        }
        ctx.clear_world();
        assert!(ctx.scene.is_empty());
        assert_eq!(ctx.physics.body_count(), 0);
    }

    #[test]
    fn step_physics_syncs_positions() {
        let mut ctx = EngineContext::default();
        let id = ctx.next_id();
        let desc = BodyDesc::dynamic(ColliderDesc::Cuboid { half_width: 0.5, half_height: 0.5 })
            .with_position(Vec2::new(0.0, 5.0));
        ctx.spawn_with_body(Entity::new(id), desc, ColliderMaterial::default());

        for _ in 0..10 {
            ctx.step_physics();
        }

        let y = ctx.scene.get(id).unwrap().pos.y;
        assert!(y < 5.0, "entity should follow its falling body: y={}", y);
    }

    #[test]
    fn config_json_overrides_selected_fields() {
        let config = GameConfig::from_json(r#"{ "screen_height": 20.0, "player": { "move_speed": 6.0 } }"#)
            .unwrap();
        assert_eq!(config.screen_height, 20.0);
        assert_eq!(config.player.move_speed, 6.0);
        assert_eq!(config.player.jump_force, PlayerTuning::default().jump_force);
        assert_eq!(config.gravity, Vec2::new(0.0, -10.0));
    }
}
