pub mod api;
pub mod assets;
pub mod audio;
pub mod bridge;
pub mod components;
pub mod core;
pub mod game;
pub mod input;
pub mod renderer;
pub mod systems;
pub mod world;

// Re-export key types at crate root for convenience
pub use api::game::{EngineContext, Game, GameConfig};
pub use api::types::{EntityId, GameEvent};
pub use assets::catalog::{AssetCatalog, AtlasRegion};
pub use assets::manifest::AssetManifest;
pub use audio::{AudioCommand, AudioQueue, LoopHandle, Sound};
pub use bridge::protocol::ProtocolLayout;
pub use components::animation::{AnimationComponent, AnimationDef};
pub use components::entity::Entity;
pub use components::player::{Facing, PlayerState, PlayerTuning};
pub use components::sprite::{AtlasId, SpriteComponent};
pub use core::physics::{
    BodyDesc, BodyType, ColliderDesc, ColliderMaterial, CollisionFilter, CollisionPair,
    PhysicsBody, PhysicsWorld, RayControl, RayHit,
};
pub use core::scene::Scene;
pub use core::session::{GameSession, HudSnapshot};
pub use core::time::FixedTimestep;
pub use game::RobotGame;
pub use input::keyboard::{InputBindings, InputSnapshot, KeyboardState};
pub use input::queue::{InputEvent, InputQueue};
pub use renderer::instance::{RenderBuffer, RenderInstance};
pub use systems::ground_probe::{probe, GroundContact};
pub use systems::player::{resolve, update_players, PlayerOutcome, PlayerServices};
pub use world::builder::WorldBuilder;
pub use world::level::{FloorKind, LevelDesc};
