use glam::Vec2;
use crate::api::types::EntityId;
use crate::components::animation::AnimationComponent;
use crate::components::player::PlayerState;
use crate::components::sprite::SpriteComponent;
use crate::core::physics::PhysicsBody;

/// Fat entity: one struct with optional components.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// String tag for finding entities by kind ("player", "spikes", ...).
    pub tag: String,
    /// Whether this entity is active (inactive entities are skipped).
    pub active: bool,
    /// Position in world space (Y up).
    pub pos: Vec2,
    /// Rendered size in world units.
    pub scale: Vec2,
    /// Sprite. Entities without one are not drawn.
    pub sprite: Option<SpriteComponent>,
    pub animation: Option<AnimationComponent>,
    pub body: Option<PhysicsBody>,
    pub player: Option<PlayerState>,
}

impl Entity {
    /// Create a new entity with the given ID at the origin.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: String::new(),
            active: true,
            pos: Vec2::ZERO,
            scale: Vec2::ONE,
            sprite: None,
            animation: None,
            body: None,
            player: None,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_sprite(mut self, sprite: SpriteComponent) -> Self {
        self.sprite = Some(sprite);
        self
    }

    pub fn with_animation(mut self, animation: AnimationComponent) -> Self {
        self.animation = Some(animation);
        self
    }

    pub fn with_body(mut self, body: PhysicsBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_player(mut self, player: PlayerState) -> Self {
        self.player = Some(player);
        self
    }

    /// Remove the sprite so the entity is no longer drawn.
    pub fn detach_sprite(&mut self) -> Option<SpriteComponent> {
        self.sprite.take()
    }
}
