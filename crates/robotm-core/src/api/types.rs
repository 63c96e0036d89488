use bytemuck::{Pod, Zeroable};

/// Unique identifier for an entity in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub u32);

/// A game event communicated from Rust to the host page.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GameEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl GameEvent {
    pub const FLOATS: usize = 4;

    /// The player exploded at (`a`, `b`).
    pub const PLAYER_DIED: f32 = 1.0;
    /// The death countdown ran out; the host should show the game-over screen.
    pub const GAME_OVER: f32 = 2.0;
    /// The "get ready" countdown finished and control was handed to the player.
    pub const ROUND_STARTED: f32 = 3.0;

    pub fn player_died(x: f32, y: f32) -> Self {
        Self { kind: Self::PLAYER_DIED, a: x, b: y, c: 0.0 }
    }

    pub fn game_over() -> Self {
        Self { kind: Self::GAME_OVER, ..Default::default() }
    }

    pub fn round_started() -> Self {
        Self { kind: Self::ROUND_STARTED, ..Default::default() }
    }
}
