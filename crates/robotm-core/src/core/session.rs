use bytemuck::{Pod, Zeroable};

/// Session-wide state shared between the player systems, the game loop and
/// the HUD. Owned by `EngineContext` and reset when a new round starts.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSession {
    /// Last published player hp, for the health bar.
    pub player_hp: f32,
    pub full_hp: f32,
    /// Raised once the player's death countdown ran out.
    pub game_over: bool,
    /// Vertical centre of the camera in world units.
    pub camera_y: f32,
    pub screen_width: f32,
    pub screen_height: f32,
    /// Pre-round "get ready" phase; player input is ignored while set.
    pub ready: bool,
}

impl GameSession {
    pub fn new(screen_width: f32, screen_height: f32, full_hp: f32) -> Self {
        Self {
            player_hp: full_hp,
            full_hp,
            game_over: false,
            camera_y: 0.0,
            screen_width,
            screen_height,
            ready: true,
        }
    }

    /// Lowest y a body may reach before it counts as fallen out of the world.
    pub fn kill_line(&self) -> f32 {
        self.camera_y - self.screen_height / 2.0 - 1.0
    }

    /// Back to the start-of-round state, keeping the screen dimensions.
    pub fn reset(&mut self, camera_y: f32) {
        self.player_hp = self.full_hp;
        self.game_over = false;
        self.camera_y = camera_y;
        self.ready = true;
    }

    pub fn snapshot(&self) -> HudSnapshot {
        HudSnapshot {
            player_hp: self.player_hp,
            full_hp: self.full_hp,
            game_over: if self.game_over { 1.0 } else { 0.0 },
            ready: if self.ready { 1.0 } else { 0.0 },
            camera_y: self.camera_y,
            screen_width: self.screen_width,
            screen_height: self.screen_height,
            _pad: 0.0,
        }
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(10.0, 15.0, 100.0)
    }
}

/// HUD state as read by the host. 8 floats.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct HudSnapshot {
    pub player_hp: f32,
    pub full_hp: f32,
    pub game_over: f32,
    pub ready: f32,
    pub camera_y: f32,
    pub screen_width: f32,
    pub screen_height: f32,
    _pad: f32,
}

impl HudSnapshot {
    pub const FLOATS: usize = 8;
}
