use serde::{Deserialize, Serialize};

use crate::audio::LoopHandle;

/// Tuning constants for the player robot. Loaded as part of `GameConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub full_hp: f32,
    pub damage_per_second: f32,
    pub hp_regen_per_second: f32,
    /// Seconds without damage before regeneration starts.
    pub hp_regen_cooldown: f32,
    /// Vertical velocity set by a jump or a spring.
    pub jump_force: f32,
    /// Horizontal velocity while a direction is held.
    pub move_speed: f32,
    /// How long the reduced collision mask lasts after hitting the ceiling.
    pub hit_ceiling_duration: f32,
    /// Seconds between the explosion and the game-over signal.
    pub dead_duration: f32,
    /// Sprite/body scale; the ground probe scales with it.
    pub scale: f32,
    /// Horizontal offset of the outer ground rays, before scaling.
    pub probe_half_width: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            full_hp: 100.0,
            damage_per_second: 40.0,
            hp_regen_per_second: 10.0,
            hp_regen_cooldown: 3.0,
            jump_force: 7.0,
            move_speed: 4.0,
            hit_ceiling_duration: 0.3,
            dead_duration: 2.0,
            scale: 1.0,
            probe_half_width: 0.45,
        }
    }
}

/// Which way the robot sprite looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Per-player status. Mutated by contact tracking and by the player system.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub tuning: PlayerTuning,
    pub hp: f32,
    pub hp_regen_cooldown: f32,
    /// Hazard contacts currently touching the robot.
    pub lethal_contact_count: u32,
    pub hit_ceiling: bool,
    pub hit_ceiling_countdown: f32,
    /// Set by a spring contact, consumed on the next update.
    pub hit_spring: bool,
    pub explosion_effect_triggered: bool,
    pub dead_countdown: f32,
    pub game_over_signalled: bool,
    /// Looping "damaged" voice, started on first damage.
    pub damaged_loop: Option<LoopHandle>,
    pub facing: Facing,
}

impl PlayerState {
    pub fn new(tuning: PlayerTuning) -> Self {
        Self {
            tuning,
            hp: tuning.full_hp,
            hp_regen_cooldown: tuning.hp_regen_cooldown,
            lethal_contact_count: 0,
            hit_ceiling: false,
            hit_ceiling_countdown: tuning.hit_ceiling_duration,
            hit_spring: false,
            explosion_effect_triggered: false,
            dead_countdown: tuning.dead_duration,
            game_over_signalled: false,
            damaged_loop: None,
            facing: Facing::Right,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }

    /// Taking damage this frame: touching a hazard or squeezed by the ceiling.
    pub fn is_hurting(&self) -> bool {
        self.lethal_contact_count > 0 || self.hit_ceiling
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new(PlayerTuning::default())
    }
}
