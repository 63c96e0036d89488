//! The RobotM game: round lifecycle and per-step system order.

use crate::api::game::{EngineContext, Game, GameConfig};
use crate::api::types::{EntityId, GameEvent};
use crate::input::keyboard::KeyboardState;
use crate::input::queue::InputQueue;
use crate::systems::animation::tick_animations;
use crate::systems::contacts::apply_contacts;
use crate::systems::effects::cleanup_finished_effects;
use crate::systems::player::update_players;
use crate::world::builder::WorldBuilder;
use crate::world::level::LevelDesc;

/// Custom input event kind sent by the host's restart button.
pub const CUSTOM_RESTART: u32 = 1;

pub struct RobotGame {
    config: GameConfig,
    level: LevelDesc,
    keyboard: KeyboardState,
    ready_timer: f32,
    player: Option<EntityId>,
}

impl RobotGame {
    pub fn new(config: GameConfig, level: LevelDesc) -> Self {
        Self {
            ready_timer: config.ready_duration,
            config,
            level,
            keyboard: KeyboardState::new(),
            player: None,
        }
    }

    /// The current round's player, once a round has started.
    pub fn player(&self) -> Option<EntityId> {
        self.player
    }

    fn start_round(&mut self, ctx: &mut EngineContext) {
        ctx.clear_world();
        ctx.session.reset(self.config.camera_y);
        self.keyboard.reset();
        self.ready_timer = self.config.ready_duration;

        let player = WorldBuilder::new(ctx)
            .with_tuning(self.config.player)
            .build_level(&self.level);
        self.player = Some(player);
        log::info!("round built with {} entities", ctx.scene.len());
    }
}

impl Default for RobotGame {
    fn default() -> Self {
        Self::new(GameConfig::default(), LevelDesc::default())
    }
}

impl Game for RobotGame {
    fn config(&self) -> GameConfig {
        self.config.clone()
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        self.start_round(ctx);
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        let dt = self.config.fixed_dt;

        if ctx.session.game_over && input.has_custom(CUSTOM_RESTART) {
            log::info!("restart requested");
            self.start_round(ctx);
            return;
        }

        if ctx.session.ready {
            self.ready_timer -= dt;
            if self.ready_timer <= 0.0 {
                ctx.session.ready = false;
                ctx.emit_event(GameEvent::round_started());
                log::info!("round started");
            }
        }

        self.keyboard.apply(input);
        let snapshot = self.keyboard.snapshot(&self.config.input);

        let collisions = ctx.collisions().to_vec();
        apply_contacts(&mut ctx.scene, &collisions);
        update_players(ctx, &snapshot, dt);
        self.keyboard.end_step();

        tick_animations(&mut ctx.scene, dt);
        cleanup_finished_effects(ctx);
    }
}
