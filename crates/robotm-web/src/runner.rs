use robotm_core::assets::catalog::AssetCatalog;
use robotm_core::bridge::protocol::FrameData;
use robotm_core::systems::render::build_render_buffer;
use robotm_core::world::builder::REQUIRED_REGIONS;
use robotm_core::{
    AssetManifest, EngineContext, FixedTimestep, Game, GameConfig, InputEvent, InputQueue,
    ProtocolLayout, RenderBuffer,
};

/// Generic game runner that wires up the engine loop.
///
/// The crate root keeps one runner in a `thread_local!` and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    render_buffer: RenderBuffer,
    timestep: FixedTimestep,
    config: GameConfig,
    layout: ProtocolLayout,
    initialized: bool,
    frame_counter: u32,
    /// Packed frame, laid out by `layout`.
    frame: Vec<f32>,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let layout = ProtocolLayout::from_config(&config);

        Self {
            ctx: EngineContext::new(&config),
            timestep: FixedTimestep::new(config.fixed_dt),
            render_buffer: RenderBuffer::new(),
            frame: vec![0.0; layout.buffer_total_floats],
            game,
            input: InputQueue::new(),
            layout,
            config,
            initialized: false,
            frame_counter: 0,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.game.init(&mut self.ctx);
        self.initialized = true;
        self.pack_frame();
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Replace the atlas catalog. Takes effect when the world is next built.
    /// Manifests that fail to parse or lack a region the world builder needs
    /// are rejected and the current catalog stays.
    pub fn load_manifest(&mut self, json: &str) {
        let manifest = match AssetManifest::from_json(json) {
            Ok(manifest) => manifest,
            Err(err) => {
                log::error!("invalid asset manifest, keeping the current one: {err}");
                return;
            }
        };

        let catalog = AssetCatalog::from_manifest(&manifest);
        let missing = catalog.missing(&REQUIRED_REGIONS);
        if !missing.is_empty() {
            log::error!("asset manifest lacks regions {missing:?}, keeping the current one");
            return;
        }

        self.ctx.assets = catalog;
        log::info!("asset manifest loaded: {} regions", self.ctx.assets.len());
    }

    /// Run one frame tick: fixed-step updates with physics, then pack the
    /// frame buffer.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        self.ctx.clear_frame_data();

        let steps = self.timestep.accumulate(dt);
        if steps > 0 {
            // Key presses are edge-triggered: only the first step sees them.
            let frame_input = self.input.take();
            let empty = InputQueue::new();
            for step in 0..steps {
                let input = if step == 0 { &frame_input } else { &empty };
                self.game.update(&mut self.ctx, input);
                self.ctx.step_physics();
            }
        }

        self.pack_frame();
    }

    fn pack_frame(&mut self) {
        build_render_buffer(self.ctx.scene.iter(), &mut self.render_buffer, self.layout.max_instances);
        self.frame_counter = self.frame_counter.wrapping_add(1);
        self.layout.pack(
            &FrameData {
                frame_counter: self.frame_counter,
                instances: &self.render_buffer.instances,
                audio: self.ctx.audio.commands(),
                events: &self.ctx.events,
                hud: self.ctx.session.snapshot(),
            },
            &mut self.frame,
        );
    }

    // ---- Accessors for the host ----

    pub fn frame(&self) -> &[f32] {
        &self.frame
    }

    pub fn frame_ptr(&self) -> *const f32 {
        self.frame.as_ptr()
    }

    pub fn layout(&self) -> &ProtocolLayout {
        &self.layout
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn game(&self) -> &G {
        &self.game
    }
}
