pub mod runner;

pub use runner::GameRunner;

use std::cell::RefCell;

use robotm_core::{GameConfig, InputEvent, LevelDesc, RobotGame};
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<GameRunner<RobotGame>>> = const { RefCell::new(None) };
}

/// Run `f` against the runner. Calls made before `game_init` are logged and
/// ignored.
fn with_runner<R: Default>(f: impl FnOnce(&mut GameRunner<RobotGame>) -> R) -> R {
    RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
        Some(runner) => f(runner),
        None => {
            log::error!("game not initialized, call game_init() first");
            R::default()
        }
    })
}

fn parse_or_default<T: Default, E: std::fmt::Display>(
    what: &str,
    json: &str,
    parse: fn(&str) -> Result<T, E>,
) -> T {
    if json.trim().is_empty() {
        return T::default();
    }
    parse(json).unwrap_or_else(|err| {
        log::error!("invalid {what} JSON, using defaults: {err}");
        T::default()
    })
}

/// Build the game. Empty strings select the built-in config and level.
#[wasm_bindgen]
pub fn game_init(config_json: &str, level_json: &str) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let config = parse_or_default("config", config_json, GameConfig::from_json);
    let level = parse_or_default("level", level_json, LevelDesc::from_json);
    let runner = GameRunner::new(RobotGame::new(config, level));

    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });

    with_runner(|r| r.init());
    log::info!("robotm: initialized");
}

#[wasm_bindgen]
pub fn game_tick(dt: f32) {
    with_runner(|r| r.tick(dt));
}

#[wasm_bindgen]
pub fn game_key_down(key_code: u32) {
    with_runner(|r| r.push_input(InputEvent::KeyDown { key_code }));
}

#[wasm_bindgen]
pub fn game_key_up(key_code: u32) {
    with_runner(|r| r.push_input(InputEvent::KeyUp { key_code }));
}

#[wasm_bindgen]
pub fn game_custom_event(kind: u32, a: f32, b: f32, c: f32) {
    with_runner(|r| r.push_input(InputEvent::Custom { kind, a, b, c }));
}

#[wasm_bindgen]
pub fn game_load_manifest(json: &str) {
    with_runner(|r| r.load_manifest(json));
}

// ---- Frame buffer accessors ----

/// Copy of the packed frame buffer.
#[wasm_bindgen]
pub fn get_frame() -> js_sys::Float32Array {
    RUNNER.with(|cell| match cell.borrow().as_ref() {
        Some(r) => js_sys::Float32Array::from(r.frame()),
        None => js_sys::Float32Array::new_with_length(0),
    })
}

#[wasm_bindgen]
pub fn get_frame_ptr() -> *const f32 {
    RUNNER.with(|cell| {
        cell.borrow()
            .as_ref()
            .map_or(std::ptr::null(), |r| r.frame_ptr())
    })
}

#[wasm_bindgen]
pub fn get_buffer_total_floats() -> u32 {
    with_runner(|r| r.layout().buffer_total_floats as u32)
}

#[wasm_bindgen]
pub fn get_world_width() -> f32 {
    with_runner(|r| r.config().screen_width)
}

#[wasm_bindgen]
pub fn get_world_height() -> f32 {
    with_runner(|r| r.config().screen_height)
}
