//! JavaScript binding
//!
//! The page's renderer/input/audio layers own the canvas and the DOM; they
//! call into `KlaxGame` once per animation frame and pull JSON snapshots and
//! events back out.

use wasm_bindgen::prelude::*;

use crate::driver::{FixedStep, FrameEvents};
use crate::highscores::HighScores;
use crate::sim::Engine;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Klax 3D core loaded");
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Game instance holding the engine, frame clock and leaderboard
#[wasm_bindgen]
pub struct KlaxGame {
    engine: Engine,
    clock: FixedStep,
    high_scores: HighScores,
    /// Events of the last `advanceFrame`, including drops made before it
    frame_events: FrameEvents,
}

#[wasm_bindgen]
impl KlaxGame {
    /// New run; seeds from `Date.now()` when no seed is given
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<f64>) -> KlaxGame {
        let engine = match seed {
            Some(seed) => Engine::new(seed as u64),
            None => Engine::from_clock(),
        };
        KlaxGame {
            engine,
            clock: FixedStep::new(),
            high_scores: HighScores::load(),
            frame_events: FrameEvents::new(),
        }
    }

    /// Advance exactly one tick
    pub fn update(&mut self) {
        let was_over = self.engine.is_game_over();
        self.engine.update();
        self.record_game_over(was_over);
    }

    /// Feed a frame delta in seconds; runs the due ticks and returns how many ran
    #[wasm_bindgen(js_name = advanceFrame)]
    pub fn advance_frame(&mut self, dt_secs: f64) -> u32 {
        let was_over = self.engine.is_game_over();
        let ticks = self
            .frame_events
            .run_frame(&mut self.clock, &mut self.engine, dt_secs);
        self.record_game_over(was_over);
        ticks
    }

    /// Render interpolation factor in [0, 1)
    pub fn alpha(&self) -> f64 {
        self.clock.alpha()
    }

    #[wasm_bindgen(js_name = moveLeft)]
    pub fn move_left(&mut self) -> bool {
        self.engine.move_left()
    }

    #[wasm_bindgen(js_name = moveRight)]
    pub fn move_right(&mut self) -> bool {
        self.engine.move_right()
    }

    #[wasm_bindgen(js_name = dropFromRack)]
    pub fn drop_from_rack(&mut self) -> bool {
        let was_over = self.engine.is_game_over();
        let dropped = self.frame_events.drop_from_rack(&mut self.engine);
        self.record_game_over(was_over);
        dropped
    }

    #[wasm_bindgen(js_name = togglePause)]
    pub fn toggle_pause(&mut self) {
        self.engine.toggle_pause();
    }

    pub fn reset(&mut self) {
        self.engine.reset();
        self.clock.reset();
        self.frame_events.clear();
    }

    /// Snapshot as JSON
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.engine.snapshot()).map_err(to_js_error)
    }

    /// Events of the most recent tick as a JSON array
    #[wasm_bindgen(js_name = getEvents)]
    pub fn get_events(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.engine.events()).map_err(to_js_error)
    }

    /// Events of the last `advanceFrame` as a JSON array: drops made since the
    /// previous frame, then every tick run
    #[wasm_bindgen(js_name = getFrameEvents)]
    pub fn get_frame_events(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.frame_events.events()).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = getHighScores)]
    pub fn get_high_scores(&self) -> Result<String, JsValue> {
        self.high_scores.to_json().map_err(to_js_error)
    }
}

impl KlaxGame {
    /// Submit the final score once, on the transition into game over
    fn record_game_over(&mut self, was_over: bool) {
        if was_over || !self.engine.is_game_over() {
            return;
        }
        let snap = self.engine.snapshot();
        if let Some(rank) = self
            .high_scores
            .add_score(snap.score, snap.level, js_sys::Date::now())
        {
            log::info!("New high score #{}: {}", rank, snap.score);
            self.high_scores.save();
        }
    }
}
