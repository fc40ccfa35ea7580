//! Fixed timestep accumulator
//!
//! Presentation runs at whatever rate the host manages; the simulation always
//! advances in whole `SIM_DT` steps. Call [`FixedStep::advance`] once per
//! frame with the wall-clock delta and run `update()` that many times.
//!
//! [`FrameEvents`] collects what a host should react to once per frame: the
//! events of every tick run that frame plus those of player drops made since
//! the previous frame, which `update()` would otherwise clear unseen.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::sim::{Engine, GameEvent};

/// Wall-clock to tick converter
#[derive(Debug, Clone)]
pub struct FixedStep {
    accumulator: f64,
    step: f64,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new()
    }
}

impl FixedStep {
    pub fn new() -> Self {
        Self {
            accumulator: 0.0,
            step: SIM_DT,
        }
    }

    /// Add a frame delta (seconds) and return how many ticks are due
    pub fn advance(&mut self, frame_dt: f64) -> u32 {
        // Long stalls (tab switch, debugger) are clamped rather than replayed
        let dt = frame_dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= self.step && substeps < MAX_SUBSTEPS {
            self.accumulator -= self.step;
            substeps += 1;
        }
        substeps
    }

    /// Advance and run the due ticks on `engine`. Returns ticks run.
    pub fn drive(&mut self, engine: &mut Engine, frame_dt: f64) -> u32 {
        let ticks = self.advance(frame_dt);
        for _ in 0..ticks {
            engine.update();
        }
        ticks
    }

    /// Fraction of a tick left over, for render interpolation
    pub fn alpha(&self) -> f64 {
        self.accumulator / self.step
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Per-frame event union
#[derive(Debug, Clone, Default)]
pub struct FrameEvents {
    /// Events from player actions not yet handed out with a frame
    pending: Vec<GameEvent>,
    /// Events of the last completed frame
    frame: Vec<GameEvent>,
}

impl FrameEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop through the engine, holding its events for the next frame
    pub fn drop_from_rack(&mut self, engine: &mut Engine) -> bool {
        let before = engine.events().len();
        let dropped = engine.drop_from_rack();
        self.pending.extend_from_slice(&engine.events()[before..]);
        dropped
    }

    /// Run the ticks due for `frame_dt`. The frame's events start with any
    /// pending action events, followed by each tick's events in order.
    pub fn run_frame(&mut self, clock: &mut FixedStep, engine: &mut Engine, frame_dt: f64) -> u32 {
        self.frame = std::mem::take(&mut self.pending);
        let ticks = clock.advance(frame_dt);
        for _ in 0..ticks {
            engine.update();
            self.frame.extend_from_slice(engine.events());
        }
        ticks
    }

    /// Events of the last frame. Reading does not clear them.
    pub fn events(&self) -> &[GameEvent] {
        &self.frame
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.frame.clear();
    }
}
