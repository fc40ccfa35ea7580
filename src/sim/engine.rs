//! Single-owner façade over the simulation
//!
//! Hosts (the wasm binding, the native runner, tests) drive one `Engine` per
//! run: call [`Engine::update`] at the fixed rate, feed player actions in
//! between, and read [`Engine::snapshot`] / [`Engine::events`] after each tick.

use super::rng::Lcg;
use super::state::{GameEvent, GameState, Snapshot};
use super::tick::{drop_from_rack, move_catcher, tick, toggle_pause};
use crate::tuning::{Tuning, TuningError};

/// The match simulation engine
#[derive(Debug, Clone)]
pub struct Engine {
    state: GameState,
    /// Events from the most recent `update()` plus any player actions since
    events: Vec<GameEvent>,
}

impl Engine {
    /// Engine with an explicit seed and default tuning
    pub fn new(seed: u64) -> Self {
        Self::from_parts(Lcg::new(seed), Tuning::default())
    }

    /// Engine with an explicit seed and custom balance. Rejects tuning the
    /// tick loop cannot run with.
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::from_parts(Lcg::new(seed), tuning))
    }

    /// Engine seeded from the wall clock
    pub fn from_clock() -> Self {
        Self::from_parts(Lcg::from_clock(), Tuning::default())
    }

    fn from_parts(rng: Lcg, tuning: Tuning) -> Self {
        log::info!("New Klax run (rng state {})", rng.state());
        Self {
            state: GameState::with_tuning(rng, tuning),
            events: Vec::new(),
        }
    }

    /// Advance one fixed tick. Replaces the event buffer.
    pub fn update(&mut self) {
        self.events.clear();
        tick(&mut self.state, &mut self.events);
    }

    pub fn move_left(&mut self) -> bool {
        move_catcher(&mut self.state, false)
    }

    pub fn move_right(&mut self) -> bool {
        move_catcher(&mut self.state, true)
    }

    /// Drop the front rack tile under the catcher. Its events join the current buffer.
    pub fn drop_from_rack(&mut self) -> bool {
        drop_from_rack(&mut self.state, &mut self.events)
    }

    pub fn toggle_pause(&mut self) {
        toggle_pause(&mut self.state);
    }

    /// Start a new run. The RNG stream carries on rather than reseeding.
    pub fn reset(&mut self) {
        self.state.restart();
        self.events.clear();
        log::info!("Run reset");
    }

    /// Owned copy of the visible state
    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    /// Events from the most recent tick. Reading does not clear them.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    /// Read-only access to the full state (replays, debugging)
    pub fn game(&self) -> &GameState {
        &self.state
    }

    /// Direct state access for scenario setup
    pub fn game_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}
