//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (tiles oldest first)
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod difficulty;
pub mod engine;
pub mod matching;
pub mod rng;
pub mod state;
pub mod tick;

pub use autopilot::{Action, choose_action};
pub use engine::Engine;
pub use matching::{apply_gravity, find_rack_run, find_well_matches, score_for_run};
pub use rng::Lcg;
pub use state::{
    Color, GameEvent, GamePhase, GameState, LifeLossReason, MatchRun, MatchSource, Rack,
    Snapshot, Tile, Well,
};
pub use tick::{drop_from_rack, move_catcher, tick, toggle_pause};
