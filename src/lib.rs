//! Klax 3D - tile-catching match game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (conveyor, rack, well, matching, progression)
//! - `driver`: Fixed timestep accumulator for hosts
//! - `highscores`: Versioned leaderboard persistence
//! - `tuning`: Data-driven game balance
//! - `web`: JavaScript binding (wasm32 only)

pub mod driver;
pub mod highscores;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use driver::{FixedStep, FrameEvents};
pub use highscores::HighScores;
pub use sim::{Engine, GameEvent, Snapshot};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Logical simulation rate
    pub const SIM_HZ: u32 = 60;
    /// Fixed simulation timestep (seconds)
    pub const SIM_DT: f64 = 1.0 / SIM_HZ as f64;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f64 = 0.1;

    /// Well dimensions
    pub const WELL_COLS: usize = 5;
    pub const WELL_ROWS: usize = 5;
    /// Rack holds at most this many tiles
    pub const RACK_CAPACITY: usize = 5;
    /// Catcher starts centered
    pub const CATCHER_START_COLUMN: usize = WELL_COLS / 2;

    /// Conveyor length in conveyor units (spawn at 0, catch line here)
    pub const CONVEYOR_LENGTH: f64 = 10.0;

    /// Tile colors in the reference palette
    pub const PALETTE_SIZE: u32 = 6;
    pub const POINTS_PER_LEVEL: u64 = 1000;
    pub const STARTING_LIVES: u8 = 3;
}
