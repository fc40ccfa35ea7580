//! Game state and core simulation types
//!
//! All state the simulation owns lives here. Snapshots handed to the
//! renderer are owned copies, never views into the live state.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::rng::Lcg;
use crate::consts::*;
use crate::tuning::Tuning;

/// Palette index of a tile
pub type Color = u8;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Tick logic suspended, state preserved
    Paused,
    /// Run ended (terminal until reset)
    GameOver,
}

/// A tile riding the conveyor toward the catch line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub id: u32,
    /// Distance travelled, 0 = spawn, [`CONVEYOR_LENGTH`] = catch line
    pub position: f64,
    pub color: Color,
    pub column: usize,
}

/// Why a life was taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeLossReason {
    /// A tile was caught while the rack was full
    RackOverflow,
    /// A tile fell or was dropped into a full well column
    WellColumnFull,
}

impl LifeLossReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifeLossReason::RackOverflow => "rack overflow",
            LifeLossReason::WellColumnFull => "well column full",
        }
    }
}

/// Where a match was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    Well,
    Rack,
}

/// One scored run of identical colors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRun {
    pub color: Color,
    /// Cells as `(row, col)` for well runs, `(0, rack_index)` for rack runs
    pub cells: Vec<(usize, usize)>,
    pub points: u64,
}

impl MatchRun {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Something that happened during the most recent tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// A new tile entered the conveyor
    Spawned { id: u32, color: Color, column: usize },
    /// The catcher took a tile onto the rack
    Caught { id: u32, color: Color, rack_len: usize },
    /// An uncaught tile fell into the well
    Fell {
        id: u32,
        color: Color,
        column: usize,
        row: usize,
    },
    /// The player dropped the front rack tile; `row` is `None` when the column was full
    Dropped {
        color: Color,
        column: usize,
        row: Option<usize>,
    },
    /// One or more runs were cleared
    Matched {
        source: MatchSource,
        runs: Vec<MatchRun>,
        points: u64,
    },
    /// A life was taken
    LifeLost { lives: u8, reason: LifeLossReason },
    /// Score crossed into a new level
    LevelUp { level: u32 },
    /// Lives exhausted
    GameOver { score: u64, level: u32 },
}

/// The well: fixed grid of optional colors, indexed `[row][col]`, row 0 at the top
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Well {
    cells: [[Option<Color>; WELL_COLS]; WELL_ROWS],
}

impl Well {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Color> {
        self.cells[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, color: Option<Color>) {
        self.cells[row][col] = color;
    }

    pub fn rows(&self) -> &[[Option<Color>; WELL_COLS]; WELL_ROWS] {
        &self.cells
    }

    /// Lowest (highest row index) empty cell in a column
    pub fn lowest_empty(&self, col: usize) -> Option<usize> {
        (0..WELL_ROWS).rev().find(|&row| self.cells[row][col].is_none())
    }

    /// Drop a color into a column, hopper style. Returns the landing row,
    /// or `None` if the column is full (the well is left untouched).
    pub fn place(&mut self, col: usize, color: Color) -> Option<usize> {
        let row = self.lowest_empty(col)?;
        self.cells[row][col] = Some(color);
        Some(row)
    }

    /// Number of filled cells in a column
    pub fn column_height(&self, col: usize) -> usize {
        (0..WELL_ROWS).filter(|&row| self.cells[row][col].is_some()).count()
    }

    pub fn is_column_full(&self, col: usize) -> bool {
        self.lowest_empty(col).is_none()
    }

    /// Topmost filled color in a column
    pub fn column_top(&self, col: usize) -> Option<Color> {
        (0..WELL_ROWS).find_map(|row| self.cells[row][col])
    }

    /// True when every column's filled cells form a suffix ending at the bottom row
    pub fn is_compacted(&self) -> bool {
        (0..WELL_COLS).all(|col| {
            let height = self.column_height(col);
            (WELL_ROWS - height..WELL_ROWS).all(|row| self.cells[row][col].is_some())
        })
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().flatten().all(Option::is_none)
    }
}

/// The rack: bounded front-to-back queue of caught colors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rack {
    tiles: VecDeque<Color>,
}

impl Rack {
    pub fn new() -> Self {
        Self {
            tiles: VecDeque::with_capacity(RACK_CAPACITY),
        }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.tiles.len() >= RACK_CAPACITY
    }

    /// Next tile to be dropped
    pub fn front(&self) -> Option<Color> {
        self.tiles.front().copied()
    }

    /// Append at the back. Returns false (and leaves the rack alone) when full.
    pub fn push_back(&mut self, color: Color) -> bool {
        if self.is_full() {
            return false;
        }
        self.tiles.push_back(color);
        true
    }

    pub fn pop_front(&mut self) -> Option<Color> {
        self.tiles.pop_front()
    }

    /// Remove `len` tiles starting at `start`
    pub fn remove_run(&mut self, start: usize, len: usize) {
        self.tiles.drain(start..start + len);
    }

    pub fn iter(&self) -> impl Iterator<Item = Color> + '_ {
        self.tiles.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<Color> {
        self.tiles.iter().copied().collect()
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
    }

    /// Build a rack without the capacity check
    #[cfg(test)]
    pub(crate) fn from_raw(tiles: Vec<Color>) -> Self {
        Self {
            tiles: tiles.into(),
        }
    }
}

impl FromIterator<Color> for Rack {
    fn from_iter<I: IntoIterator<Item = Color>>(iter: I) -> Self {
        let mut rack = Rack::new();
        for color in iter {
            rack.push_back(color);
        }
        rack
    }
}

/// Immutable copy of everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub score: u64,
    pub level: u32,
    pub lives: u8,
    pub paused: bool,
    pub game_over: bool,
    pub tiles: Vec<Tile>,
    pub catcher_column: usize,
    pub rack: Vec<Color>,
    pub well: [[Option<Color>; WELL_COLS]; WELL_ROWS],
    pub tick: u64,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Balance knobs in effect for this run
    pub tuning: Tuning,
    /// Spawn stream
    pub rng: Lcg,
    pub phase: GamePhase,
    pub score: u64,
    /// Always `score / points_per_level + 1` once a mutation completes
    pub level: u32,
    pub lives: u8,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Ticks since the last spawn
    pub spawn_timer: u32,
    pub catcher_column: usize,
    /// In-flight tiles, oldest first
    pub tiles: Vec<Tile>,
    pub well: Well,
    pub rack: Rack,
    /// Next tile ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed and default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(Lcg::new(seed), Tuning::default())
    }

    /// Create a fresh run around an existing RNG stream. `tuning` must
    /// already have passed [`Tuning::validate`].
    pub(crate) fn with_tuning(rng: Lcg, tuning: Tuning) -> Self {
        Self {
            lives: tuning.starting_lives,
            tuning,
            rng,
            phase: GamePhase::Playing,
            score: 0,
            level: 1,
            time_ticks: 0,
            spawn_timer: 0,
            catcher_column: CATCHER_START_COLUMN,
            tiles: Vec::new(),
            well: Well::new(),
            rack: Rack::new(),
            next_id: 1,
        }
    }

    /// Reinitialize the run in place, keeping the RNG stream and tuning
    pub fn restart(&mut self) {
        let rng = self.rng.clone();
        let tuning = self.tuning.clone();
        *self = Self::with_tuning(rng, tuning);
    }

    /// Allocate a new tile ID
    pub fn next_tile_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Put a tile on the conveyor at position 0 and return it
    pub fn spawn_tile(&mut self, color: Color, column: usize) -> Tile {
        let tile = Tile {
            id: self.next_tile_id(),
            position: 0.0,
            color,
            column: column.min(WELL_COLS - 1),
        };
        self.tiles.push(tile);
        tile
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Owned copy for collaborators
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            score: self.score,
            level: self.level,
            lives: self.lives,
            paused: self.phase == GamePhase::Paused,
            game_over: self.phase == GamePhase::GameOver,
            tiles: self.tiles.clone(),
            catcher_column: self.catcher_column,
            rack: self.rack.to_vec(),
            well: *self.well.rows(),
            tick: self.time_ticks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_defaults() {
        let state = GameState::new(1);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.lives, 3);
        assert_eq!(state.catcher_column, 2);
        assert!(state.tiles.is_empty());
        assert!(state.rack.is_empty());
        assert!(state.well.is_empty());
    }

    #[test]
    fn test_well_fills_bottom_up() {
        let mut well = Well::new();
        assert_eq!(well.place(0, 1), Some(WELL_ROWS - 1));
        assert_eq!(well.place(0, 2), Some(WELL_ROWS - 2));
        assert_eq!(well.column_height(0), 2);
        assert_eq!(well.column_top(0), Some(2));
        assert!(well.is_compacted());

        for _ in 0..3 {
            assert!(well.place(0, 3).is_some());
        }
        assert!(well.is_column_full(0));
        let before = well.clone();
        assert_eq!(well.place(0, 4), None);
        assert_eq!(well, before);
    }

    #[test]
    fn test_well_detects_gap() {
        let mut well = Well::new();
        well.set(1, 3, Some(0));
        assert!(!well.is_compacted());
    }

    #[test]
    fn test_rack_is_bounded() {
        let mut rack = Rack::new();
        for c in 0..RACK_CAPACITY as u8 {
            assert!(rack.push_back(c));
        }
        assert!(rack.is_full());
        assert!(!rack.push_back(9));
        assert_eq!(rack.len(), RACK_CAPACITY);
        assert_eq!(rack.pop_front(), Some(0));
        assert_eq!(rack.front(), Some(1));
    }

    #[test]
    fn test_rack_remove_run() {
        let mut rack: Rack = [1, 2, 2, 2, 3].into_iter().collect();
        rack.remove_run(1, 3);
        assert_eq!(rack.to_vec(), vec![1, 3]);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut state = GameState::new(7);
        state.well.place(1, 4);
        let snap = state.snapshot();
        state.well.place(1, 5);
        state.rack.push_back(2);
        assert_eq!(snap.well[WELL_ROWS - 2][1], None);
        assert!(snap.rack.is_empty());
    }

    #[test]
    fn test_restart_keeps_rng_stream() {
        let mut state = GameState::new(99);
        state.rng.next_f64();
        let rng_before = state.rng.clone();
        state.score = 2500;
        state.level = 3;
        state.lives = 1;
        state.rack.push_back(1);
        state.restart();
        assert_eq!(state.rng, rng_before);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.lives, 3);
        assert!(state.rack.is_empty());
    }

    #[test]
    fn test_event_json_is_tagged() {
        let event = GameEvent::LifeLost {
            lives: 2,
            reason: LifeLossReason::RackOverflow,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"type":"life_lost","lives":2,"reason":"rack_overflow"}"#
        );
    }
}
