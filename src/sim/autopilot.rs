//! Idle/demo mode - the simulation plays itself
//!
//! A small deterministic policy over a [`Snapshot`]. It never reads hidden
//! state, so the same snapshot always yields the same action.

use super::engine::Engine;
use super::state::Snapshot;
use crate::consts::{RACK_CAPACITY, WELL_COLS, WELL_ROWS};

/// One player action per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Idle,
    Left,
    Right,
    Drop,
}

fn column_height(snapshot: &Snapshot, col: usize) -> usize {
    (0..WELL_ROWS).filter(|&row| snapshot.well[row][col].is_some()).count()
}

fn column_top(snapshot: &Snapshot, col: usize) -> Option<u8> {
    (0..WELL_ROWS).find_map(|row| snapshot.well[row][col])
}

fn step_toward(from: usize, to: usize) -> Action {
    match from.cmp(&to) {
        std::cmp::Ordering::Less => Action::Right,
        std::cmp::Ordering::Greater => Action::Left,
        std::cmp::Ordering::Equal => Action::Idle,
    }
}

/// Pick the next action
pub fn choose_action(snapshot: &Snapshot) -> Action {
    if snapshot.paused || snapshot.game_over {
        return Action::Idle;
    }

    let col = snapshot.catcher_column;
    let has_room = column_height(snapshot, col) < WELL_ROWS;

    // Drop when it stacks a color onto itself, or when the rack is about to overflow
    if let Some(&front) = snapshot.rack.first() {
        let stacks = column_top(snapshot, col) == Some(front);
        let crowded = snapshot.rack.len() + 1 >= RACK_CAPACITY;
        if has_room && (stacks || crowded) {
            return Action::Drop;
        }
    }

    // Chase the tile closest to the catch line
    let lead = snapshot
        .tiles
        .iter()
        .max_by(|a, b| a.position.total_cmp(&b.position));
    if let Some(tile) = lead {
        if snapshot.rack.len() < RACK_CAPACITY {
            return step_toward(col, tile.column);
        }
        // Rack full: step out of the way
        if col == tile.column {
            return if col + 1 < WELL_COLS { Action::Right } else { Action::Left };
        }
        return Action::Idle;
    }

    // Nothing incoming: park over the shortest column to unload
    let shortest = (0..WELL_COLS)
        .min_by_key(|&c| column_height(snapshot, c))
        .unwrap_or(col);
    if !snapshot.rack.is_empty() && shortest == col && has_room {
        return Action::Drop;
    }
    step_toward(col, shortest)
}

/// Apply an action to the engine. Returns whether it had an effect.
pub fn apply(engine: &mut Engine, action: Action) -> bool {
    match action {
        Action::Idle => false,
        Action::Left => engine.move_left(),
        Action::Right => engine.move_right(),
        Action::Drop => engine.drop_from_rack(),
    }
}
