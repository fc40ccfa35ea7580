//! Match detection and gravity
//!
//! Well runs are found along four line directions; only maximal runs are
//! reported, so a run of five never also shows up as a run of three or four.

use super::state::{Color, MatchRun, Rack, Well};
use crate::consts::{WELL_COLS, WELL_ROWS};

/// Shortest run that scores
pub const MIN_RUN: usize = 3;

/// Line directions as (row step, col step): across, down, down-right, down-left
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Points for a run of `len` tiles
pub fn score_for_run(len: usize) -> u64 {
    match len {
        0..=2 => 0,
        3 => 100,
        4 => 300,
        _ => 600,
    }
}

fn step(row: usize, col: usize, (dr, dc): (isize, isize)) -> Option<(usize, usize)> {
    let r = row.checked_add_signed(dr)?;
    let c = col.checked_add_signed(dc)?;
    (r < WELL_ROWS && c < WELL_COLS).then_some((r, c))
}

/// Every maximal run of `MIN_RUN`+ identical colors, in scan order
/// (direction, then row-major start cell)
pub fn find_well_matches(well: &Well) -> Vec<MatchRun> {
    let mut runs = Vec::new();

    for dir in DIRECTIONS {
        let back = (-dir.0, -dir.1);
        for row in 0..WELL_ROWS {
            for col in 0..WELL_COLS {
                let Some(color) = well.get(row, col) else {
                    continue;
                };
                // Only start at the head of a run
                if let Some((pr, pc)) = step(row, col, back) {
                    if well.get(pr, pc) == Some(color) {
                        continue;
                    }
                }

                let mut cells = vec![(row, col)];
                let mut cursor = (row, col);
                while let Some((r, c)) = step(cursor.0, cursor.1, dir) {
                    if well.get(r, c) != Some(color) {
                        break;
                    }
                    cells.push((r, c));
                    cursor = (r, c);
                }

                if cells.len() >= MIN_RUN {
                    runs.push(MatchRun {
                        color,
                        points: score_for_run(cells.len()),
                        cells,
                    });
                }
            }
        }
    }

    runs
}

/// Empty every cell covered by any run. Overlapping cells are cleared once.
/// Returns the number of distinct cells cleared.
pub fn clear_runs(well: &mut Well, runs: &[MatchRun]) -> usize {
    let mut cleared = 0;
    for &(row, col) in runs.iter().flat_map(|run| run.cells.iter()) {
        if well.get(row, col).is_some() {
            well.set(row, col, None);
            cleared += 1;
        }
    }
    cleared
}

/// Compact each column toward the bottom, preserving order
pub fn apply_gravity(well: &mut Well) {
    for col in 0..WELL_COLS {
        let mut write = WELL_ROWS;
        for row in (0..WELL_ROWS).rev() {
            if let Some(color) = well.get(row, col) {
                write -= 1;
                if write != row {
                    well.set(write, col, Some(color));
                    well.set(row, col, None);
                }
            }
        }
    }
}

/// First maximal contiguous run of `MIN_RUN`+ in the rack, front to back.
/// Returns `(start, len, color)`.
pub fn find_rack_run(rack: &Rack) -> Option<(usize, usize, Color)> {
    let tiles = rack.to_vec();
    let mut start = 0;
    while start < tiles.len() {
        let color = tiles[start];
        let len = tiles[start..].iter().take_while(|&&c| c == color).count();
        if len >= MIN_RUN {
            return Some((start, len, color));
        }
        start += len;
    }
    None
}
