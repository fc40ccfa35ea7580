//! Difficulty curve
//!
//! Everything here is a pure function of the level (or score) and the
//! active [`Tuning`]. Levels are 1-based.

use crate::tuning::Tuning;

/// Ticks between spawns: shrinks by `spawn_interval_step` per level down to the floor
pub fn spawn_interval(level: u32, tuning: &Tuning) -> u32 {
    let reduction = level.saturating_sub(1).saturating_mul(tuning.spawn_interval_step);
    tuning
        .base_spawn_interval
        .saturating_sub(reduction)
        .max(tuning.min_spawn_interval)
}

/// Conveyor units travelled per tick
pub fn tile_speed(level: u32, tuning: &Tuning) -> f64 {
    let gained = f64::from(level.saturating_sub(1));
    (tuning.base_speed + gained * tuning.speed_step).min(tuning.max_speed)
}

/// Number of distinct colors the spawner may pick from
pub fn num_colors(level: u32, tuning: &Tuning) -> u32 {
    (tuning.base_colors + level / tuning.levels_per_color).min(tuning.palette_size)
}

/// Level implied by a score
pub fn level_for_score(score: u64, tuning: &Tuning) -> u32 {
    let level = score / tuning.points_per_level + 1;
    u32::try_from(level).unwrap_or(u32::MAX)
}
