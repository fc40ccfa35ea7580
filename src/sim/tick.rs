//! Fixed timestep simulation tick
//!
//! Transition functions over `&mut GameState`. Each one appends what it did
//! to the caller's event buffer; none of them block, allocate unboundedly or
//! touch the outside world.

use super::difficulty::{level_for_score, num_colors, spawn_interval, tile_speed};
use super::matching::{apply_gravity, clear_runs, find_rack_run, find_well_matches, score_for_run};
use super::state::{GameEvent, GamePhase, GameState, LifeLossReason, MatchRun, MatchSource, Tile};
use crate::consts::*;

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, events: &mut Vec<GameEvent>) {
    // Don't tick if paused or game over
    if !state.is_playing() {
        return;
    }

    state.time_ticks += 1;

    // Spawner
    state.spawn_timer += 1;
    if state.spawn_timer >= spawn_interval(state.level, &state.tuning) {
        state.spawn_timer = 0;
        spawn_random_tile(state, events);
    }

    // Conveyor
    let speed = tile_speed(state.level, &state.tuning);
    for tile in &mut state.tiles {
        tile.position += speed;
    }
    let (arrived, in_flight): (Vec<Tile>, Vec<Tile>) = state
        .tiles
        .drain(..)
        .partition(|t| t.position >= CONVEYOR_LENGTH);
    state.tiles = in_flight;

    for tile in arrived {
        if state.is_game_over() {
            break;
        }
        resolve_arrival(state, tile, events);
    }

    if state.is_playing() {
        resolve_well_matches(state, events);
    }
}

/// Spawn one tile with a color and column drawn from the run's RNG
fn spawn_random_tile(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let colors = num_colors(state.level, &state.tuning);
    let color = state.rng.next_int(0, colors - 1) as u8;
    let column = state.rng.next_int(0, WELL_COLS as u32 - 1) as usize;
    let tile = state.spawn_tile(color, column);
    log::debug!("Spawned tile {} color {} column {}", tile.id, color, column);
    events.push(GameEvent::Spawned {
        id: tile.id,
        color,
        column,
    });
}

/// End-of-line routing: catch onto the rack or fall into the well
fn resolve_arrival(state: &mut GameState, tile: Tile, events: &mut Vec<GameEvent>) {
    if tile.column == state.catcher_column {
        if state.rack.push_back(tile.color) {
            events.push(GameEvent::Caught {
                id: tile.id,
                color: tile.color,
                rack_len: state.rack.len(),
            });
            resolve_rack_matches(state, events);
        } else {
            lose_life(state, LifeLossReason::RackOverflow, events);
        }
        return;
    }

    match state.well.place(tile.column, tile.color) {
        Some(row) => events.push(GameEvent::Fell {
            id: tile.id,
            color: tile.color,
            column: tile.column,
            row,
        }),
        None => lose_life(state, LifeLossReason::WellColumnFull, events),
    }
}

/// Clear every well run found in one scan, then compact once
pub(crate) fn resolve_well_matches(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let runs = find_well_matches(&state.well);
    if runs.is_empty() {
        return;
    }

    clear_runs(&mut state.well, &runs);
    let points: u64 = runs.iter().map(|r| r.points).sum();
    state.score += points;
    log::debug!("Well match: {} run(s) for {} points", runs.len(), points);
    events.push(GameEvent::Matched {
        source: MatchSource::Well,
        runs,
        points,
    });
    apply_gravity(&mut state.well);
    check_level_up(state, events);
}

/// Splice out rack runs front to back until none remain
pub(crate) fn resolve_rack_matches(state: &mut GameState, events: &mut Vec<GameEvent>) {
    while let Some((start, len, color)) = find_rack_run(&state.rack) {
        state.rack.remove_run(start, len);
        let points = score_for_run(len);
        state.score += points;
        log::debug!("Rack match: {} x color {} for {} points", len, color, points);
        events.push(GameEvent::Matched {
            source: MatchSource::Rack,
            runs: vec![MatchRun {
                color,
                cells: (start..start + len).map(|i| (0, i)).collect(),
                points,
            }],
            points,
        });
        check_level_up(state, events);
    }
}

/// Recompute the level; a jump over several thresholds fires a single event
fn check_level_up(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let level = level_for_score(state.score, &state.tuning);
    if level > state.level {
        state.level = level;
        log::info!("Level up: {}", level);
        events.push(GameEvent::LevelUp { level });
    }
}

/// Take a life; the last one ends the run
fn lose_life(state: &mut GameState, reason: LifeLossReason, events: &mut Vec<GameEvent>) {
    state.lives = state.lives.saturating_sub(1);
    log::debug!("Life lost ({}), {} remaining", reason.as_str(), state.lives);
    events.push(GameEvent::LifeLost {
        lives: state.lives,
        reason,
    });

    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        log::info!("Game over: score {} level {}", state.score, state.level);
        events.push(GameEvent::GameOver {
            score: state.score,
            level: state.level,
        });
    }
}

/// Shift the catcher by one column. Returns false when nothing moved.
pub fn move_catcher(state: &mut GameState, right: bool) -> bool {
    if !state.is_playing() {
        return false;
    }
    let target = if right {
        state.catcher_column + 1
    } else {
        match state.catcher_column.checked_sub(1) {
            Some(col) => col,
            None => return false,
        }
    };
    if target >= WELL_COLS {
        return false;
    }
    state.catcher_column = target;
    true
}

/// Drop the front rack tile into the well under the catcher.
/// Returns false when rejected (empty rack, paused, game over).
pub fn drop_from_rack(state: &mut GameState, events: &mut Vec<GameEvent>) -> bool {
    if !state.is_playing() {
        return false;
    }
    let Some(color) = state.rack.pop_front() else {
        return false;
    };

    let column = state.catcher_column;
    let row = state.well.place(column, color);
    events.push(GameEvent::Dropped { color, column, row });
    if row.is_none() {
        lose_life(state, LifeLossReason::WellColumnFull, events);
    }
    true
}

/// Flip between playing and paused. No-op once the run has ended.
pub fn toggle_pause(state: &mut GameState) {
    state.phase = match state.phase {
        GamePhase::Playing => GamePhase::Paused,
        GamePhase::Paused => GamePhase::Playing,
        GamePhase::GameOver => GamePhase::GameOver,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Rack;

    fn run_ticks(state: &mut GameState, n: usize) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for _ in 0..n {
            tick(state, &mut events);
        }
        events
    }

    #[test]
    fn test_first_spawn_on_interval() {
        let mut state = GameState::new(1);
        let events = run_ticks(&mut state, 119);
        assert!(events.is_empty());
        assert!(state.tiles.is_empty());

        let events = run_ticks(&mut state, 1);
        assert_eq!(state.tiles.len(), 1);
        assert!(matches!(events[0], GameEvent::Spawned { .. }));
        assert_eq!(state.spawn_timer, 0);
        assert_eq!(state.time_ticks, 120);
    }

    #[test]
    fn test_spawn_colors_respect_level() {
        let mut state = GameState::new(5);
        let mut events = Vec::new();
        for _ in 0..200 {
            spawn_random_tile(&mut state, &mut events);
        }
        assert!(state.tiles.iter().all(|t| t.color < 3 && t.column < WELL_COLS));
    }

    #[test]
    fn test_tile_travels_and_falls() {
        let mut state = GameState::new(1);
        state.catcher_column = 0;
        state.spawn_tile(1, 3);
        // 10 / 0.15 -> 67 ticks
        let events = run_ticks(&mut state, 66);
        assert_eq!(state.tiles.len(), 1);
        assert!(events.iter().all(|e| !matches!(e, GameEvent::Fell { .. })));

        let events = run_ticks(&mut state, 1);
        assert!(state.tiles.is_empty());
        assert!(events.contains(&GameEvent::Fell {
            id: 1,
            color: 1,
            column: 3,
            row: WELL_ROWS - 1,
        }));
        assert_eq!(state.well.get(WELL_ROWS - 1, 3), Some(1));
    }

    #[test]
    fn test_catch_into_rack() {
        let mut state = GameState::new(1);
        state.spawn_tile(2, state.catcher_column);
        let events = run_ticks(&mut state, 67);
        assert_eq!(state.rack.to_vec(), vec![2]);
        assert!(state.well.is_empty());
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::Caught { color: 2, rack_len: 1, .. }))
        );
    }

    #[test]
    fn test_rack_overflow_costs_a_life() {
        let mut state = GameState::new(1);
        for c in [0, 1, 0, 1, 0] {
            state.rack.push_back(c);
        }
        let mut events = Vec::new();
        let tile = state.spawn_tile(2, state.catcher_column);
        state.tiles.clear();
        resolve_arrival(&mut state, tile, &mut events);
        assert_eq!(state.rack.len(), RACK_CAPACITY);
        assert_eq!(state.lives, 2);
        assert_eq!(
            events,
            vec![GameEvent::LifeLost {
                lives: 2,
                reason: LifeLossReason::RackOverflow
            }]
        );
    }

    #[test]
    fn test_rack_cascade_clears_both_runs() {
        let mut state = GameState::new(1);
        state.rack = Rack::from_raw(vec![0, 0, 0, 1, 1, 1]);
        let mut events = Vec::new();
        resolve_rack_matches(&mut state, &mut events);
        assert!(state.rack.is_empty());
        assert_eq!(state.score, 200);
        let rack_matches = events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    GameEvent::Matched {
                        source: MatchSource::Rack,
                        ..
                    }
                )
            })
            .count();
        assert_eq!(rack_matches, 2);
    }

    #[test]
    fn test_catch_completes_rack_run() {
        let mut state = GameState::new(1);
        for c in [2, 1, 1] {
            state.rack.push_back(c);
        }
        let tile = state.spawn_tile(1, state.catcher_column);
        state.tiles.clear();
        let mut events = Vec::new();
        resolve_arrival(&mut state, tile, &mut events);
        assert_eq!(state.rack.to_vec(), vec![2]);
        assert_eq!(state.score, 100);
        assert!(matches!(events[0], GameEvent::Caught { rack_len: 4, .. }));
        assert!(matches!(
            events[1],
            GameEvent::Matched {
                source: MatchSource::Rack,
                points: 100,
                ..
            }
        ));
    }

    #[test]
    fn test_level_up_once_for_big_jump() {
        let mut state = GameState::new(1);
        state.score = 950;
        assert_eq!(state.level, 1);
        let mut events = Vec::new();
        state.score += 2600;
        check_level_up(&mut state, &mut events);
        assert_eq!(state.level, 4);
        assert_eq!(events, vec![GameEvent::LevelUp { level: 4 }]);
    }

    #[test]
    fn test_game_over_on_last_life() {
        let mut state = GameState::new(1);
        state.lives = 1;
        state.score = 1234;
        state.level = 2;
        let mut events = Vec::new();
        lose_life(&mut state, LifeLossReason::WellColumnFull, &mut events);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(
            events.last(),
            Some(&GameEvent::GameOver {
                score: 1234,
                level: 2
            })
        );

        // Terminal: nothing moves any more
        assert!(!move_catcher(&mut state, true));
        toggle_pause(&mut state);
        assert_eq!(state.phase, GamePhase::GameOver);
        let before = state.time_ticks;
        tick(&mut state, &mut events);
        assert_eq!(state.time_ticks, before);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = GameState::new(12345);
        toggle_pause(&mut state);
        assert_eq!(state.phase, GamePhase::Paused);
        let events = run_ticks(&mut state, 500);
        assert!(events.is_empty());
        assert_eq!(state.time_ticks, 0);
        assert!(!move_catcher(&mut state, false));

        toggle_pause(&mut state);
        assert_eq!(state.phase, GamePhase::Playing);
        run_ticks(&mut state, 1);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_drop_routes_to_catcher_column() {
        let mut state = GameState::new(1);
        state.rack.push_back(4);
        state.rack.push_back(5);
        state.catcher_column = 1;
        let mut events = Vec::new();
        assert!(drop_from_rack(&mut state, &mut events));
        assert_eq!(state.well.get(WELL_ROWS - 1, 1), Some(4));
        assert_eq!(state.rack.to_vec(), vec![5]);
        assert_eq!(
            events,
            vec![GameEvent::Dropped {
                color: 4,
                column: 1,
                row: Some(WELL_ROWS - 1)
            }]
        );

        state.rack.clear();
        assert!(!drop_from_rack(&mut state, &mut events));
    }

    #[test]
    fn test_drop_into_full_column_still_reports_drop() {
        let mut state = GameState::new(1);
        for i in 0..WELL_ROWS {
            state.well.place(3, (i % 2) as u8);
        }
        state.catcher_column = 3;
        state.rack.push_back(2);
        let well_before = state.well.clone();
        let mut events = Vec::new();
        assert!(drop_from_rack(&mut state, &mut events));
        assert_eq!(state.well, well_before);
        assert_eq!(
            events,
            vec![
                GameEvent::Dropped {
                    color: 2,
                    column: 3,
                    row: None
                },
                GameEvent::LifeLost {
                    lives: 2,
                    reason: LifeLossReason::WellColumnFull
                },
            ]
        );
    }

    #[test]
    fn test_well_match_then_gravity() {
        let mut state = GameState::new(1);
        // Bottom row: A A A, with a B resting on the middle A
        state.well.set(4, 0, Some(0));
        state.well.set(4, 1, Some(0));
        state.well.set(4, 2, Some(0));
        state.well.set(3, 1, Some(1));
        let mut events = Vec::new();
        resolve_well_matches(&mut state, &mut events);
        assert_eq!(state.score, 100);
        assert_eq!(state.well.get(4, 1), Some(1));
        assert_eq!(state.well.get(3, 1), None);
        assert!(state.well.is_compacted());
        assert!(matches!(
            events[0],
            GameEvent::Matched {
                source: MatchSource::Well,
                points: 100,
                ..
            }
        ));
    }
}
