//! Data-driven game balance
//!
//! Defaults reproduce the reference difficulty curve. A JSON override can be
//! supplied by the host (e.g. for playtesting) and is validated on load.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{PALETTE_SIZE, POINTS_PER_LEVEL, STARTING_LIVES};

/// Balance knobs for spawn pacing, tile speed and palette growth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Spawn interval at level 1 (ticks)
    pub base_spawn_interval: u32,
    /// Floor for the spawn interval (ticks)
    pub min_spawn_interval: u32,
    /// Interval reduction per level gained (ticks)
    pub spawn_interval_step: u32,
    /// Tile speed at level 1 (conveyor units per tick)
    pub base_speed: f64,
    /// Speed added per level gained
    pub speed_step: f64,
    /// Speed ceiling
    pub max_speed: f64,
    /// Colors in play before any are unlocked by level
    pub base_colors: u32,
    /// Levels needed to unlock one more color
    pub levels_per_color: u32,
    /// Total colors available
    pub palette_size: u32,
    /// Score needed per level
    pub points_per_level: u64,
    /// Lives at the start of a run
    pub starting_lives: u8,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_spawn_interval: 120,
            min_spawn_interval: 30,
            spawn_interval_step: 8,
            base_speed: 0.15,
            speed_step: 0.02,
            max_speed: 0.4,
            base_colors: 3,
            levels_per_color: 3,
            palette_size: PALETTE_SIZE,
            points_per_level: POINTS_PER_LEVEL,
            starting_lives: STARTING_LIVES,
        }
    }
}

/// Rejected tuning data
#[derive(Debug)]
pub enum TuningError {
    /// Not valid JSON for [`Tuning`]
    Parse(serde_json::Error),
    /// A field holds a value the simulation cannot run with
    Invalid {
        /// Offending field name
        field: &'static str,
        /// Why it was rejected
        reason: &'static str,
    },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(e) => write!(f, "tuning parse error: {e}"),
            TuningError::Invalid { field, reason } => {
                write!(f, "invalid tuning field `{field}`: {reason}")
            }
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Parse(e) => Some(e),
            TuningError::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e)
    }
}

impl Tuning {
    /// Parse and validate a JSON override. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check that every knob is usable
    pub fn validate(&self) -> Result<(), TuningError> {
        let invalid = |field, reason| Err(TuningError::Invalid { field, reason });

        if self.min_spawn_interval == 0 {
            return invalid("min_spawn_interval", "must be at least one tick");
        }
        if self.base_spawn_interval < self.min_spawn_interval {
            return invalid("base_spawn_interval", "must not be below min_spawn_interval");
        }
        if self.base_speed.is_nan() || self.base_speed <= 0.0 {
            return invalid("base_speed", "must be positive");
        }
        if self.speed_step < 0.0 {
            return invalid("speed_step", "must not be negative");
        }
        if self.max_speed < self.base_speed {
            return invalid("max_speed", "must not be below base_speed");
        }
        if self.palette_size == 0 || self.palette_size > u32::from(u8::MAX) {
            return invalid("palette_size", "must be between 1 and 255");
        }
        if self.base_colors == 0 {
            return invalid("base_colors", "must be at least one");
        }
        if self.levels_per_color == 0 {
            return invalid("levels_per_color", "must be at least one");
        }
        if self.points_per_level == 0 {
            return invalid("points_per_level", "must be positive");
        }
        if self.starting_lives == 0 {
            return invalid("starting_lives", "must be at least one");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "base_spawn_interval": 90 }"#).unwrap();
        assert_eq!(tuning.base_spawn_interval, 90);
        assert_eq!(tuning.min_spawn_interval, 30);
        assert_eq!(tuning.palette_size, 6);
    }

    #[test]
    fn test_rejects_zero_interval() {
        let err = Tuning::from_json(r#"{ "min_spawn_interval": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "min_spawn_interval",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_garbage() {
        let err = Tuning::from_json("not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
        assert!(err.to_string().starts_with("tuning parse error"));
    }
}
