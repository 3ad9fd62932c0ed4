//! Data-driven game balance
//!
//! Defaults come from [`crate::consts`]. A page may ship a JSON override; any
//! field left out keeps its default.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning field `{field}` is out of range: {reason}")]
    OutOfRange {
        field: &'static str,
        reason: &'static str,
    },
}

/// Gameplay parameters for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Gravity along y (m/s², negative is down)
    pub gravity: f32,
    pub player_max_speed: f32,
    pub jump_strength: f32,
    /// Ticks before another jump is allowed
    pub jump_cooldown: u32,
    /// Per-tick lift applied until the camera first scrolls (0 disables)
    pub launch_impulse: f32,
    pub player_density: f32,
    pub player_friction: f32,
    pub platform_friction: f32,

    pub initial_platforms: usize,
    pub platform_batch: usize,
    pub min_platforms: usize,
    /// Vertical gap range between platforms, in pixels
    pub spawn_gap_min: u32,
    pub spawn_gap_max: u32,
    pub spawn_start_y: f32,
    pub spawn_proximity: f32,
    pub extension_headroom: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            player_max_speed: PLAYER_MAX_SPEED,
            jump_strength: JUMP_STRENGTH,
            jump_cooldown: JUMP_COOLDOWN,
            launch_impulse: LAUNCH_IMPULSE,
            player_density: PLAYER_DENSITY,
            player_friction: PLAYER_FRICTION,
            platform_friction: PLATFORM_FRICTION,

            initial_platforms: INITIAL_PLATFORMS,
            platform_batch: PLATFORM_BATCH,
            min_platforms: MIN_PLATFORMS,
            spawn_gap_min: SPAWN_GAP_MIN,
            spawn_gap_max: SPAWN_GAP_MAX,
            spawn_start_y: SPAWN_START_Y,
            spawn_proximity: SPAWN_PROXIMITY,
            extension_headroom: EXTENSION_HEADROOM,
        }
    }
}

impl Tuning {
    /// Parse overrides from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the platform stream or player cannot work with
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.platform_batch == 0 {
            return Err(TuningError::OutOfRange {
                field: "platform_batch",
                reason: "must be at least 1",
            });
        }
        if self.spawn_gap_min == 0 || self.spawn_gap_min > self.spawn_gap_max {
            return Err(TuningError::OutOfRange {
                field: "spawn_gap_min",
                reason: "must be positive and not exceed spawn_gap_max",
            });
        }
        if self.player_density <= 0.0 {
            return Err(TuningError::OutOfRange {
                field: "player_density",
                reason: "must be positive",
            });
        }
        if self.extension_headroom < 0.0 {
            return Err(TuningError::OutOfRange {
                field: "extension_headroom",
                reason: "must not be negative",
            });
        }
        Ok(())
    }
}
