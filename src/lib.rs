//! Star Hop - an endless vertical platformer
//!
//! Core modules:
//! - `sim`: Simulation (physics glue, one-way platforms, platform streaming, game state)
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser/native platform abstraction (input, frame pacing)
//! - `tuning`: Data-driven game balance
//! - `error`: Startup errors

pub mod error;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use error::AppError;
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Target frame rate for the frame limiter
    pub const TARGET_FPS: u32 = 60;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Constraint solver iterations per physics step
    pub const SOLVER_ITERATIONS: usize = 6;

    /// Logical screen size in pixels
    pub const SCREEN_WIDTH: f32 = 400.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;
    /// World-to-screen scale
    pub const PIXELS_PER_METER: f32 = 30.0;

    /// Gravity along y (m/s²)
    pub const GRAVITY: f32 = -10.0;

    /// Platform size in pixels
    pub const PLATFORM_WIDTH: f32 = 100.0;
    pub const PLATFORM_HEIGHT: f32 = 15.0;
    /// Horizontal spawn range keeps platforms this many pixels from either edge
    pub const PLATFORM_MARGIN: u32 = 50;
    pub const PLATFORM_FRICTION: f32 = 0.5;

    /// Player hitbox in meters
    pub const PLAYER_HITBOX_WIDTH: f32 = 1.0;
    pub const PLAYER_HITBOX_HEIGHT: f32 = 1.0;
    /// Player sprite in pixels (drawn centered on the body)
    pub const PLAYER_SPRITE_WIDTH: f32 = 40.0;
    pub const PLAYER_SPRITE_HEIGHT: f32 = 40.0;
    pub const PLAYER_DENSITY: f32 = 1.0;
    pub const PLAYER_FRICTION: f32 = 0.3;

    /// Horizontal speed (m/s) while steering
    pub const PLAYER_MAX_SPEED: f32 = 8.0;
    /// Upward impulse applied by a jump (N·s)
    pub const JUMP_STRENGTH: f32 = 14.0;
    /// Ticks between jumps
    pub const JUMP_COOLDOWN: u32 = 20;
    /// Upward impulse applied every tick until the camera first moves
    pub const LAUNCH_IMPULSE: f32 = 0.5;

    /// Platform streaming
    pub const INITIAL_PLATFORMS: usize = 10;
    pub const PLATFORM_BATCH: usize = 5;
    pub const MIN_PLATFORMS: usize = 10;
    /// Vertical gap between consecutive platforms, in pixels
    pub const SPAWN_GAP_MIN: u32 = 80;
    pub const SPAWN_GAP_MAX: u32 = 150;
    /// Height the first platform batch is generated from (world units)
    pub const SPAWN_START_Y: f32 = 1.0;
    /// A new batch is generated once the player is this close to the top platform
    pub const SPAWN_PROXIMITY: f32 = 3.0;
    /// Extra gap between the current top platform and a new batch
    pub const EXTENSION_HEADROOM: f32 = 2.0;
    /// Upper bound on batches generated in a single tick
    pub const MAX_BATCHES_PER_TICK: usize = 64;
}

/// Convert a world x coordinate to screen pixels
#[inline]
pub fn world_to_screen_x(x: f32) -> f32 {
    x * consts::PIXELS_PER_METER
}

/// Convert a world y coordinate to screen pixels (y grows downward on screen)
#[inline]
pub fn world_to_screen_y(y: f32, camera_offset: f32) -> f32 {
    consts::SCREEN_HEIGHT - (y * consts::PIXELS_PER_METER - camera_offset)
}

/// Convert a world position to screen pixels
#[inline]
pub fn world_to_screen(pos: Vec2, camera_offset: f32) -> Vec2 {
    Vec2::new(world_to_screen_x(pos.x), world_to_screen_y(pos.y, camera_offset))
}

/// Convert pixels to world units
#[inline]
pub fn pixels_to_world(px: f32) -> f32 {
    px / consts::PIXELS_PER_METER
}
