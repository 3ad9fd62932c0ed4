//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (DOM key names to tick input)
//! - Time (fixed-step accumulator, native frame limiter)

pub mod input;
pub mod time;

pub use input::{InputState, Key};
pub use time::FixedStep;
#[cfg(not(target_arch = "wasm32"))]
pub use time::FrameLimiter;
