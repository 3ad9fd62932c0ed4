//! Simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Physics through the rapier world in `physics`
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod physics;
pub mod platforms;
pub mod player;
pub mod policy;
pub mod state;
pub mod tick;

pub use physics::{BoxSpec, PhysicsWorld};
pub use platforms::{Platform, PlatformStream, generate_platforms};
pub use player::{Direction, Player};
pub use policy::{
    BodyTag, CollisionPolicy, ContactPhase, apply_contact, contact_enabled, platform_is_sensor,
};
pub use state::{GamePhase, GameState, Session};
pub use tick::{TickInput, tick};
