//! One-way platform collision policy
//!
//! Platforms are solid from above and pass-through from below. Two separate
//! mechanisms enforce this and both stay active:
//!
//! 1. A pre-solve hook drops the solver contacts of any player/platform pair
//!    whose player is strictly below the platform, for that step only.
//! 2. Once per tick every platform collider is flipped to a sensor while the
//!    player is below it (see [`platform_is_sensor`]), which removes the pair
//!    from contact resolution entirely.
//!
//! Equal heights count as "above": the contact stays enabled and the platform
//! stays solid.
//!
//! Grounding is a single flag: any started contact with a platform sets it and
//! any stopped contact clears it, regardless of side. Touching two platforms and
//! leaving one clears it even though the other is still under the player.

use std::sync::{Mutex, PoisonError};

use rapier2d::prelude::*;

use super::physics::PhysicsWorld;
use super::player::Player;

/// Typed role of a rigid body, stored in its `user_data`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyTag {
    Player,
    Platform,
}

impl BodyTag {
    pub const fn user_data(self) -> u128 {
        match self {
            BodyTag::Player => 1,
            BodyTag::Platform => 2,
        }
    }
}

impl TryFrom<u128> for BodyTag {
    type Error = u128;

    fn try_from(value: u128) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(BodyTag::Player),
            2 => Ok(BodyTag::Platform),
            other => Err(other),
        }
    }
}

/// Pre-solve decision: may this player/platform contact produce a response?
#[inline]
pub fn contact_enabled(player_y: f32, platform_y: f32) -> bool {
    player_y >= platform_y
}

/// Per-tick decision: should the platform collider be a sensor?
#[inline]
pub fn platform_is_sensor(player_y: f32, platform_y: f32) -> bool {
    let above = player_y >= platform_y;
    !above
}

/// Begin or end of a touching pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    Begin,
    End,
}

/// Apply one contact transition to the player's grounded flag
pub fn apply_contact(player: &mut Player, phase: ContactPhase, other: Option<BodyTag>) {
    if other != Some(BodyTag::Platform) {
        return;
    }
    player.grounded = match phase {
        ContactPhase::Begin => true,
        ContactPhase::End => false,
    };
}

fn tag_of(bodies: &RigidBodySet, handle: Option<RigidBodyHandle>) -> Option<BodyTag> {
    let body = bodies.get(handle?)?;
    BodyTag::try_from(body.user_data).ok()
}

/// Solver hook that suppresses platform contacts while the player is below
pub struct OneWayPlatforms {
    player: RigidBodyHandle,
}

impl OneWayPlatforms {
    pub fn new(player: RigidBodyHandle) -> Self {
        Self { player }
    }

    /// Player and platform heights for a pair, if it is a player/platform pair
    fn pair_heights(
        &self,
        bodies: &RigidBodySet,
        body1: Option<RigidBodyHandle>,
        body2: Option<RigidBodyHandle>,
    ) -> Option<(f32, f32)> {
        let other = if body1 == Some(self.player) {
            body2
        } else if body2 == Some(self.player) {
            body1
        } else {
            return None;
        };
        if tag_of(bodies, other) != Some(BodyTag::Platform) {
            return None;
        }
        let player_y = bodies.get(self.player)?.translation().y;
        let platform_y = bodies.get(other?)?.translation().y;
        Some((player_y, platform_y))
    }
}

impl PhysicsHooks for OneWayPlatforms {
    fn modify_solver_contacts(&self, context: &mut ContactModificationContext) {
        let Some((player_y, platform_y)) =
            self.pair_heights(context.bodies, context.rigid_body1, context.rigid_body2)
        else {
            return;
        };
        if !contact_enabled(player_y, platform_y) {
            context.solver_contacts.clear();
        }
    }
}

/// Started/stopped pairs recorded during a step, in emission order
#[derive(Default)]
pub struct ContactLog {
    events: Mutex<Vec<(ContactPhase, ColliderHandle, ColliderHandle)>>,
}

impl ContactLog {
    fn drain(&self) -> Vec<(ContactPhase, ColliderHandle, ColliderHandle)> {
        let mut events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *events)
    }
}

impl EventHandler for ContactLog {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        let phase = if event.started() {
            ContactPhase::Begin
        } else {
            ContactPhase::End
        };
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((phase, event.collider1(), event.collider2()));
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

/// Collision policy for one session: pre-solve hook plus grounding tracker
pub struct CollisionPolicy {
    hooks: OneWayPlatforms,
    events: ContactLog,
}

impl CollisionPolicy {
    pub fn new(player: &Player) -> Self {
        Self {
            hooks: OneWayPlatforms::new(player.body),
            events: ContactLog::default(),
        }
    }

    /// Step the world and apply every contact transition it produced, in order
    pub fn step(&self, world: &mut PhysicsWorld, player: &mut Player) {
        world.step(&self.hooks, &self.events);
        for (phase, c1, c2) in self.events.drain() {
            let other = if c1 == player.collider {
                c2
            } else if c2 == player.collider {
                c1
            } else {
                continue;
            };
            // Colliders removed with their platform no longer resolve to a tag
            let tag = world
                .colliders
                .get(other)
                .and_then(|c| tag_of(&world.bodies, c.parent()));
            apply_contact(player, phase, tag);
        }
    }
}
