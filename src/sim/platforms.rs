//! Platform streaming
//!
//! Keeps a corridor of platforms around the player: new batches are stacked
//! above the current top platform as the player climbs, and platforms that
//! scroll far enough below the window are removed from the physics world.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use rapier2d::prelude::{ColliderHandle, RigidBodyHandle};

use super::physics::{BoxSpec, PhysicsWorld};
use super::policy::{BodyTag, platform_is_sensor};
use crate::consts::*;
use crate::tuning::Tuning;
use crate::{pixels_to_world, world_to_screen_y};

/// A fixed one-way platform. Never moves after creation.
#[derive(Debug)]
pub struct Platform {
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
    pub pos: Vec2,
}

impl Platform {
    pub fn spawn(world: &mut PhysicsWorld, pos: Vec2, tuning: &Tuning) -> Self {
        let spec = BoxSpec {
            half_extents: Vec2::new(
                pixels_to_world(PLATFORM_WIDTH / 2.0),
                pixels_to_world(PLATFORM_HEIGHT / 2.0),
            ),
            density: 0.0,
            friction: tuning.platform_friction,
        };
        let (body, collider) = world.spawn_fixed(pos, spec, BodyTag::Platform);
        Self {
            body,
            collider,
            pos,
        }
    }

    pub fn y(&self) -> f32 {
        self.pos.y
    }

    /// Solid while the player is level with or above the platform, sensor otherwise
    pub fn update_sensor(&self, world: &mut PhysicsWorld, player_y: f32) {
        world.set_sensor(self.collider, platform_is_sensor(player_y, self.pos.y));
    }

    /// Scrolled more than one platform height past the bottom of the window
    pub fn is_below_window(&self, camera_offset: f32) -> bool {
        world_to_screen_y(self.pos.y, camera_offset) >= SCREEN_HEIGHT + PLATFORM_HEIGHT
    }
}

/// Generate `count` platforms stacked upward from `start_y`
///
/// Each platform gets a random x inside the horizontal margins and sits a
/// random 80-150 px (by default) above the previous one.
pub fn generate_platforms(
    world: &mut PhysicsWorld,
    rng: &mut Pcg32,
    start_y: f32,
    count: usize,
    tuning: &Tuning,
) -> Vec<Platform> {
    let x_max = (SCREEN_WIDTH as u32).saturating_sub(PLATFORM_MARGIN).max(PLATFORM_MARGIN);
    let mut y = start_y;
    (0..count)
        .map(|_| {
            let x_px = rng.random_range(PLATFORM_MARGIN..=x_max);
            let gap_px = rng.random_range(tuning.spawn_gap_min..=tuning.spawn_gap_max);
            y += pixels_to_world(gap_px as f32);
            Platform::spawn(world, Vec2::new(pixels_to_world(x_px as f32), y), tuning)
        })
        .collect()
}

/// The active platform set
#[derive(Debug)]
pub struct PlatformStream {
    platforms: Vec<Platform>,
    /// Height generation starts from while there are no platforms
    start_y: f32,
}

impl Default for PlatformStream {
    fn default() -> Self {
        Self {
            platforms: Vec::new(),
            start_y: SPAWN_START_Y,
        }
    }
}

impl PlatformStream {
    /// Initial layout for a new session
    pub fn new(world: &mut PhysicsWorld, rng: &mut Pcg32, tuning: &Tuning) -> Self {
        let platforms = generate_platforms(
            world,
            rng,
            tuning.spawn_start_y,
            tuning.initial_platforms,
            tuning,
        );
        log::debug!("Generated {} initial platforms", platforms.len());
        Self {
            platforms,
            start_y: tuning.spawn_start_y,
        }
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Platform> {
        self.platforms.iter()
    }

    /// Height of the top platform, or the session's spawn height if there are none
    pub fn highest_y(&self) -> f32 {
        self.platforms
            .iter()
            .map(Platform::y)
            .reduce(f32::max)
            .unwrap_or(self.start_y)
    }

    /// Drop platforms that scrolled out below the window. Returns how many were removed.
    ///
    /// The top platform always survives so extension keeps building from the
    /// real top of the stream, even after the player outruns the window in a
    /// single tick.
    pub fn prune(&mut self, world: &mut PhysicsWorld, camera_offset: f32) -> usize {
        let before = self.platforms.len();
        let top = self.highest_y();
        self.platforms.retain(|p| {
            if p.y() < top && p.is_below_window(camera_offset) {
                world.remove_body(p.body);
                false
            } else {
                true
            }
        });
        let removed = before - self.platforms.len();
        if removed > 0 {
            log::debug!("Pruned {} platforms ({} left)", removed, self.platforms.len());
        }
        removed
    }

    /// Stack new batches until the set is dense enough and reaches well above
    /// the player. Returns the number of batches generated.
    pub fn extend(
        &mut self,
        world: &mut PhysicsWorld,
        rng: &mut Pcg32,
        player_y: f32,
        tuning: &Tuning,
    ) -> usize {
        let mut batches = 0;
        while batches < MAX_BATCHES_PER_TICK {
            let highest = self.highest_y();
            let sparse = self.platforms.len() < tuning.min_platforms;
            let near_top = player_y > highest - tuning.spawn_proximity;
            if !sparse && !near_top {
                break;
            }
            let batch = generate_platforms(
                world,
                rng,
                highest + tuning.extension_headroom,
                tuning.platform_batch,
                tuning,
            );
            log::debug!("Spawned {} platforms above y={:.2}", batch.len(), highest);
            self.platforms.extend(batch);
            batches += 1;
        }
        batches
    }

    /// Secondary one-way enforcement, once per tick
    pub fn update_sensors(&self, world: &mut PhysicsWorld, player_y: f32) {
        for platform in &self.platforms {
            platform.update_sensor(world, player_y);
        }
    }
}
