//! The player body: steering, jumping and the jump cooldown

use glam::Vec2;
use rapier2d::prelude::{ColliderHandle, RigidBodyHandle};

use super::physics::{BoxSpec, PhysicsWorld};
use super::policy::BodyTag;
use crate::consts::*;
use crate::pixels_to_world;
use crate::tuning::Tuning;

/// Horizontal steering command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Left,
    #[default]
    Idle,
    Right,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Idle => 0.0,
            Direction::Right => 1.0,
        }
    }

    /// Left wins when both keys are held
    pub fn from_keys(left: bool, right: bool) -> Self {
        if left {
            Direction::Left
        } else if right {
            Direction::Right
        } else {
            Direction::Idle
        }
    }
}

#[derive(Debug)]
pub struct Player {
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
    /// Touching any platform (maintained by the collision policy)
    pub grounded: bool,
    /// Ticks until the next jump is allowed
    pub jump_cooldown: u32,
}

impl Player {
    /// Spawn at the standard start point: horizontally centered, a quarter up the screen
    pub fn spawn(world: &mut PhysicsWorld, tuning: &Tuning) -> Self {
        let start = Vec2::new(
            pixels_to_world(SCREEN_WIDTH / 2.0),
            pixels_to_world(SCREEN_HEIGHT / 4.0),
        );
        Self::spawn_at(world, start, tuning)
    }

    pub fn spawn_at(world: &mut PhysicsWorld, pos: Vec2, tuning: &Tuning) -> Self {
        let spec = BoxSpec {
            half_extents: Vec2::new(PLAYER_HITBOX_WIDTH / 2.0, PLAYER_HITBOX_HEIGHT / 2.0),
            density: tuning.player_density,
            friction: tuning.player_friction,
        };
        let (body, collider) = world.spawn_dynamic(pos, spec, BodyTag::Player);
        Self {
            body,
            collider,
            grounded: false,
            jump_cooldown: 0,
        }
    }

    pub fn position(&self, world: &PhysicsWorld) -> Vec2 {
        world.position(self.body)
    }

    /// Overwrite horizontal velocity; vertical velocity is left alone
    pub fn move_horizontal(&self, world: &mut PhysicsWorld, direction: Direction, max_speed: f32) {
        let vel = world.velocity(self.body);
        world.set_velocity(self.body, Vec2::new(direction.sign() * max_speed, vel.y));
    }

    /// Jump if grounded and off cooldown. Returns whether the impulse was applied.
    pub fn jump(&mut self, world: &mut PhysicsWorld, tuning: &Tuning) -> bool {
        if !self.grounded || self.jump_cooldown > 0 {
            return false;
        }
        world.apply_impulse(self.body, Vec2::new(0.0, tuning.jump_strength));
        self.jump_cooldown = tuning.jump_cooldown;
        log::debug!("Jump (cooldown {})", self.jump_cooldown);
        true
    }

    /// Per-tick bookkeeping; the only place the cooldown runs down
    pub fn update(&mut self) {
        self.jump_cooldown = self.jump_cooldown.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn setup() -> (PhysicsWorld, Player, Tuning) {
        let tuning = Tuning::default();
        let mut world = PhysicsWorld::new(tuning.gravity);
        let player = Player::spawn(&mut world, &tuning);
        (world, player, tuning)
    }

    #[test]
    fn test_spawn_position() {
        let (world, player, _) = setup();
        let pos = player.position(&world);
        assert!((pos.x - SCREEN_WIDTH / 2.0 / PIXELS_PER_METER).abs() < 0.001);
        assert!((pos.y - SCREEN_HEIGHT / 4.0 / PIXELS_PER_METER).abs() < 0.001);
        assert!(!player.grounded);
        assert_eq!(player.jump_cooldown, 0);
    }

    #[test]
    fn test_move_keeps_vertical_velocity() {
        let (mut world, player, tuning) = setup();
        world.set_velocity(player.body, Vec2::new(0.0, -3.0));
        player.move_horizontal(&mut world, Direction::Right, tuning.player_max_speed);
        assert_eq!(world.velocity(player.body), Vec2::new(tuning.player_max_speed, -3.0));
        player.move_horizontal(&mut world, Direction::Left, tuning.player_max_speed);
        assert_eq!(world.velocity(player.body), Vec2::new(-tuning.player_max_speed, -3.0));
        player.move_horizontal(&mut world, Direction::Idle, tuning.player_max_speed);
        assert_eq!(world.velocity(player.body), Vec2::new(0.0, -3.0));
    }

    #[test]
    fn test_jump_requires_grounded() {
        let (mut world, mut player, tuning) = setup();
        assert!(!player.jump(&mut world, &tuning));
        assert_eq!(player.jump_cooldown, 0);
    }

    #[test]
    fn test_jump_applies_impulse_and_cooldown() {
        let (mut world, mut player, tuning) = setup();
        world.step(&(), &());
        player.grounded = true;
        assert!(player.jump(&mut world, &tuning));
        assert_eq!(player.jump_cooldown, tuning.jump_cooldown);
        world.step(&(), &());
        assert!(world.velocity(player.body).y > 0.0);

        // Still grounded but cooling down: no second impulse
        assert!(!player.jump(&mut world, &tuning));
        assert_eq!(player.jump_cooldown, tuning.jump_cooldown);
    }

    #[test]
    fn test_cooldown_counts_down_to_zero() {
        let (mut world, mut player, tuning) = setup();
        player.grounded = true;
        assert!(player.jump(&mut world, &tuning));
        for expected in (0..tuning.jump_cooldown).rev() {
            player.update();
            assert_eq!(player.jump_cooldown, expected);
        }
        player.update();
        assert_eq!(player.jump_cooldown, 0);
        assert!(player.jump(&mut world, &tuning));
    }

    #[test]
    fn test_direction_from_keys() {
        assert_eq!(Direction::from_keys(true, true), Direction::Left);
        assert_eq!(Direction::from_keys(false, true), Direction::Right);
        assert_eq!(Direction::from_keys(false, false), Direction::Idle);
    }

    proptest! {
        #[test]
        fn prop_cooldown_never_rises_without_jump(start in 0u32..100, ticks in 0usize..200) {
            let (_world, mut player, _) = setup();
            player.jump_cooldown = start;
            let mut last = start;
            for _ in 0..ticks {
                player.update();
                prop_assert!(player.jump_cooldown <= last);
                prop_assert!(last == 0 || player.jump_cooldown == last - 1);
                last = player.jump_cooldown;
            }
        }
    }
}
