//! Rapier world wrapper
//!
//! Owns every rigid body and collider. Player and platforms only hold handles
//! into it. Positions cross this boundary as `glam::Vec2`.

use std::num::NonZeroUsize;

use glam::Vec2;
use rapier2d::prelude::*;

use super::policy::BodyTag;
use crate::consts::{SIM_DT, SOLVER_ITERATIONS};

/// Shape and material for a box collider
#[derive(Debug, Clone, Copy)]
pub struct BoxSpec {
    pub half_extents: Vec2,
    pub density: f32,
    pub friction: f32,
}

pub struct PhysicsWorld {
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    gravity: Vector<Real>,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
}

impl PhysicsWorld {
    /// Create an empty world with a fixed 60 Hz step
    pub fn new(gravity: f32) -> Self {
        let mut params = IntegrationParameters::default();
        params.dt = SIM_DT;
        params.num_solver_iterations =
            NonZeroUsize::new(SOLVER_ITERATIONS).unwrap_or(NonZeroUsize::MIN);

        Self {
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            gravity: vector![0.0, gravity],
            params,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    /// Spawn a dynamic, rotation-locked body with one box collider
    pub fn spawn_dynamic(
        &mut self,
        pos: Vec2,
        spec: BoxSpec,
        tag: BodyTag,
    ) -> (RigidBodyHandle, ColliderHandle) {
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![pos.x, pos.y])
            .lock_rotations()
            .user_data(tag.user_data())
            .build();
        let handles = self.attach_box(body, spec);
        if let Some(body) = self.bodies.get_mut(handles.0) {
            body.recompute_mass_properties_from_colliders(&self.colliders);
        }
        handles
    }

    /// Spawn a fixed body with one solid box collider
    pub fn spawn_fixed(
        &mut self,
        pos: Vec2,
        spec: BoxSpec,
        tag: BodyTag,
    ) -> (RigidBodyHandle, ColliderHandle) {
        let body = RigidBodyBuilder::fixed()
            .translation(vector![pos.x, pos.y])
            .user_data(tag.user_data())
            .build();
        self.attach_box(body, spec)
    }

    fn attach_box(
        &mut self,
        body: RigidBody,
        spec: BoxSpec,
    ) -> (RigidBodyHandle, ColliderHandle) {
        let collider = ColliderBuilder::cuboid(spec.half_extents.x, spec.half_extents.y)
            .density(spec.density)
            .friction(spec.friction)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .active_hooks(ActiveHooks::MODIFY_SOLVER_CONTACTS)
            .build();
        let body_handle = self.bodies.insert(body);
        let collider_handle =
            self.colliders
                .insert_with_parent(collider, body_handle, &mut self.bodies);
        (body_handle, collider_handle)
    }

    /// Remove a body together with its colliders
    pub fn remove_body(&mut self, handle: RigidBodyHandle) {
        self.bodies.remove(
            handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Advance one fixed step; hooks and events run synchronously inside it
    pub fn step(&mut self, hooks: &dyn PhysicsHooks, events: &dyn EventHandler) {
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            hooks,
            events,
        );
    }

    pub fn position(&self, handle: RigidBodyHandle) -> Vec2 {
        self.bodies
            .get(handle)
            .map(|b| Vec2::new(b.translation().x, b.translation().y))
            .unwrap_or(Vec2::ZERO)
    }

    pub fn set_position(&mut self, handle: RigidBodyHandle, pos: Vec2) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_translation(vector![pos.x, pos.y], true);
        }
    }

    pub fn velocity(&self, handle: RigidBodyHandle) -> Vec2 {
        self.bodies
            .get(handle)
            .map(|b| Vec2::new(b.linvel().x, b.linvel().y))
            .unwrap_or(Vec2::ZERO)
    }

    pub fn set_velocity(&mut self, handle: RigidBodyHandle, vel: Vec2) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_linvel(vector![vel.x, vel.y], true);
        }
    }

    /// Apply an impulse at the center of mass
    pub fn apply_impulse(&mut self, handle: RigidBodyHandle, impulse: Vec2) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.apply_impulse(vector![impulse.x, impulse.y], true);
        }
    }

    pub fn set_sensor(&mut self, handle: ColliderHandle, sensor: bool) {
        if let Some(collider) = self.colliders.get_mut(handle) {
            if collider.is_sensor() != sensor {
                collider.set_sensor(sensor);
            }
        }
    }

    pub fn is_sensor(&self, handle: ColliderHandle) -> bool {
        self.colliders
            .get(handle)
            .is_some_and(|c| c.is_sensor())
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> BoxSpec {
        BoxSpec {
            half_extents: Vec2::splat(0.5),
            density: 1.0,
            friction: 0.3,
        }
    }

    #[test]
    fn test_dynamic_body_falls() {
        let mut world = PhysicsWorld::new(-10.0);
        let (body, _) = world.spawn_dynamic(Vec2::new(0.0, 10.0), unit_box(), BodyTag::Player);
        for _ in 0..30 {
            world.step(&(), &());
        }
        assert!(world.position(body).y < 10.0);
        assert!(world.velocity(body).y < 0.0);
    }

    #[test]
    fn test_fixed_body_stays_put() {
        let mut world = PhysicsWorld::new(-10.0);
        let (body, _) = world.spawn_fixed(Vec2::new(3.0, 4.0), unit_box(), BodyTag::Platform);
        for _ in 0..30 {
            world.step(&(), &());
        }
        assert_eq!(world.position(body), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_remove_body_drops_collider() {
        let mut world = PhysicsWorld::new(-10.0);
        let (body, collider) =
            world.spawn_fixed(Vec2::ZERO, unit_box(), BodyTag::Platform);
        assert_eq!(world.body_count(), 1);
        world.remove_body(body);
        assert_eq!(world.body_count(), 0);
        assert!(world.colliders.get(collider).is_none());
    }

    #[test]
    fn test_sensor_toggle() {
        let mut world = PhysicsWorld::new(-10.0);
        let (_, collider) = world.spawn_fixed(Vec2::ZERO, unit_box(), BodyTag::Platform);
        assert!(!world.is_sensor(collider));
        world.set_sensor(collider, true);
        assert!(world.is_sensor(collider));
        world.set_sensor(collider, false);
        assert!(!world.is_sensor(collider));
    }

    #[test]
    fn test_body_tag_round_trips_through_user_data() {
        let mut world = PhysicsWorld::new(-10.0);
        let (body, _) = world.spawn_fixed(Vec2::ZERO, unit_box(), BodyTag::Platform);
        let tag = BodyTag::try_from(world.bodies[body].user_data);
        assert_eq!(tag, Ok(BodyTag::Platform));
    }
}
