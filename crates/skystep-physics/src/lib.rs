//! Skystep Physics - Physics simulation using rapier3d
//!
//! Wraps the rapier3d pipeline with the pieces the platformer needs: a
//! per-frame list of contact transitions (instead of registered callbacks),
//! body mode switching for falling obstacles, and the player body.

mod player_body;

pub use player_body::{PlayerBody, PlayerBodyConfig};

use glam::{Quat, Vec3};
use nalgebra::{Quaternion, Translation3, Unit, UnitQuaternion};
use rapier3d::crossbeam::channel::{unbounded, Receiver};
use rapier3d::prelude::*;
use serde::{Deserialize, Serialize};

use skystep_core::Transform;

/// Physics world configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Gravity vector (default: -25 on Y axis, tuned for the jump arc)
    pub gravity: Vec3,
    /// Physics timestep (default: 1/60)
    pub timestep: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -25.0, 0.0),
            timestep: 1.0 / 60.0,
        }
    }
}

/// Which side of a contact transition an event reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    /// The two colliders began touching during this step
    Started,
    /// The two colliders stopped touching during this step
    Stopped,
}

/// One contact transition between two colliders.
///
/// Events are collected during [`PhysicsWorld::step`] and drained once per
/// frame with [`PhysicsWorld::take_contact_events`]; game systems evaluate
/// their transitions against this list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactEvent {
    pub first: ColliderHandle,
    pub second: ColliderHandle,
    pub phase: ContactPhase,
}

impl ContactEvent {
    /// Whether this event is a contact start
    pub fn is_started(&self) -> bool {
        self.phase == ContactPhase::Started
    }

    /// If the event involves `collider`, returns the other collider
    pub fn other(&self, collider: ColliderHandle) -> Option<ColliderHandle> {
        if self.first == collider {
            Some(self.second)
        } else if self.second == collider {
            Some(self.first)
        } else {
            None
        }
    }
}

/// The main physics world containing all simulation state
pub struct PhysicsWorld {
    /// Configuration
    pub config: PhysicsConfig,

    /// Rigid body storage
    pub rigid_body_set: RigidBodySet,
    /// Collider storage
    pub collider_set: ColliderSet,
    /// Impulse joint storage
    pub impulse_joint_set: ImpulseJointSet,
    /// Multi-body joint storage
    pub multibody_joint_set: MultibodyJointSet,

    /// Integration parameters
    integration_parameters: IntegrationParameters,
    /// Physics pipeline
    physics_pipeline: PhysicsPipeline,
    /// Island manager
    island_manager: IslandManager,
    /// Broad phase collision detection
    broad_phase: DefaultBroadPhase,
    /// Narrow phase collision detection
    narrow_phase: NarrowPhase,
    /// Continuous collision detection solver
    ccd_solver: CCDSolver,
    /// Query pipeline, kept in sync by the step
    query_pipeline: QueryPipeline,

    /// Collects collision events emitted by the step
    event_collector: ChannelEventCollector,
    collision_recv: Receiver<CollisionEvent>,
    contact_force_recv: Receiver<ContactForceEvent>,
    /// Events accumulated since the last drain
    pending_events: Vec<ContactEvent>,
}

impl PhysicsWorld {
    /// Create a new physics world with default configuration
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create a new physics world with custom configuration
    pub fn with_config(config: PhysicsConfig) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = config.timestep;

        let (collision_send, collision_recv) = unbounded();
        let (contact_force_send, contact_force_recv) = unbounded();
        let event_collector = ChannelEventCollector::new(collision_send, contact_force_send);

        Self {
            config,
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            event_collector,
            collision_recv,
            contact_force_recv,
            pending_events: Vec::new(),
        }
    }

    /// Step the physics simulation and collect contact transitions
    pub fn step(&mut self) {
        let gravity = vector![self.config.gravity.x, self.config.gravity.y, self.config.gravity.z];

        self.physics_pipeline.step(
            &gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.event_collector,
        );

        while let Ok(event) = self.collision_recv.try_recv() {
            let contact = match event {
                CollisionEvent::Started(first, second, _) => ContactEvent {
                    first,
                    second,
                    phase: ContactPhase::Started,
                },
                CollisionEvent::Stopped(first, second, _) => ContactEvent {
                    first,
                    second,
                    phase: ContactPhase::Stopped,
                },
            };
            self.pending_events.push(contact);
        }

        // Contact force reports are not consumed by any system; drain so the
        // channel does not grow unbounded.
        while self.contact_force_recv.try_recv().is_ok() {}
    }

    /// Take all contact events collected since the last call
    pub fn take_contact_events(&mut self) -> Vec<ContactEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Add a static collider (kill plane, walls, etc.)
    pub fn add_static_collider(&mut self, collider: Collider) -> ColliderHandle {
        self.collider_set.insert(collider)
    }

    /// Add a rigid body with a collider
    pub fn add_body(
        &mut self,
        rigid_body: RigidBody,
        collider: Collider,
    ) -> (RigidBodyHandle, ColliderHandle) {
        let rb_handle = self.rigid_body_set.insert(rigid_body);
        let col_handle =
            self.collider_set
                .insert_with_parent(collider, rb_handle, &mut self.rigid_body_set);
        (rb_handle, col_handle)
    }

    /// Get a rigid body by handle
    pub fn get_rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    /// Get a mutable rigid body by handle
    pub fn get_rigid_body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.rigid_body_set.get_mut(handle)
    }

    /// Get a collider by handle
    pub fn get_collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.collider_set.get(handle)
    }

    /// Read a body's pose as a transform (unit scale)
    pub fn body_transform(&self, handle: RigidBodyHandle) -> Option<Transform> {
        let body = self.rigid_body_set.get(handle)?;
        let (position, rotation) = from_isometry(body.position());
        Some(Transform::from_position_rotation(position, rotation))
    }

    /// Switch a fixed body to dynamic so it falls under gravity.
    ///
    /// Forces and velocity are zeroed first so the fall starts clean.
    pub fn release_body_dynamic(&mut self, handle: RigidBodyHandle) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.reset_forces(true);
            body.set_linvel(vector![0.0, 0.0, 0.0], true);
            body.set_angvel(vector![0.0, 0.0, 0.0], true);
            body.set_body_type(RigidBodyType::Dynamic, true);
        }
    }

    /// Switch a body back to fixed at the given pose
    pub fn restore_body_fixed(&mut self, handle: RigidBodyHandle, position: Vec3, rotation: Quat) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_linvel(vector![0.0, 0.0, 0.0], true);
            body.set_angvel(vector![0.0, 0.0, 0.0], true);
            body.set_body_type(RigidBodyType::Fixed, true);
            body.set_position(to_isometry(position, rotation), true);
        }
    }

    /// Create a horizontal kill/ground plane collider at the given height
    pub fn create_ground(&mut self, y: f32) -> ColliderHandle {
        let normal = Unit::new_normalize(vector![0.0, 1.0, 0.0]);
        let ground = ColliderBuilder::halfspace(normal)
            .translation(vector![0.0, y, 0.0])
            .friction(0.7)
            .restitution(0.0)
            .build();
        self.add_static_collider(ground)
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a rapier isometry from a glam position and rotation
pub fn to_isometry(position: Vec3, rotation: Quat) -> Isometry<Real> {
    let translation = Translation3::new(position.x, position.y, position.z);
    let quaternion = Quaternion::new(rotation.w, rotation.x, rotation.y, rotation.z);
    Isometry::from_parts(translation, UnitQuaternion::new_normalize(quaternion))
}

/// Split a rapier isometry into a glam position and rotation
pub fn from_isometry(iso: &Isometry<Real>) -> (Vec3, Quat) {
    let t = iso.translation.vector;
    let r = iso.rotation;
    (
        Vec3::new(t.x, t.y, t.z),
        Quat::from_xyzw(r.coords.x, r.coords.y, r.coords.z, r.coords.w),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_box(world: &mut PhysicsWorld, position: Vec3) -> RigidBodyHandle {
        let body = RigidBodyBuilder::fixed()
            .translation(vector![position.x, position.y, position.z])
            .build();
        let collider = ColliderBuilder::cuboid(1.0, 1.0, 1.0).build();
        world.add_body(body, collider).0
    }

    #[test]
    fn test_physics_world_creation() {
        let world = PhysicsWorld::new();
        assert_eq!(world.config.gravity, Vec3::new(0.0, -25.0, 0.0));
    }

    #[test]
    fn test_isometry_roundtrip() {
        let position = Vec3::new(1.0, -2.0, 3.0);
        let rotation = Quat::from_rotation_y(0.7);
        let (p, r) = from_isometry(&to_isometry(position, rotation));
        assert!((p - position).length() < 1e-5);
        assert!(r.dot(rotation).abs() > 0.9999);
    }

    #[test]
    fn test_fixed_body_does_not_fall() {
        let mut world = PhysicsWorld::new();
        let handle = fixed_box(&mut world, Vec3::new(0.0, 5.0, 0.0));
        for _ in 0..10 {
            world.step();
        }
        let transform = world.body_transform(handle).unwrap();
        assert!((transform.position.y - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_released_body_falls_and_restores() {
        let mut world = PhysicsWorld::new();
        let handle = fixed_box(&mut world, Vec3::new(0.0, 5.0, 0.0));

        world.release_body_dynamic(handle);
        for _ in 0..30 {
            world.step();
        }
        let fallen = world.body_transform(handle).unwrap();
        assert!(fallen.position.y < 5.0);

        world.restore_body_fixed(handle, Vec3::new(0.0, 5.0, 0.0), Quat::IDENTITY);
        let restored = world.body_transform(handle).unwrap();
        assert!((restored.position.y - 5.0).abs() < 1e-4);
        for _ in 0..10 {
            world.step();
        }
        let still = world.body_transform(handle).unwrap();
        assert!((still.position.y - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_contact_events_drained_once() {
        let mut world = PhysicsWorld::new();
        world.create_ground(0.0);

        let body = RigidBodyBuilder::dynamic()
            .translation(vector![0.0, 2.0, 0.0])
            .build();
        let collider = ColliderBuilder::ball(0.5)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        world.add_body(body, collider);

        // Let the ball drop onto the plane
        for _ in 0..120 {
            world.step();
        }

        let events = world.take_contact_events();
        assert!(events.iter().any(|e| e.is_started()));
        assert!(world.take_contact_events().is_empty());
    }
}
