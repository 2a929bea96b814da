//! Impulse-driven player rigid body
//!
//! The player is a dynamic box with locked rotations. Jumps apply a vertical
//! impulse, airborne steering applies a local-frame force, and grounded
//! movement displaces the body directly along its facing.

use glam::{Quat, Vec3};
use nalgebra::{UnitQuaternion, Vector3};
use rapier3d::prelude::*;

use crate::PhysicsWorld;
use serde::{Deserialize, Serialize};

/// Player body configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerBodyConfig {
    /// Footprint edge length of the collision box (default: 3.0)
    pub size: f32,
    /// Height of the collision box (default: 4.5)
    pub height: f32,
    /// Body mass (default: 1.0)
    pub mass: f32,
    /// Friction against steps (default: 0.1)
    pub friction: f32,
}

impl Default for PlayerBodyConfig {
    fn default() -> Self {
        Self {
            size: 3.0,
            height: 4.5,
            mass: 1.0,
            friction: 0.1,
        }
    }
}

/// The player's rigid body and collider in the physics world
pub struct PlayerBody {
    /// Configuration
    pub config: PlayerBodyConfig,
    body: RigidBodyHandle,
    collider: ColliderHandle,
}

impl PlayerBody {
    /// Spawn the player body at the given position
    pub fn spawn(physics: &mut PhysicsWorld, config: PlayerBodyConfig, position: Vec3) -> Self {
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![position.x, position.y, position.z])
            .lock_rotations()
            .additional_mass(config.mass)
            .build();

        // Mass comes from the body so the box dimensions don't change the jump arc
        let collider = ColliderBuilder::cuboid(
            config.size / 2.0,
            config.height / 2.0,
            config.size / 2.0,
        )
        .density(0.0)
        .friction(config.friction)
        .restitution(0.0)
        .active_events(ActiveEvents::COLLISION_EVENTS)
        .build();

        let (body, collider) = physics.add_body(body, collider);
        Self {
            config,
            body,
            collider,
        }
    }

    /// The rigid body handle
    pub fn body_handle(&self) -> RigidBodyHandle {
        self.body
    }

    /// The collider handle, used to match contact events
    pub fn collider_handle(&self) -> ColliderHandle {
        self.collider
    }

    /// The body's world position
    pub fn position(&self, physics: &PhysicsWorld) -> Vec3 {
        let Some(body) = physics.get_rigid_body(self.body) else {
            return Vec3::ZERO;
        };
        let t = body.translation();
        Vec3::new(t.x, t.y, t.z)
    }

    /// The body's facing rotation
    pub fn rotation(&self, physics: &PhysicsWorld) -> Quat {
        let Some(body) = physics.get_rigid_body(self.body) else {
            return Quat::IDENTITY;
        };
        let r = body.rotation();
        Quat::from_xyzw(r.coords.x, r.coords.y, r.coords.z, r.coords.w)
    }

    /// The body's linear velocity
    pub fn linvel(&self, physics: &PhysicsWorld) -> Vec3 {
        let Some(body) = physics.get_rigid_body(self.body) else {
            return Vec3::ZERO;
        };
        let v = body.linvel();
        Vec3::new(v.x, v.y, v.z)
    }

    /// Point the body's facing at the given yaw (rotation about Y)
    pub fn set_yaw(&self, physics: &mut PhysicsWorld, yaw: f32) {
        if let Some(body) = physics.get_rigid_body_mut(self.body) {
            let rotation = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), yaw);
            body.set_rotation(rotation, true);
        }
    }

    /// Displace the body along its local frame (grounded movement)
    pub fn displace_local(&self, physics: &mut PhysicsWorld, delta: Vec3) {
        if let Some(body) = physics.get_rigid_body_mut(self.body) {
            let world = body.position().rotation * vector![delta.x, delta.y, delta.z];
            let translation = body.translation() + world;
            body.set_translation(translation, true);
        }
    }

    /// Replace the persistent force with one in the body's local frame
    /// (airborne steering); pass `Vec3::ZERO` to clear it.
    pub fn set_local_force(&self, physics: &mut PhysicsWorld, force: Vec3) {
        if let Some(body) = physics.get_rigid_body_mut(self.body) {
            body.reset_forces(true);
            if force != Vec3::ZERO {
                let world = body.position().rotation * vector![force.x, force.y, force.z];
                body.add_force(world, true);
            }
        }
    }

    /// Apply a vertical jump impulse
    pub fn apply_jump_impulse(&self, physics: &mut PhysicsWorld, impulse: f32) {
        if let Some(body) = physics.get_rigid_body_mut(self.body) {
            body.apply_impulse(vector![0.0, impulse, 0.0], true);
        }
    }

    /// Teleport the body, zeroing velocity and forces (respawn)
    pub fn teleport(&self, physics: &mut PhysicsWorld, position: Vec3) {
        if let Some(body) = physics.get_rigid_body_mut(self.body) {
            body.reset_forces(true);
            body.set_linvel(vector![0.0, 0.0, 0.0], true);
            body.set_translation(vector![position.x, position.y, position.z], true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_with_ground() -> PhysicsWorld {
        let mut world = PhysicsWorld::new();
        world.create_ground(0.0);
        world
    }

    #[test]
    fn test_spawn_position() {
        let mut world = world_with_ground();
        let player = PlayerBody::spawn(
            &mut world,
            PlayerBodyConfig::default(),
            Vec3::new(0.0, 3.0, 0.0),
        );
        assert_eq!(player.position(&world), Vec3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn test_jump_impulse_gives_upward_velocity() {
        let mut world = world_with_ground();
        let player = PlayerBody::spawn(
            &mut world,
            PlayerBodyConfig::default(),
            Vec3::new(0.0, 3.0, 0.0),
        );
        player.apply_jump_impulse(&mut world, 10.0);
        // mass is 1, so the impulse maps directly onto velocity
        assert!((player.linvel(&world).y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_displace_local_follows_facing() {
        let mut world = world_with_ground();
        let player = PlayerBody::spawn(
            &mut world,
            PlayerBodyConfig::default(),
            Vec3::new(0.0, 3.0, 0.0),
        );

        // Face 90 degrees left; local -Z now points along -X
        player.set_yaw(&mut world, std::f32::consts::FRAC_PI_2);
        player.displace_local(&mut world, Vec3::new(0.0, 0.0, -1.0));

        let position = player.position(&world);
        assert!((position.x - -1.0).abs() < 1e-4);
        assert!(position.z.abs() < 1e-4);
    }

    #[test]
    fn test_teleport_zeroes_velocity() {
        let mut world = world_with_ground();
        let player = PlayerBody::spawn(
            &mut world,
            PlayerBodyConfig::default(),
            Vec3::new(0.0, 3.0, 0.0),
        );
        player.apply_jump_impulse(&mut world, 10.0);
        player.teleport(&mut world, Vec3::new(5.0, 2.0, 5.0));

        assert_eq!(player.position(&world), Vec3::new(5.0, 2.0, 5.0));
        assert_eq!(player.linvel(&world), Vec3::ZERO);
    }
}
