//! Stage loading
//!
//! Builds a stage document into a physics world: the start floor, the kill
//! plane, and one fixed cuboid body per step. Malformed records are logged
//! and skipped; loading never fails on bad data, only on unreadable input.

use glam::Vec3;
use rapier3d::prelude::*;
use tracing::{info, warn};

use skystep_core::{StepId, Transform};
use skystep_physics::{to_isometry, PhysicsWorld};

use crate::data::{StageData, StepRecord};
use crate::step::{StepObject, StepRegistry};

/// Extents of the starting floor under the spawn point
const START_FLOOR_EXTENTS: Vec3 = Vec3::new(20.0, 0.1, 20.0);

/// How far below the death depth the kill plane sits
const KILL_PLANE_MARGIN: f32 = 5.0;

/// A validated obstacle link from the stage document
#[derive(Debug, Clone, Copy)]
pub struct ObstacleLink {
    /// Step the player must touch to arm the fall
    pub trigger: StepId,
    /// Step that falls
    pub obstacle: StepId,
    /// Seconds between first trigger contact and the fall
    pub delay: f32,
}

/// A stage built into a physics world
#[derive(Debug)]
pub struct LoadedStage {
    /// Display name from the document
    pub name: String,
    /// Player spawn and default respawn point
    pub spawn: Vec3,
    /// All live step objects
    pub steps: StepRegistry,
    /// Validated obstacle links
    pub obstacle_links: Vec<ObstacleLink>,
    /// Skybox face paths, passed through for the renderer
    pub background: Vec<String>,
}

/// Build `data` into `physics`.
///
/// The caller provides a fresh physics world; reloading a stage means
/// dropping the old world and loading into a new one.
pub fn load_stage(data: &StageData, physics: &mut PhysicsWorld, death_depth: f32) -> LoadedStage {
    let mut steps = StepRegistry::new();

    // Starting floor, always present under the spawn point
    steps.insert(build_step(
        physics,
        &StepRecord {
            id: StepId::new(),
            position: Vec3::ZERO,
            rotation: glam::Quat::IDENTITY,
            scale: START_FLOOR_EXTENTS,
            role: None,
            texture: None,
        },
    ));

    // Kill plane; landing on it still counts as a contact, matching the
    // solid floor the original placed below the death depth
    physics.create_ground(death_depth - KILL_PLANE_MARGIN);

    for record in &data.steps {
        if steps.contains(record.id) {
            warn!("Skipping duplicate step id {}", record.id);
            continue;
        }
        if !record.scale.cmpgt(Vec3::ZERO).all() {
            warn!("Skipping step {} with non-positive scale", record.id);
            continue;
        }
        steps.insert(build_step(physics, record));
    }

    for model in &data.models {
        if !model.scale.cmpgt(Vec3::ZERO).all() {
            warn!("Skipping model '{}' with non-positive scale", model.path);
            continue;
        }
        let collider = ColliderBuilder::cuboid(
            model.scale.x / 2.0,
            model.scale.y / 2.0,
            model.scale.z / 2.0,
        )
        .translation(vector![model.position.x, model.position.y, model.position.z])
        .build();
        physics.add_static_collider(collider);
    }

    let mut obstacle_links = Vec::new();
    for record in &data.obstacles {
        if !record.delay.is_finite() || record.delay <= 0.0 {
            warn!(
                "Skipping obstacle link {} -> {}: bad delay {}",
                record.trigger, record.obstacle, record.delay
            );
            continue;
        }
        if !steps.contains(record.trigger) {
            warn!("Skipping obstacle link: unknown trigger step {}", record.trigger);
            continue;
        }
        if !steps.contains(record.obstacle) {
            warn!("Skipping obstacle link: unknown obstacle step {}", record.obstacle);
            continue;
        }
        obstacle_links.push(ObstacleLink {
            trigger: record.trigger,
            obstacle: record.obstacle,
            delay: record.delay,
        });
    }

    info!(
        "Loaded stage '{}': {} steps, {} obstacle links, {} models",
        data.name,
        steps.len(),
        obstacle_links.len(),
        data.models.len()
    );

    LoadedStage {
        name: data.name.clone(),
        spawn: data.spawn,
        steps,
        obstacle_links,
        background: data.background.clone(),
    }
}

fn build_step(physics: &mut PhysicsWorld, record: &StepRecord) -> StepObject {
    let body = RigidBodyBuilder::fixed()
        .position(to_isometry(record.position, record.rotation))
        .build();
    let collider = ColliderBuilder::cuboid(
        record.scale.x / 2.0,
        record.scale.y / 2.0,
        record.scale.z / 2.0,
    )
    .friction(0.7)
    .restitution(0.0)
    .build();

    let (body, collider) = physics.add_body(body, collider);
    StepObject {
        id: record.id,
        body,
        collider,
        role: record.role,
        texture: record.texture.clone(),
        origin: Transform {
            position: record.position,
            rotation: record.rotation,
            scale: record.scale,
        },
    }
}
