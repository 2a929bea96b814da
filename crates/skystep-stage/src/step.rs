//! Step objects and their registry

use std::collections::HashMap;

use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};

use skystep_core::{StepId, Transform};
use skystep_physics::PhysicsWorld;

use crate::data::StepRole;

/// A live step object: identifier, physics handles, checkpoint role, and the
/// renderer's texture hint. Pairs a renderable surface with its collider.
#[derive(Debug, Clone)]
pub struct StepObject {
    /// Stable identifier from the stage document
    pub id: StepId,
    /// The step's rigid body
    pub body: RigidBodyHandle,
    /// The step's collider, matched against contact events
    pub collider: ColliderHandle,
    /// Checkpoint role, if any
    pub role: Option<StepRole>,
    /// Texture path for the renderer (opaque to the controller)
    pub texture: Option<String>,
    /// Pose the step was placed with
    pub origin: Transform,
}

impl StepObject {
    /// Read the step's current pose from the physics world.
    ///
    /// Falls back to the placement pose if the body is gone; the scale always
    /// comes from the placement since physics bodies carry none.
    pub fn pose(&self, physics: &PhysicsWorld) -> Transform {
        match physics.body_transform(self.body) {
            Some(mut transform) => {
                transform.scale = self.origin.scale;
                transform
            }
            None => self.origin,
        }
    }
}

/// Lookup of the loaded stage's step objects by id and by collider
#[derive(Debug, Clone, Default)]
pub struct StepRegistry {
    steps: Vec<StepObject>,
    by_id: HashMap<StepId, usize>,
    by_collider: HashMap<ColliderHandle, usize>,
}

impl StepRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a step object
    pub fn insert(&mut self, step: StepObject) {
        let index = self.steps.len();
        self.by_id.insert(step.id, index);
        self.by_collider.insert(step.collider, index);
        self.steps.push(step);
    }

    /// Whether a step with this id is registered
    pub fn contains(&self, id: StepId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Look up a step by id
    pub fn get(&self, id: StepId) -> Option<&StepObject> {
        self.by_id.get(&id).map(|&i| &self.steps[i])
    }

    /// Look up a step by its collider handle
    pub fn get_by_collider(&self, collider: ColliderHandle) -> Option<&StepObject> {
        self.by_collider.get(&collider).map(|&i| &self.steps[i])
    }

    /// Number of registered steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Iterate over all steps
    pub fn iter(&self) -> impl Iterator<Item = &StepObject> {
        self.steps.iter()
    }
}
