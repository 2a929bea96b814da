//! Checkpoint handling
//!
//! Steps tagged with a role react to player contact: save steps update the
//! respawn point (offset upward so the player lands on the step), end steps
//! signal stage completion.

use glam::Vec3;

use skystep_physics::PhysicsWorld;
use skystep_stage::{StepObject, StepRole};

/// Result of the player touching a tagged step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CheckpointEvent {
    /// The respawn point moved to this position
    SaveReached(Vec3),
    /// The stage's end step was touched
    EndReached,
}

/// Resolves step contacts into checkpoint events
#[derive(Debug, Clone)]
pub struct CheckpointSystem {
    /// How far above a save step the respawn point sits
    pub save_offset: f32,
}

impl Default for CheckpointSystem {
    fn default() -> Self {
        Self { save_offset: 3.0 }
    }
}

impl CheckpointSystem {
    /// Create a checkpoint system with the default save offset
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a player contact with `step` into a checkpoint event, if the
    /// step carries a role
    pub fn handle_contact(
        &self,
        step: &StepObject,
        physics: &PhysicsWorld,
    ) -> Option<CheckpointEvent> {
        match step.role? {
            StepRole::Save => {
                let position = step.pose(physics).position + Vec3::Y * self.save_offset;
                Some(CheckpointEvent::SaveReached(position))
            }
            StepRole::End => Some(CheckpointEvent::EndReached),
        }
    }
}
