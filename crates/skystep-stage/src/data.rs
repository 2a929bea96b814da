//! Stage data model
//!
//! The controller consumes, per step: a unique identifier, a pose, and
//! optionally a checkpoint role or an obstacle link with a delay. Texture,
//! background, and model paths are carried through untouched for the
//! embedding renderer.

use std::fs;
use std::path::Path;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use skystep_core::StepId;

/// Errors produced while reading a stage document
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("failed to read stage file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed stage document: {0}")]
    Json(#[from] serde_json::Error),
}

/// The stages shipped with the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Tutorial,
    Main,
}

impl StageKind {
    /// Path of the stage document relative to the asset root
    pub fn asset_path(&self) -> &'static str {
        match self {
            Self::Tutorial => "assets/stages/tutorial.json",
            Self::Main => "assets/stages/main.json",
        }
    }

    /// The stage that follows this one, if any
    pub fn next(&self) -> Option<StageKind> {
        match self {
            Self::Tutorial => Some(Self::Main),
            Self::Main => None,
        }
    }

    /// Display name
    pub fn title(&self) -> &'static str {
        match self {
            Self::Tutorial => "Tutorial",
            Self::Main => "Main Stage",
        }
    }
}

impl Default for StageKind {
    fn default() -> Self {
        Self::Tutorial
    }
}

/// Checkpoint role a step can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepRole {
    /// Touching the step saves the respawn point
    Save,
    /// Touching the step completes the stage
    End,
}

/// One placed step: a renderable surface paired with its collider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    /// Unique identifier, referenced by obstacle links
    pub id: StepId,
    /// World position of the step center
    pub position: Vec3,
    /// Orientation (identity if omitted)
    #[serde(default = "identity_rotation")]
    pub rotation: Quat,
    /// Full extents of the step box
    pub scale: Vec3,
    /// Optional checkpoint role
    #[serde(default)]
    pub role: Option<StepRole>,
    /// Texture path for the renderer (opaque to the controller)
    #[serde(default)]
    pub texture: Option<String>,
}

fn identity_rotation() -> Quat {
    Quat::IDENTITY
}

/// Links a trigger step to the obstacle step it drops
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleRecord {
    /// Step the player must touch to arm the fall
    pub trigger: StepId,
    /// Step that falls
    pub obstacle: StepId,
    /// Seconds between first trigger contact and the fall
    pub delay: f32,
}

/// Decorative model placement; contributes a fixed collider only
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelRecord {
    /// Model path for the renderer (opaque to the controller)
    pub path: String,
    /// World position
    pub position: Vec3,
    /// Full extents of the collision box
    pub scale: Vec3,
}

/// A complete stage document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageData {
    /// Display name
    pub name: String,
    /// Player spawn and default respawn point
    pub spawn: Vec3,
    /// Skybox face paths for the renderer (opaque)
    #[serde(default)]
    pub background: Vec<String>,
    /// Placed steps
    #[serde(default)]
    pub steps: Vec<StepRecord>,
    /// Obstacle trigger links
    #[serde(default)]
    pub obstacles: Vec<ObstacleRecord>,
    /// Decorative model placements
    #[serde(default)]
    pub models: Vec<ModelRecord>,
}

impl StageData {
    /// Parse a stage document from JSON text
    pub fn from_json(text: &str) -> Result<Self, StageError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a stage document from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StageError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_stage_parses() {
        let data = StageData::from_json(
            r#"{
                "name": "Empty",
                "spawn": [0.0, 2.0, 0.0]
            }"#,
        )
        .unwrap();

        assert_eq!(data.name, "Empty");
        assert_eq!(data.spawn, Vec3::new(0.0, 2.0, 0.0));
        assert!(data.steps.is_empty());
        assert!(data.obstacles.is_empty());
    }

    #[test]
    fn test_step_defaults() {
        let data = StageData::from_json(
            r#"{
                "name": "One step",
                "spawn": [0.0, 2.0, 0.0],
                "steps": [
                    {
                        "id": "8c0f1f8e-40f2-4f3f-9f07-3a1f8b6f2d11",
                        "position": [0.0, 0.0, -10.0],
                        "scale": [4.0, 1.0, 4.0]
                    }
                ]
            }"#,
        )
        .unwrap();

        let step = &data.steps[0];
        assert_eq!(step.rotation, Quat::IDENTITY);
        assert!(step.role.is_none());
        assert!(step.texture.is_none());
    }

    #[test]
    fn test_roles_parse_snake_case() {
        let data = StageData::from_json(
            r#"{
                "name": "Checkpoints",
                "spawn": [0.0, 2.0, 0.0],
                "steps": [
                    {
                        "id": "11111111-1111-1111-1111-111111111111",
                        "position": [0.0, 0.0, -10.0],
                        "scale": [4.0, 1.0, 4.0],
                        "role": "save"
                    },
                    {
                        "id": "22222222-2222-2222-2222-222222222222",
                        "position": [0.0, 0.0, -20.0],
                        "scale": [4.0, 1.0, 4.0],
                        "role": "end"
                    }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(data.steps[0].role, Some(StepRole::Save));
        assert_eq!(data.steps[1].role, Some(StepRole::End));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(
            StageData::from_json("{ not json"),
            Err(StageError::Json(_))
        ));
    }

    #[test]
    fn test_stage_kind_progression() {
        assert_eq!(StageKind::Tutorial.next(), Some(StageKind::Main));
        assert_eq!(StageKind::Main.next(), None);
    }
}
