//! Skystep Stage - Stage data and the loading pipeline
//!
//! Stages are static structured documents (steps, checkpoint roles, obstacle
//! links, opaque model/texture references). Loading builds them into a fresh
//! physics world and produces the step registry the game systems run against.

pub mod data;
pub mod loader;
pub mod respawn;
pub mod step;

pub use data::{ModelRecord, ObstacleRecord, StageData, StageError, StageKind, StepRecord, StepRole};
pub use loader::{load_stage, LoadedStage, ObstacleLink};
pub use respawn::RespawnState;
pub use step::{StepObject, StepRegistry};
