//! Skystep Game - Game logic and systems
//!
//! Provides the player state machine, obstacle triggers, checkpoints, input
//! handling, the orbit camera, animation cues, and the per-frame session loop.

pub mod animation;
pub mod camera;
pub mod checkpoint;
pub mod input;
pub mod obstacle;
pub mod player;
pub mod session;

pub use animation::{AnimationClip, AnimationDriver, CrossFade};
pub use camera::{CameraConfig, OrbitCamera};
pub use checkpoint::{CheckpointEvent, CheckpointSystem};
pub use input::{InputAction, InputBindings, InputHandler, InputState};
pub use obstacle::{ObstacleConfig, ObstacleSystem, TrapPhase};
pub use player::{MovementConfig, PlayerController, PlayerState, SuperJump};
pub use session::{GameConfig, GameSession};
