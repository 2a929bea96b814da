//! Skystep Core - Core types and utilities shared by the Skystep crates
//!
//! This crate provides the foundational types used throughout the controller:
//! - Mathematical primitives (re-exported from glam)
//! - Transform for step and player poses
//! - Frame-time accounting with fixed physics sub-steps

pub mod time;
pub mod types;

pub use glam::{Mat4, Quat, Vec2, Vec3};
pub use time::{GameTime, TimeConfig};
pub use types::{StepId, Transform};
