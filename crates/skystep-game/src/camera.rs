//! Third-person orbit camera
//!
//! Yaw/pitch orbit around the player driven by mouse deltas; view math only,
//! rendering belongs to the embedding engine. The player's facing follows
//! the camera yaw while alive.

use glam::{Mat4, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Orbit distance from the follow target
    pub distance: f32,
    /// Vertical offset of the follow target above the player position
    pub height_offset: f32,
    /// Mouse sensitivity (radians per pixel)
    pub sensitivity: f32,
    /// Lowest pitch in degrees (looking down)
    pub pitch_min: f32,
    /// Highest pitch in degrees (looking up)
    pub pitch_max: f32,
    /// Yaw the camera resets to on spawn and respawn
    pub initial_yaw: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 10.0,
            height_offset: 3.0,
            sensitivity: 0.002,
            pitch_min: -80.0,
            pitch_max: 60.0,
            initial_yaw: std::f32::consts::PI,
        }
    }
}

/// Orbit camera following the player
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Configuration
    pub config: CameraConfig,
    yaw: f32,
    pitch: f32,
    position: Vec3,
    target: Vec3,
}

impl OrbitCamera {
    /// Create a camera with default config
    pub fn new() -> Self {
        Self::with_config(CameraConfig::default())
    }

    /// Create a camera with custom config
    pub fn with_config(config: CameraConfig) -> Self {
        let yaw = config.initial_yaw;
        Self {
            config,
            yaw,
            pitch: 0.0,
            position: Vec3::ZERO,
            target: Vec3::ZERO,
        }
    }

    /// Current yaw in radians
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Current pitch in radians
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// The camera's world position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// The point the camera is looking at
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// The camera's orientation
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(glam::EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    /// The camera's forward direction
    pub fn forward(&self) -> Vec3 {
        self.rotation() * -Vec3::Z
    }

    /// Apply mouse deltas to the orbit angles, clamping pitch
    pub fn handle_mouse_look(&mut self, mouse_delta: Vec2) {
        self.yaw -= mouse_delta.x * self.config.sensitivity;
        self.pitch -= mouse_delta.y * self.config.sensitivity;

        let pitch_min = self.config.pitch_min.to_radians();
        let pitch_max = self.config.pitch_max.to_radians();
        self.pitch = self.pitch.clamp(pitch_min, pitch_max);
    }

    /// Recompute the orbit position around the player
    pub fn follow(&mut self, player_position: Vec3) {
        self.target = player_position + Vec3::Y * self.config.height_offset;
        self.position = self.target - self.forward() * self.config.distance;
    }

    /// Reset the orbit angles (respawn, stage load)
    pub fn reset_angles(&mut self) {
        self.yaw = self.config.initial_yaw;
        self.pitch = 0.0;
    }

    /// The view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// A perspective projection matrix for this camera
    pub fn projection_matrix(&self, aspect_ratio: f32, fov_degrees: f32) -> Mat4 {
        Mat4::perspective_rh(fov_degrees.to_radians(), aspect_ratio, 0.1, 1000.0)
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new()
    }
}
