//! Movement configuration and constants

use serde::{Deserialize, Serialize};

/// Movement configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementConfig {
    /// Grounded movement speed in meters per second
    pub move_speed: f32,
    /// Speed and steering magnification while sprinting
    pub sprint_multiplier: f32,
    /// Steering force applied while airborne
    pub air_force: f32,
    /// Vertical impulse of a normal jump
    pub jump_impulse: f32,
    /// Vertical impulse of the super jump
    pub super_jump_impulse: f32,
    /// Cooldown of the super jump in seconds
    pub super_jump_cooldown: f32,
    /// Delay between the jump animation starting and the impulse firing
    pub jump_windup: f32,
    /// Vertical position below which the player dies
    pub death_depth: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            move_speed: 6.0,
            sprint_multiplier: 2.0,
            air_force: 10.0,
            jump_impulse: 10.0,
            super_jump_impulse: 50.0,
            super_jump_cooldown: 10.0,
            jump_windup: 0.4,
            death_depth: -20.0,
        }
    }
}

impl MovementConfig {
    /// Grounded speed for the current sprint state
    pub fn speed(&self, sprinting: bool) -> f32 {
        if sprinting {
            self.move_speed * self.sprint_multiplier
        } else {
            self.move_speed
        }
    }

    /// Airborne steering force for the current sprint state
    pub fn steer_force(&self, sprinting: bool) -> f32 {
        if sprinting {
            self.air_force * self.sprint_multiplier
        } else {
            self.air_force
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprint_scales_speed_and_force() {
        let config = MovementConfig::default();
        assert_eq!(config.speed(true), config.move_speed * config.sprint_multiplier);
        assert_eq!(config.speed(false), config.move_speed);
        assert_eq!(config.steer_force(true), config.air_force * config.sprint_multiplier);
    }
}
