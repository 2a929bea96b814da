//! Player state machine and movement

mod controller;
mod movement;
mod super_jump;

pub use controller::PlayerController;
pub use movement::MovementConfig;
pub use super_jump::SuperJump;

/// The player's life/motion state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    /// Standing on a surface; lateral input displaces the body directly
    Grounded,
    /// Airborne after a jump; lateral input applies a steering force
    Jumping,
    /// Fell below the death depth or was crushed; only respawn input works
    Dead,
}

impl PlayerState {
    /// Whether the player is alive
    pub fn is_alive(&self) -> bool {
        !matches!(self, Self::Dead)
    }
}
