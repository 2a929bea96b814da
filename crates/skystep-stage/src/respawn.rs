//! Respawn bookkeeping

use glam::Vec3;

/// Where the player comes back after dying.
///
/// Starts at the stage default; touching a save step replaces it until the
/// stage is reloaded or the state is explicitly reset.
#[derive(Debug, Clone)]
pub struct RespawnState {
    stage_default: Vec3,
    saved: Option<Vec3>,
}

impl RespawnState {
    /// Create respawn state for a stage
    pub fn new(stage_default: Vec3) -> Self {
        Self {
            stage_default,
            saved: None,
        }
    }

    /// The position the player respawns at
    pub fn position(&self) -> Vec3 {
        self.saved.unwrap_or(self.stage_default)
    }

    /// Whether a checkpoint has been saved
    pub fn has_checkpoint(&self) -> bool {
        self.saved.is_some()
    }

    /// Save a checkpoint position
    pub fn save(&mut self, position: Vec3) {
        self.saved = Some(position);
    }

    /// Forget any saved checkpoint
    pub fn reset(&mut self) {
        self.saved = None;
    }

    /// Replace the stage default and forget any saved checkpoint (stage load)
    pub fn reset_to(&mut self, stage_default: Vec3) {
        self.stage_default = stage_default;
        self.saved = None;
    }
}
