//! Game settings with persistence
//!
//! Settings are saved to `~/.config/skystep/settings.toml`

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use skystep_core::TimeConfig;
use skystep_game::{CameraConfig, GameConfig, MovementConfig, ObstacleConfig};
use skystep_physics::{PhysicsConfig, PlayerBodyConfig};

/// All game settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub physics: PhysicsConfig,
    pub body: PlayerBodyConfig,
    pub movement: MovementConfig,
    pub camera: CameraConfig,
    pub obstacle: ObstacleConfig,
    pub time: TimeConfig,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            body: PlayerBodyConfig::default(),
            movement: MovementConfig::default(),
            camera: CameraConfig::default(),
            obstacle: ObstacleConfig::default(),
            time: TimeConfig::default(),
        }
    }
}

impl GameSettings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("skystep"))
    }

    /// Get the settings file path
    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory");
            return Self::default();
        };

        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(dir) = Self::config_dir() else {
            anyhow::bail!("Could not determine config directory");
        };

        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        let path = dir.join("settings.toml");
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Assemble the session config from these settings
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            physics: self.physics.clone(),
            body: self.body.clone(),
            movement: self.movement.clone(),
            camera: self.camera.clone(),
            obstacle: self.obstacle.clone(),
            time: self.time.clone(),
        }
    }
}
