//! Game configuration
//!
//! Uses RON (Rusty Object Notation) for a human-editable `config.ron`.
//! Every field has a default, so a partial file only overrides what it
//! names and a missing file means stock settings.

use std::fs;
use std::path::Path;

use macroquad::math::IVec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Player movement and combat tuning, in pixels and seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    pub max_ground_speed: f32,
    pub max_air_speed: f32,
    pub ground_accel: f32,
    pub air_accel: f32,
    /// Deceleration applied by the mover while grounded
    pub friction: f32,
    pub hurt_friction: f32,
    pub gravity: f32,
    /// Upward speed at the start of a jump
    pub jump_force: f32,
    /// How long holding jump keeps the jump force applied
    pub jump_time: f32,
    pub max_fall: f32,
    pub max_health: i32,
    pub hurt_duration: f32,
    pub invincible_duration: f32,
    /// Fallback attack length when the sprite has no "attack" animation
    pub attack_duration: f32,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            max_ground_speed: 60.0,
            max_air_speed: 70.0,
            ground_accel: 500.0,
            air_accel: 20.0,
            friction: 800.0,
            hurt_friction: 200.0,
            gravity: 450.0,
            jump_force: 105.0,
            jump_time: 0.18,
            max_fall: 120.0,
            max_health: 4,
            hurt_duration: 0.5,
            invincible_duration: 1.5,
            attack_duration: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Room (and view) width in pixels
    pub width: i32,
    /// Room (and view) height in pixels
    pub height: i32,
    pub tile_size: i32,
    pub start_room: (i32, i32),
    /// Seconds to ease the camera between rooms
    pub transition_duration: f32,
    /// Upward speed given to the player after entering a room from below
    pub up_boost: f32,
    /// Pixels below the room bottom that count as a fatal fall
    pub fall_margin: i32,
    /// Seconds a dead player lies before the room reloads
    pub respawn_delay: f32,
    /// Refuse transitions into rooms to the left
    pub only_forward: bool,
    /// Real seconds of hit-stop when something is hurt
    pub hit_stop: f32,
    /// Input press buffer window in seconds
    pub press_buffer: f32,
    pub draw_colliders: bool,
    /// Fixed RNG seed for reproducible tile variation
    pub seed: Option<u64>,
    pub player: PlayerSettings,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 180,
            tile_size: 8,
            start_room: (0, 0),
            transition_duration: 0.4,
            up_boost: 180.0,
            fall_margin: 64,
            respawn_delay: 1.5,
            only_forward: false,
            hit_stop: 0.1,
            press_buffer: 0.15,
            draw_colliders: false,
            seed: None,
            player: PlayerSettings::default(),
        }
    }
}

impl GameConfig {
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject sizes the room grid cannot be built from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tile_size <= 0 {
            return Err(ConfigError::Invalid(format!("tile_size must be positive, got {}", self.tile_size)));
        }
        if self.width <= 0 || self.height <= 0 {
            return Err(ConfigError::Invalid(format!(
                "room size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_ron(&text)
    }

    /// Load `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Tile columns per room
    pub fn columns(&self) -> i32 {
        self.width / self.tile_size
    }

    /// Tile rows per room (a partial bottom row counts)
    pub fn rows(&self) -> i32 {
        (self.height + self.tile_size - 1) / self.tile_size
    }

    pub fn start_room(&self) -> IVec2 {
        IVec2::new(self.start_room.0, self.start_room.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid() {
        let config = GameConfig::default();
        assert_eq!(config.columns(), 40);
        assert_eq!(config.rows(), 23);
    }

    #[test]
    fn test_partial_ron_overrides() {
        let config = GameConfig::from_ron("(tile_size: 16, only_forward: true, player: (max_health: 9))").unwrap();
        assert_eq!(config.tile_size, 16);
        assert!(config.only_forward);
        assert_eq!(config.player.max_health, 9);
        assert_eq!(config.player.jump_force, PlayerSettings::default().jump_force);
        assert_eq!(config.width, 320);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ron");
        assert_eq!(GameConfig::load_or_default(&path).unwrap(), GameConfig::default());

        fs::write(&path, "(start_room: (2, 1), seed: Some(5))").unwrap();
        let config = GameConfig::load_or_default(&path).unwrap();
        assert_eq!(config.start_room(), IVec2::new(2, 1));
        assert_eq!(config.seed, Some(5));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(GameConfig::from_ron("(width: \"wide\")"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_rejects_zero_tile_size() {
        let err = GameConfig::from_ron("(tile_size: 0)").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.contains("tile_size")));
        assert!(matches!(GameConfig::from_ron("(width: -320)"), Err(ConfigError::Invalid(_))));
        assert!(matches!(GameConfig::from_ron("(height: 0)"), Err(ConfigError::Invalid(_))));
        assert!(GameConfig::default().validate().is_ok());
    }
}
