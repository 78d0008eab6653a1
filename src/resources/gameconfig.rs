//! Game configuration resource.
//!
//! Manages game settings loaded from an INI configuration file. Provides
//! defaults for safe startup and methods to load/save configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [window]
//! target_fps = 120
//!
//! [controls]
//! mouse_sensitivity_x = 50
//! mouse_sensitivity_y = 50
//!
//! [physics]
//! gravity = 60.7
//!
//! [player]
//! speed = 7
//! max_speed = 10
//! max_jump_speed = 20
//! friction = 5
//! inventory_size = 5
//! pickup_cooldown = 0.5
//!
//! [dialogue]
//! typing_speed = 10
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

use crate::components::player::{
    DEFAULT_FRICTION, DEFAULT_INVENTORY_SIZE, DEFAULT_MAX_JUMP_SPEED, DEFAULT_MAX_SPEED,
    DEFAULT_PICKUP_COOLDOWN, DEFAULT_SPEED, Player,
};
use crate::components::typewriter::DEFAULT_TYPING_SPEED;
use crate::systems::look::LookSettings;

/// Default safe values for startup
const DEFAULT_TARGET_FPS: u32 = 120;
const DEFAULT_MOUSE_SENSITIVITY: f32 = 50.0;
const DEFAULT_GRAVITY: f32 = 60.7;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Game configuration resource.
#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    /// Target ticks per second; the headless runner derives its fixed `dt`
    /// from it.
    pub target_fps: u32,
    /// Horizontal look speed in degrees per unit of mouse motion per second.
    pub mouse_sensitivity_x: f32,
    /// Vertical look speed in degrees per unit of mouse motion per second.
    pub mouse_sensitivity_y: f32,
    /// Downward acceleration in units per second squared.
    pub gravity: f32,
    pub player_speed: f32,
    pub player_max_speed: f32,
    pub player_max_jump_speed: f32,
    pub player_friction: f32,
    pub inventory_size: usize,
    /// Seconds between accepted pickup/drop toggles.
    pub pickup_cooldown: f32,
    /// Default characters per second for dialogue text.
    pub typing_speed: f32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            target_fps: DEFAULT_TARGET_FPS,
            mouse_sensitivity_x: DEFAULT_MOUSE_SENSITIVITY,
            mouse_sensitivity_y: DEFAULT_MOUSE_SENSITIVITY,
            gravity: DEFAULT_GRAVITY,
            player_speed: DEFAULT_SPEED,
            player_max_speed: DEFAULT_MAX_SPEED,
            player_max_jump_speed: DEFAULT_MAX_JUMP_SPEED,
            player_friction: DEFAULT_FRICTION,
            inventory_size: DEFAULT_INVENTORY_SIZE,
            pickup_cooldown: DEFAULT_PICKUP_COOLDOWN,
            typing_speed: DEFAULT_TYPING_SPEED,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    fn apply(&mut self, config: &Ini) {
        let float = |section: &str, key: &str| {
            config
                .getfloat(section, key)
                .ok()
                .flatten()
                .map(|v| v as f32)
        };

        // [window] section
        if let Some(fps) = config.getuint("window", "target_fps").ok().flatten() {
            self.target_fps = fps as u32;
        }

        // [controls] section
        if let Some(v) = float("controls", "mouse_sensitivity_x") {
            self.mouse_sensitivity_x = v;
        }
        if let Some(v) = float("controls", "mouse_sensitivity_y") {
            self.mouse_sensitivity_y = v;
        }

        // [physics] section
        if let Some(v) = float("physics", "gravity") {
            self.gravity = v;
        }

        // [player] section
        if let Some(v) = float("player", "speed") {
            self.player_speed = v;
        }
        if let Some(v) = float("player", "max_speed") {
            self.player_max_speed = v;
        }
        if let Some(v) = float("player", "max_jump_speed") {
            self.player_max_jump_speed = v;
        }
        if let Some(v) = float("player", "friction") {
            self.player_friction = v;
        }
        if let Some(size) = config.getuint("player", "inventory_size").ok().flatten() {
            self.inventory_size = size as usize;
        }
        if let Some(v) = float("player", "pickup_cooldown") {
            self.pickup_cooldown = v;
        }

        // [dialogue] section
        if let Some(v) = float("dialogue", "typing_speed") {
            self.typing_speed = v;
        }

        info!(
            "Loaded config: fps={}, sensitivity={}x{}, gravity={}, speed={}/{}/{}, friction={}, inventory={}, cooldown={}, typing={}",
            self.target_fps,
            self.mouse_sensitivity_x,
            self.mouse_sensitivity_y,
            self.gravity,
            self.player_speed,
            self.player_max_speed,
            self.player_max_jump_speed,
            self.player_friction,
            self.inventory_size,
            self.pickup_cooldown,
            self.typing_speed
        );
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set("window", "target_fps", Some(self.target_fps.to_string()));

        config.set(
            "controls",
            "mouse_sensitivity_x",
            Some(self.mouse_sensitivity_x.to_string()),
        );
        config.set(
            "controls",
            "mouse_sensitivity_y",
            Some(self.mouse_sensitivity_y.to_string()),
        );

        config.set("physics", "gravity", Some(self.gravity.to_string()));

        config.set("player", "speed", Some(self.player_speed.to_string()));
        config.set("player", "max_speed", Some(self.player_max_speed.to_string()));
        config.set(
            "player",
            "max_jump_speed",
            Some(self.player_max_jump_speed.to_string()),
        );
        config.set("player", "friction", Some(self.player_friction.to_string()));
        config.set(
            "player",
            "inventory_size",
            Some(self.inventory_size.to_string()),
        );
        config.set(
            "player",
            "pickup_cooldown",
            Some(self.pickup_cooldown.to_string()),
        );

        config.set("dialogue", "typing_speed", Some(self.typing_speed.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Fixed tick length for the configured rate.
    pub fn tick_delta(&self) -> f32 {
        1.0 / self.target_fps.max(1) as f32
    }

    /// Look sensitivities converted to radians.
    pub fn look_settings(&self) -> LookSettings {
        LookSettings::from_degrees(self.mouse_sensitivity_x, self.mouse_sensitivity_y)
    }

    /// Player component configured from the `[player]` section.
    pub fn player(&self) -> Player {
        Player::new(
            self.player_speed,
            self.player_max_speed,
            self.player_max_jump_speed,
            self.player_friction,
        )
        .with_inventory_size(self.inventory_size)
        .with_pickup_cooldown(self.pickup_cooldown)
    }
}
