//! Configuration management for PrismPlayer
//!
//! This module handles loading and managing application configuration
//! from various sources including config files and environment variables.

use crate::utils::error::{PlayerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Playback behavior
    pub playback: PlaybackConfig,

    /// On-screen control timing
    pub controls: ControlsConfig,

    /// Subtitle rendering defaults
    pub subtitles: SubtitleConfig,

    /// General application settings
    pub general: GeneralConfig,
}

/// Playback configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Start playback automatically once metadata is ready
    pub autoplay: bool,

    /// Default volume (0.0 - 1.0)
    pub default_volume: f64,

    /// Seek step for arrow keys, in seconds
    pub seek_step_seconds: f64,

    /// Volume step for arrow keys (0.0 - 1.0)
    pub volume_step: f64,

    /// Selectable playback rates offered by the settings panel
    pub rate_choices: Vec<f64>,
}

/// On-screen controls configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlsConfig {
    /// Idle timeout before controls hide while playing, in milliseconds
    pub hide_delay_ms: u64,

    /// Shorter timeout re-armed by explicit control interaction
    pub interaction_hide_delay_ms: u64,
}

/// Subtitle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubtitleConfig {
    /// Font size in points
    pub font_size: u32,

    /// Font color (hex)
    pub color: String,

    /// Background opacity (0.0 - 1.0)
    pub background_opacity: f64,

    /// Step applied when nudging the subtitle timing offset, in seconds
    pub offset_step_seconds: f64,
}

/// General application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            playback: PlaybackConfig::default(),
            controls: ControlsConfig::default(),
            subtitles: SubtitleConfig::default(),
            general: GeneralConfig::default(),
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            autoplay: true,
            default_volume: 1.0,
            seek_step_seconds: 10.0,
            volume_step: 0.1,
            rate_choices: vec![0.5, 0.75, 1.0, 1.25, 1.5, 2.0],
        }
    }
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            hide_delay_ms: 3000,
            interaction_hide_delay_ms: 2000,
        }
    }
}

impl Default for SubtitleConfig {
    fn default() -> Self {
        Self {
            font_size: 24,
            color: "#FFFFFF".to_string(),
            background_opacity: 0.7,
            offset_step_seconds: 0.5,
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from various sources
    ///
    /// Configuration is loaded in the following order (later sources
    /// override earlier):
    /// 1. Default values
    /// 2. User config file (~/.config/prismplayer/config.toml on Linux)
    /// 3. Environment variables (PRISMPLAYER_* prefix)
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(user_path) = Self::user_config_path() {
            if user_path.exists() {
                config.merge_from_file(&user_path)?;
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Save configuration to the user config file
    pub fn save(&self) -> Result<()> {
        let path = Self::user_config_path()
            .ok_or_else(|| PlayerError::Config("Cannot determine user config path".to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| PlayerError::Config(format!("Failed to create config directory: {}", e)))?;
        }

        let toml = toml::to_string_pretty(self)
            .map_err(|e| PlayerError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(&path, toml)
            .map_err(|e| PlayerError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Merge configuration from a TOML file
    pub fn merge_from_file(&mut self, path: &Path) -> Result<()> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| PlayerError::Config(format!("Failed to read config file: {}", e)))?;

        let file_config: Config = toml::from_str(&contents)
            .map_err(|e| PlayerError::Config(format!("Failed to parse config file: {}", e)))?;

        *self = file_config;

        Ok(())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(volume) = std::env::var("PRISMPLAYER_VOLUME") {
            self.playback.default_volume = volume
                .parse()
                .map_err(|_| PlayerError::Config("Invalid PRISMPLAYER_VOLUME".to_string()))?;
        }

        if let Ok(step) = std::env::var("PRISMPLAYER_SEEK_STEP") {
            self.playback.seek_step_seconds = step
                .parse()
                .map_err(|_| PlayerError::Config("Invalid PRISMPLAYER_SEEK_STEP".to_string()))?;
        }

        if let Ok(autoplay) = std::env::var("PRISMPLAYER_AUTOPLAY") {
            self.playback.autoplay = autoplay
                .parse()
                .map_err(|_| PlayerError::Config("Invalid PRISMPLAYER_AUTOPLAY".to_string()))?;
        }

        if let Ok(log_level) = std::env::var("PRISMPLAYER_LOG_LEVEL") {
            self.general.log_level = log_level;
        }

        Ok(())
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.playback.default_volume) {
            return Err(PlayerError::Config(
                "Default volume must be between 0.0 and 1.0".to_string(),
            ));
        }

        if self.playback.seek_step_seconds <= 0.0 {
            return Err(PlayerError::Config(
                "Seek step must be positive".to_string(),
            ));
        }

        if self.controls.hide_delay_ms == 0 || self.controls.interaction_hide_delay_ms == 0 {
            return Err(PlayerError::Config(
                "Control hide delays must be non-zero".to_string(),
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.general.log_level.as_str()) {
            return Err(PlayerError::Config(format!(
                "Invalid log level '{}', must be one of: {:?}",
                self.general.log_level, valid_log_levels
            )));
        }

        Ok(())
    }

    /// Get user config file path
    fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("prismplayer").join("config.toml"))
    }
}
