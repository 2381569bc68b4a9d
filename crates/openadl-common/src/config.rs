//! Application configuration loaded from TOML
//!
//! ```toml
//! save_path = "saves"
//! log_level = "info"
//!
//! [[games]]
//! target = "hires1"
//! game_id = "hires1"
//! color = true
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{GameId, GuiOption};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    ParseError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration for a game instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Target name, also the prefix of the save files
    pub target: String,
    pub game_id: GameId,
    #[serde(default)]
    pub color: bool,
    #[serde(default)]
    pub scanlines: bool,
}

impl GameConfig {
    pub fn new(target: &str, game_id: GameId) -> Self {
        Self {
            target: target.to_string(),
            game_id,
            color: GuiOption::Color.default_value(),
            scanlines: GuiOption::Scanlines.default_value(),
        }
    }

    /// Current value of an extra GUI option
    pub fn option(&self, opt: GuiOption) -> bool {
        match opt {
            GuiOption::Color => self.color,
            GuiOption::Scanlines => self.scanlines,
        }
    }
}

/// Application-wide configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub games: Vec<GameConfig>,
    /// Directory holding `<target>.sNN` files
    pub save_path: PathBuf,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            games: Vec::new(),
            save_path: std::env::current_dir()
                .unwrap_or_default()
                .join("saves"),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Parse a config from TOML text; missing keys take their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a config file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(
            "Loaded config from {} ({} game(s))",
            path.display(),
            config.games.len()
        );
        Ok(config)
    }

    /// Find the configured game for a target
    pub fn game(&self, target: &str) -> Option<&GameConfig> {
        self.games.iter().find(|g| g.target == target)
    }
}
