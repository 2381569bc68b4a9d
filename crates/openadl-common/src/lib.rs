//! Common utilities and types shared across OpenADL crates

pub mod config;

pub use config::{AppConfig, ConfigError, GameConfig};

use serde::{Deserialize, Serialize};

/// Supported ADL games
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameId {
    Hires1,
}

impl GameId {
    /// Get the short id used in targets and config files
    pub fn id(&self) -> &'static str {
        match self {
            GameId::Hires1 => "hires1",
        }
    }

    /// Get the display name for this game
    pub fn display_name(&self) -> &'static str {
        match self {
            GameId::Hires1 => "Hi-Res Adventure #1: Mystery House",
        }
    }

    /// Look up a game by its short id
    pub fn from_id(id: &str) -> Option<GameId> {
        Self::all().into_iter().find(|g| g.id() == id)
    }

    /// Get all supported games
    pub fn all() -> Vec<GameId> {
        vec![GameId::Hires1]
    }
}

/// Which engine implementation runs a detected game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameType {
    None,
    Hires1,
}

/// Game-specific options exposed by the engine in addition to the host's own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuiOption {
    Color,
    Scanlines,
}

impl GuiOption {
    /// Key under which the option is stored in a game's configuration
    pub fn config_key(&self) -> &'static str {
        match self {
            GuiOption::Color => "color",
            GuiOption::Scanlines => "scanlines",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GuiOption::Color => "Color mode",
            GuiOption::Scanlines => "Scanlines",
        }
    }

    pub fn tooltip(&self) -> &'static str {
        match self {
            GuiOption::Color => "Use color graphics",
            GuiOption::Scanlines => "Show scanlines",
        }
    }

    pub fn default_value(&self) -> bool {
        false
    }

    pub fn all() -> Vec<GuiOption> {
        vec![GuiOption::Color, GuiOption::Scanlines]
    }
}

/// Capabilities a meta engine can advertise to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaEngineFeature {
    SupportsListSaves,
    SupportsLoadingDuringStartup,
    SupportsDeleteSave,
    SavesSupportMetaInfo,
    SavesSupportThumbnail,
    SavesSupportCreationDate,
    SavesSupportPlayTime,
    SimpleSavesNames,
    SavesUseExtendedFormat,
}

impl MetaEngineFeature {
    pub fn all() -> Vec<MetaEngineFeature> {
        vec![
            MetaEngineFeature::SupportsListSaves,
            MetaEngineFeature::SupportsLoadingDuringStartup,
            MetaEngineFeature::SupportsDeleteSave,
            MetaEngineFeature::SavesSupportMetaInfo,
            MetaEngineFeature::SavesSupportThumbnail,
            MetaEngineFeature::SavesSupportCreationDate,
            MetaEngineFeature::SavesSupportPlayTime,
            MetaEngineFeature::SimpleSavesNames,
            MetaEngineFeature::SavesUseExtendedFormat,
        ]
    }
}
