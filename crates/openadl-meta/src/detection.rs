//! Detection table for the ADL games
//!
//! The host fingerprints candidate files (name, MD5 of the file, size); this
//! module only holds the known fingerprints and compares against them.

use openadl_common::{GameId, GameType, GuiOption};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Apple2GS,
}

/// One file a game release must contain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileEntry {
    pub name: &'static str,
    pub md5: &'static str,
    pub size: u64,
}

/// A known release of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameDescription {
    pub game_id: GameId,
    /// Distinguishes releases of the same game; empty for the main one
    pub extra: &'static str,
    pub files: &'static [FileEntry],
    pub language: Language,
    pub platform: Platform,
    pub gui_options: &'static [GuiOption],
    pub game_type: GameType,
}

impl GameDescription {
    /// Whether every file of this release is among the fingerprints
    pub fn matches(&self, files: &[FileFingerprint]) -> bool {
        self.files.iter().all(|entry| {
            files.iter().any(|f| {
                f.name.eq_ignore_ascii_case(entry.name)
                    && f.md5.eq_ignore_ascii_case(entry.md5)
                    && f.size == entry.size
            })
        })
    }
}

/// A candidate file as fingerprinted by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFingerprint {
    pub name: String,
    pub md5: String,
    pub size: u64,
}

impl FileFingerprint {
    pub fn new(name: &str, md5: &str, size: u64) -> Self {
        Self {
            name: name.to_string(),
            md5: md5.to_string(),
            size,
        }
    }
}

// Mystery House, Apple II, 1987 public domain release
const HIRES1_FILES: &[FileEntry] = &[
    FileEntry {
        name: "ADVENTURE",
        md5: "22d9e63a11d69fa033ba1738715ad09a",
        size: 29952,
    },
    FileEntry {
        name: "AUTO LOAD OBJ",
        md5: "23bfccfe9fcff9b22cf6c41bde9078ac",
        size: 12291,
    },
    FileEntry {
        name: "MYSTERY.HELLO",
        md5: "2289b7fea300b506e902a4c597968369",
        size: 836,
    },
];

pub static GAME_DESCRIPTIONS: &[GameDescription] = &[GameDescription {
    game_id: GameId::Hires1,
    extra: "",
    files: HIRES1_FILES,
    language: Language::English,
    // TODO: add an Apple II platform; this release is an Apple II disk, not IIgs
    platform: Platform::Apple2GS,
    gui_options: &[GuiOption::Color, GuiOption::Scanlines],
    game_type: GameType::Hires1,
}];

/// All releases whose files are present in `files`
pub fn detect(files: &[FileFingerprint]) -> Vec<&'static GameDescription> {
    let found: Vec<&'static GameDescription> = GAME_DESCRIPTIONS
        .iter()
        .filter(|desc| desc.matches(files))
        .collect();
    for desc in &found {
        tracing::info!("Detected {} ({:?})", desc.game_id.display_name(), desc.platform);
    }
    found
}
