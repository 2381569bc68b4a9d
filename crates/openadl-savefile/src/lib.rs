//! Save files for the ADL engine
//!
//! This module handles:
//! - The fixed-layout big-endian header at the start of every save file
//! - Save slot metadata queries (single slot, listing, removal)
//! - The storage the save files live in (directory or in-memory)
//! - The thumbnail block embedded after the header

pub mod descriptor;
pub mod header;
pub mod slots;
pub mod storage;
pub mod thumbnail;

pub use descriptor::{SaveDate, SaveStateDescriptor, SaveTime};
pub use header::{SaveHeader, SAVEGAME_MAGIC, SAVEGAME_NAME_LEN, SAVEGAME_VERSION};
pub use slots::{SaveSlots, MAX_SAVE_SLOT};
pub use storage::{DirSaveFileManager, MemorySaveFileManager, SaveFileManager};
pub use thumbnail::{RawThumbnailCodec, Thumbnail, ThumbnailCodec};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("Failed to access save file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("No header found (magic 0x{0:08X})")]
    BadMagic(u32),

    #[error("Unsupported save game version {0}")]
    UnsupportedVersion(u8),

    #[error("Invalid save date: {0}")]
    InvalidDate(String),

    #[error("Invalid thumbnail: {0}")]
    InvalidThumbnail(String),

    #[error("Save slot {0} out of range")]
    SlotOutOfRange(i32),
}

pub type Result<T> = std::result::Result<T, SaveError>;
