//! Save slots of a target: `<target>.s00` .. `<target>.s14`
//!
//! Queries are fail-soft. A slot whose file is missing, carries a foreign
//! header or ends early simply has no descriptor; a thumbnail that does not
//! decode only drops the thumbnail.

use std::io::Write;
use std::sync::Arc;

use crate::descriptor::SaveStateDescriptor;
use crate::header::{self, SaveHeader};
use crate::storage::{escape_pattern, SaveFileManager};
use crate::thumbnail::{RawThumbnailCodec, Thumbnail, ThumbnailCodec};
use crate::{Result, SaveError};

/// Highest usable slot. The game names slots with the letters A through O.
pub const MAX_SAVE_SLOT: i32 = 14;

/// Save slot operations over a storage backend
#[derive(Clone)]
pub struct SaveSlots {
    manager: Arc<dyn SaveFileManager>,
    thumbnails: Arc<dyn ThumbnailCodec>,
}

impl SaveSlots {
    pub fn new(manager: Arc<dyn SaveFileManager>) -> Self {
        Self::with_codec(manager, Arc::new(RawThumbnailCodec))
    }

    pub fn with_codec(manager: Arc<dyn SaveFileManager>, thumbnails: Arc<dyn ThumbnailCodec>) -> Self {
        Self {
            manager,
            thumbnails,
        }
    }

    /// `<target>.sNN`
    pub fn file_name(target: &str, slot: i32) -> String {
        format!("{}.s{:02}", target, slot)
    }

    /// Slot number encoded in the last two characters of a save file name
    pub fn slot_from_file_name(name: &str) -> Option<i32> {
        let digits = name.get(name.len().checked_sub(2)?..)?;
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    pub fn maximum_slot(&self) -> i32 {
        MAX_SAVE_SLOT
    }

    /// Full metadata of one slot, or `None` if it holds no valid save
    pub fn query_one(&self, target: &str, slot: i32) -> Option<SaveStateDescriptor> {
        let file_name = Self::file_name(target, slot);
        match self.read_descriptor(&file_name, slot) {
            Ok(sd) => sd,
            Err(e) => {
                tracing::debug!("Ignoring save '{}': {}", file_name, e);
                None
            }
        }
    }

    fn read_descriptor(&self, file_name: &str, slot: i32) -> Result<Option<SaveStateDescriptor>> {
        let mut file = match self.manager.open_for_loading(file_name)? {
            Some(file) => file,
            None => return Ok(None),
        };

        let header = SaveHeader::read_from(&mut file)?;

        let mut sd = SaveStateDescriptor::new(slot, header.name);
        sd.set_save_date(header.date.year, header.date.month, header.date.day);
        sd.set_save_time(header.time.hour, header.time.minute);
        sd.set_play_time(header.play_time);

        match self.thumbnails.load(&mut file) {
            Ok(thumbnail) => sd.set_thumbnail(Some(thumbnail)),
            Err(e) => tracing::debug!("No thumbnail in '{}': {}", file_name, e),
        }

        Ok(Some(sd))
    }

    /// Name and slot of every valid save of `target`, ascending by slot
    pub fn list_all(&self, target: &str) -> Vec<SaveStateDescriptor> {
        let pattern = format!("{}.s##", escape_pattern(target));
        let files = match self.manager.list_savefiles(&pattern) {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!("Cannot list save files '{}': {}", pattern, e);
                return Vec::new();
            }
        };

        let mut saves: Vec<SaveStateDescriptor> = files
            .iter()
            .filter_map(|file_name| self.read_listing_entry(file_name))
            .collect();

        saves.sort_by_key(|sd| sd.slot);
        saves
    }

    fn read_listing_entry(&self, file_name: &str) -> Option<SaveStateDescriptor> {
        let mut file = match self.manager.open_for_loading(file_name) {
            Ok(Some(file)) => file,
            Ok(None) => {
                tracing::warn!("Cannot open save file '{}'", file_name);
                return None;
            }
            Err(e) => {
                tracing::warn!("Cannot open save file '{}': {}", file_name, e);
                return None;
            }
        };

        match header::check_tag_and_version(&mut file) {
            Ok(()) => {}
            Err(SaveError::UnsupportedVersion(version)) => {
                tracing::warn!(
                    "Unsupported save game version {} found in '{}'",
                    version,
                    file_name
                );
                return None;
            }
            Err(_) => {
                tracing::warn!("No header found in '{}'", file_name);
                return None;
            }
        }

        let name = match header::read_name_lenient(&mut file) {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!("Cannot read name in '{}': {}", file_name, e);
                return None;
            }
        };

        let Some(slot) = Self::slot_from_file_name(file_name) else {
            tracing::warn!("No slot number in save file name '{}'", file_name);
            return None;
        };

        Some(SaveStateDescriptor::new(slot, name))
    }

    /// Delete a slot's save; removing an empty slot is not an error.
    /// Returns whether a file was actually deleted.
    pub fn remove(&self, target: &str, slot: i32) -> bool {
        let file_name = Self::file_name(target, slot);
        match self.manager.remove_savefile(&file_name) {
            Ok(true) => {
                tracing::info!("Removed save '{}'", file_name);
                true
            }
            Ok(false) => {
                tracing::debug!("No save '{}' to remove", file_name);
                false
            }
            Err(e) => {
                tracing::warn!("Failed to remove save '{}': {}", file_name, e);
                false
            }
        }
    }

    /// Write a header and optional thumbnail into a slot
    pub fn save_one(
        &self,
        target: &str,
        slot: i32,
        header: &SaveHeader,
        thumbnail: Option<&Thumbnail>,
    ) -> Result<()> {
        if !(0..=MAX_SAVE_SLOT).contains(&slot) {
            return Err(SaveError::SlotOutOfRange(slot));
        }

        // A header that fails to encode must not truncate an existing save
        let mut data = Vec::new();
        header.write_to(&mut data)?;
        if let Some(thumbnail) = thumbnail {
            self.thumbnails.save(&mut data, thumbnail)?;
        }

        let file_name = Self::file_name(target, slot);
        let mut file = self.manager.open_for_saving(&file_name)?;
        file.write_all(&data)?;
        file.flush()?;
        tracing::debug!("Saved '{}' ({} bytes)", file_name, data.len());
        Ok(())
    }
}
