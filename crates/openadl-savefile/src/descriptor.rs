//! Save slot metadata as shown in the load/save dialogs

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use crate::thumbnail::Thumbnail;

/// Calendar date of a save (month and day are 1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveDate {
    pub year: u32,
    pub month: u8,
    pub day: u8,
}

impl fmt::Display for SaveDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}.{:02}.{:04}", self.day, self.month, self.year)
    }
}

/// Wall-clock time of a save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveTime {
    pub hour: u8,
    pub minute: u8,
}

impl fmt::Display for SaveTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Metadata of one save slot
///
/// Listing only fills `slot` and `description`; a single-slot query also
/// fills the date, time, play time and (when it decodes) the thumbnail.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveStateDescriptor {
    pub slot: i32,
    pub description: String,
    pub save_date: Option<SaveDate>,
    pub save_time: Option<SaveTime>,
    /// Elapsed play time in seconds
    pub play_time: Option<u32>,
    pub thumbnail: Option<Thumbnail>,
}

impl SaveStateDescriptor {
    pub fn new(slot: i32, description: impl Into<String>) -> Self {
        Self {
            slot,
            description: description.into(),
            save_date: None,
            save_time: None,
            play_time: None,
            thumbnail: None,
        }
    }

    pub fn set_save_date(&mut self, year: u32, month: u8, day: u8) {
        self.save_date = Some(SaveDate { year, month, day });
    }

    pub fn set_save_time(&mut self, hour: u8, minute: u8) {
        self.save_time = Some(SaveTime { hour, minute });
    }

    pub fn set_play_time(&mut self, seconds: u32) {
        self.play_time = Some(seconds);
    }

    pub fn set_thumbnail(&mut self, thumbnail: Option<Thumbnail>) {
        self.thumbnail = thumbnail;
    }

    /// Date and time combined, if both are present and form a real instant
    pub fn save_datetime(&self) -> Option<NaiveDateTime> {
        let date = self.save_date?;
        let time = self.save_time.unwrap_or(SaveTime { hour: 0, minute: 0 });
        NaiveDate::from_ymd_opt(
            i32::try_from(date.year).ok()?,
            u32::from(date.month),
            u32::from(date.day),
        )?
        .and_hms_opt(u32::from(time.hour), u32::from(time.minute), 0)
    }

    /// Play time as `HH:MM`; hours are not wrapped at 24
    pub fn play_time_string(&self) -> Option<String> {
        self.play_time.map(|secs| {
            let minutes = secs / 60;
            format!("{:02}:{:02}", minutes / 60, minutes % 60)
        })
    }
}
