//! Save file header
//!
//! Layout (big-endian):
//!
//! | Size | Field                                   |
//! |------|-----------------------------------------|
//! | 4    | magic `ADL:`                            |
//! | 1    | version                                 |
//! | 32   | name, NUL padded, last byte reserved    |
//! | 2    | years since 1900                        |
//! | 1    | month (0-based)                         |
//! | 1    | day                                     |
//! | 1    | hour                                    |
//! | 1    | minute                                  |
//! | 4    | play time in seconds                    |
//!
//! The thumbnail block follows directly after the header.

use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::descriptor::{SaveDate, SaveTime};
use crate::{Result, SaveError};

pub const SAVEGAME_MAGIC: u32 = u32::from_be_bytes(*b"ADL:");
pub const SAVEGAME_VERSION: u8 = 0;
/// Size of the name field on disk, including the reserved last byte
pub const SAVEGAME_NAME_LEN: usize = 32;

const YEAR_BASE: u32 = 1900;

/// The fixed part of a save file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveHeader {
    pub name: String,
    pub date: SaveDate,
    pub time: SaveTime,
    /// Elapsed play time in seconds
    pub play_time: u32,
}

impl SaveHeader {
    /// Build a header stamped with the given local date and time
    pub fn new(name: &str, at: NaiveDateTime, play_time: u32) -> Self {
        Self {
            name: name.to_string(),
            date: SaveDate {
                year: at.year().max(0) as u32,
                month: at.month() as u8,
                day: at.day() as u8,
            },
            time: SaveTime {
                hour: at.hour() as u8,
                minute: at.minute() as u8,
            },
            play_time,
        }
    }

    /// Parse a complete header, starting at the magic tag
    pub fn read_from<R: Read>(r: &mut R) -> Result<Self> {
        check_tag_and_version(r)?;
        let name = read_name(r)?;

        let year = r.read_u16::<BigEndian>()?;
        let month = r.read_u8()?;
        let day = r.read_u8()?;
        let hour = r.read_u8()?;
        let minute = r.read_u8()?;
        let play_time = r.read_u32::<BigEndian>()?;

        Ok(Self {
            name,
            date: SaveDate {
                year: u32::from(year) + YEAR_BASE,
                // Stored 0-based; 255 would not fit once shifted
                month: month.wrapping_add(1),
                day,
            },
            time: SaveTime { hour, minute },
            play_time,
        })
    }

    /// Serialize the header; the caller appends the thumbnail
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<()> {
        let year = self
            .date
            .year
            .checked_sub(YEAR_BASE)
            .and_then(|y| u16::try_from(y).ok())
            .ok_or_else(|| SaveError::InvalidDate(format!("year {}", self.date.year)))?;
        if self.date.month == 0 {
            return Err(SaveError::InvalidDate("month 0".to_string()));
        }

        w.write_u32::<BigEndian>(SAVEGAME_MAGIC)?;
        w.write_u8(SAVEGAME_VERSION)?;
        w.write_all(&encode_name(&self.name))?;
        w.write_u16::<BigEndian>(year)?;
        w.write_u8(self.date.month - 1)?;
        w.write_u8(self.date.day)?;
        w.write_u8(self.time.hour)?;
        w.write_u8(self.time.minute)?;
        w.write_u32::<BigEndian>(self.play_time)?;
        Ok(())
    }
}

/// Read and validate the magic tag and version byte
pub fn check_tag_and_version<R: Read>(r: &mut R) -> Result<()> {
    let magic = r.read_u32::<BigEndian>()?;
    if magic != SAVEGAME_MAGIC {
        return Err(SaveError::BadMagic(magic));
    }
    let version = r.read_u8()?;
    if version != SAVEGAME_VERSION {
        return Err(SaveError::UnsupportedVersion(version));
    }
    Ok(())
}

/// Read the full name field, failing on a short read
pub fn read_name<R: Read>(r: &mut R) -> Result<String> {
    let mut buf = [0u8; SAVEGAME_NAME_LEN - 1];
    r.read_exact(&mut buf)?;
    // Reserved terminator byte
    r.read_u8()?;
    Ok(decode_name(&buf))
}

/// Read whatever is present of the name's significant bytes
///
/// Used for listings, which show a truncated name rather than hiding the slot.
pub fn read_name_lenient<R: Read>(r: &mut R) -> Result<String> {
    let mut buf = Vec::with_capacity(SAVEGAME_NAME_LEN - 1);
    r.take((SAVEGAME_NAME_LEN - 1) as u64).read_to_end(&mut buf)?;
    Ok(decode_name(&buf))
}

fn decode_name(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

fn encode_name(name: &str) -> [u8; SAVEGAME_NAME_LEN] {
    let mut field = [0u8; SAVEGAME_NAME_LEN];
    let bytes = name.as_bytes();
    let mut len = bytes.len().min(SAVEGAME_NAME_LEN - 1);
    // Do not split a UTF-8 sequence
    while !name.is_char_boundary(len) {
        len -= 1;
    }
    field[..len].copy_from_slice(&bytes[..len]);
    field
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Cursor;

    fn sample() -> SaveHeader {
        let at = NaiveDate::from_ymd_opt(1987, 1, 31)
            .unwrap()
            .and_hms_opt(14, 5, 0)
            .unwrap();
        SaveHeader::new("In the attic", at, 3725)
    }

    #[test]
    fn layout_matches_disk_format() {
        let mut buf = Vec::new();
        sample().write_to(&mut buf).unwrap();

        assert_eq!(buf.len(), 4 + 1 + SAVEGAME_NAME_LEN + 2 + 4 + 4);
        assert_eq!(&buf[0..4], b"ADL:");
        assert_eq!(buf[4], SAVEGAME_VERSION);
        assert_eq!(&buf[5..17], b"In the attic");
        assert_eq!(buf[5 + SAVEGAME_NAME_LEN - 1], 0);

        let rest = &buf[5 + SAVEGAME_NAME_LEN..];
        assert_eq!(&rest[0..2], &87u16.to_be_bytes());
        assert_eq!(rest[2], 0, "January is stored as 0");
        assert_eq!(rest[3], 31);
        assert_eq!(rest[4], 14);
        assert_eq!(rest[5], 5);
        assert_eq!(&rest[6..10], &3725u32.to_be_bytes());
    }

    #[test]
    fn read_applies_calendar_offsets() {
        let mut buf = Vec::new();
        sample().write_to(&mut buf).unwrap();

        let header = SaveHeader::read_from(&mut Cursor::new(buf)).unwrap();
        assert_eq!(header, sample());
        assert_eq!(header.date, SaveDate { year: 1987, month: 1, day: 31 });
        assert_eq!(header.time, SaveTime { hour: 14, minute: 5 });
        assert_eq!(header.play_time, 3725);
    }

    #[test]
    fn bad_magic_is_rejected() {
        let mut buf = Vec::new();
        sample().write_to(&mut buf).unwrap();
        buf[0] = b'X';
        let err = SaveHeader::read_from(&mut Cursor::new(buf)).unwrap_err();
        assert!(matches!(err, SaveError::BadMagic(_)));
    }

    #[test]
    fn other_version_is_rejected() {
        let mut buf = Vec::new();
        sample().write_to(&mut buf).unwrap();
        buf[4] = SAVEGAME_VERSION + 1;
        let err = SaveHeader::read_from(&mut Cursor::new(buf)).unwrap_err();
        assert!(matches!(err, SaveError::UnsupportedVersion(v) if v == SAVEGAME_VERSION + 1));
    }

    #[test]
    fn truncated_header_is_an_io_error() {
        let mut buf = Vec::new();
        sample().write_to(&mut buf).unwrap();
        buf.truncate(buf.len() - 2);
        let err = SaveHeader::read_from(&mut Cursor::new(buf)).unwrap_err();
        assert!(matches!(err, SaveError::IoError(_)));
    }

    #[test]
    fn long_names_are_truncated_on_write() {
        let mut header = sample();
        header.name = "x".repeat(40);
        let mut buf = Vec::new();
        header.write_to(&mut buf).unwrap();

        let back = SaveHeader::read_from(&mut Cursor::new(buf)).unwrap();
        assert_eq!(back.name.len(), SAVEGAME_NAME_LEN - 1);
    }

    #[test]
    fn truncation_keeps_utf8_intact() {
        let field = encode_name(&format!("{}é", "a".repeat(30)));
        assert_eq!(decode_name(&field[..SAVEGAME_NAME_LEN - 1]), "a".repeat(30));
    }

    #[test]
    fn lenient_name_accepts_short_field() {
        let name = read_name_lenient(&mut Cursor::new(b"Cellar".to_vec())).unwrap();
        assert_eq!(name, "Cellar");
    }

    #[test]
    fn pre_1900_dates_cannot_be_written() {
        let mut header = sample();
        header.date.year = 1899;
        assert!(matches!(
            header.write_to(&mut Vec::new()),
            Err(SaveError::InvalidDate(_))
        ));
    }

    #[test]
    fn boundary_headers_survive_a_round_trip() {
        let longest = "n".repeat(SAVEGAME_NAME_LEN - 1);
        let cases = [
            ("", 1900, 1, 0, 0, 0, 0),
            (longest.as_str(), 1900 + u32::from(u16::MAX), 12, 31, 23, 59, u32::MAX),
            ("Hall", 1900, 12, 0, 23, 0, 1),
            ("Attic", 1999, 1, 31, 0, 59, u32::MAX - 1),
        ];

        for (name, year, month, day, hour, minute, play_time) in cases {
            let header = SaveHeader {
                name: name.to_string(),
                date: SaveDate { year, month, day },
                time: SaveTime { hour, minute },
                play_time,
            };
            let mut buf = Vec::new();
            header.write_to(&mut buf).unwrap();
            assert_eq!(buf.len(), 4 + 1 + SAVEGAME_NAME_LEN + 2 + 4 + 4);

            let back = SaveHeader::read_from(&mut Cursor::new(buf)).unwrap();
            assert_eq!(back, header, "{:?}", header);
        }
    }

    #[test]
    fn years_past_the_field_cannot_be_written() {
        let mut header = sample();
        header.date.year = 1900 + u32::from(u16::MAX) + 1;
        assert!(matches!(
            header.write_to(&mut Vec::new()),
            Err(SaveError::InvalidDate(_))
        ));
    }
}
