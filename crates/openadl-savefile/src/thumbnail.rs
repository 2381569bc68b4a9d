//! Thumbnail block embedded after the save header
//!
//! The host normally supplies the codec. `RawThumbnailCodec` reads and writes
//! the uncompressed block:
//!
//! | Size  | Field                     |
//! |-------|---------------------------|
//! | 4     | tag `THMB`                |
//! | 4     | block size incl. header   |
//! | 1     | version (1)               |
//! | 2     | width                     |
//! | 2     | height                    |
//! | 1     | bytes per pixel (2)       |
//! | w*h*2 | RGB565 pixels, big-endian |

use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::{Result, SaveError};

pub const THUMBNAIL_TAG: u32 = u32::from_be_bytes(*b"THMB");
pub const THUMBNAIL_VERSION: u8 = 1;
const THUMBNAIL_HEADER_LEN: u32 = 14;
const BYTES_PER_PIXEL: u8 = 2;
/// Largest edge accepted when decoding
pub const MAX_THUMBNAIL_DIM: u16 = 1024;

/// Decoded preview image, RGB565
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub width: u16,
    pub height: u16,
    pub pixels: Vec<u16>,
}

impl Thumbnail {
    /// Expand the pixel at (x, y) to 8 bits per channel
    pub fn rgb(&self, x: u16, y: u16) -> Option<(u8, u8, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let p = *self
            .pixels
            .get(usize::from(y) * usize::from(self.width) + usize::from(x))?;
        let r = ((p >> 11) & 0x1F) as u8;
        let g = ((p >> 5) & 0x3F) as u8;
        let b = (p & 0x1F) as u8;
        Some(((r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2)))
    }
}

/// Reads and writes the thumbnail that trails a save header
pub trait ThumbnailCodec: Send + Sync {
    fn load(&self, r: &mut dyn Read) -> Result<Thumbnail>;
    fn save(&self, w: &mut dyn Write, thumbnail: &Thumbnail) -> Result<()>;
}

/// Uncompressed `THMB` block codec
#[derive(Debug, Default, Clone, Copy)]
pub struct RawThumbnailCodec;

impl ThumbnailCodec for RawThumbnailCodec {
    fn load(&self, r: &mut dyn Read) -> Result<Thumbnail> {
        let tag = r.read_u32::<BigEndian>()?;
        if tag != THUMBNAIL_TAG {
            return Err(SaveError::InvalidThumbnail(format!(
                "missing THMB header (found 0x{:08X})",
                tag
            )));
        }
        let size = r.read_u32::<BigEndian>()?;
        let version = r.read_u8()?;
        if version != THUMBNAIL_VERSION {
            return Err(SaveError::InvalidThumbnail(format!(
                "unsupported version {}",
                version
            )));
        }
        let width = r.read_u16::<BigEndian>()?;
        let height = r.read_u16::<BigEndian>()?;
        let bpp = r.read_u8()?;
        if bpp != BYTES_PER_PIXEL {
            return Err(SaveError::InvalidThumbnail(format!(
                "{} bytes per pixel",
                bpp
            )));
        }
        if width == 0 || height == 0 || width > MAX_THUMBNAIL_DIM || height > MAX_THUMBNAIL_DIM {
            return Err(SaveError::InvalidThumbnail(format!(
                "bad dimensions {}x{}",
                width, height
            )));
        }
        let count = usize::from(width) * usize::from(height);
        if size != THUMBNAIL_HEADER_LEN + count as u32 * u32::from(BYTES_PER_PIXEL) {
            return Err(SaveError::InvalidThumbnail(format!(
                "block size {} does not match {}x{}",
                size, width, height
            )));
        }

        let mut pixels = vec![0u16; count];
        r.read_u16_into::<BigEndian>(&mut pixels)?;

        Ok(Thumbnail {
            width,
            height,
            pixels,
        })
    }

    fn save(&self, w: &mut dyn Write, thumbnail: &Thumbnail) -> Result<()> {
        let count = usize::from(thumbnail.width) * usize::from(thumbnail.height);
        if thumbnail.pixels.len() != count {
            return Err(SaveError::InvalidThumbnail(format!(
                "{} pixels for {}x{}",
                thumbnail.pixels.len(),
                thumbnail.width,
                thumbnail.height
            )));
        }

        w.write_u32::<BigEndian>(THUMBNAIL_TAG)?;
        w.write_u32::<BigEndian>(THUMBNAIL_HEADER_LEN + count as u32 * u32::from(BYTES_PER_PIXEL))?;
        w.write_u8(THUMBNAIL_VERSION)?;
        w.write_u16::<BigEndian>(thumbnail.width)?;
        w.write_u16::<BigEndian>(thumbnail.height)?;
        w.write_u8(BYTES_PER_PIXEL)?;
        for &p in &thumbnail.pixels {
            w.write_u16::<BigEndian>(p)?;
        }
        Ok(())
    }
}
