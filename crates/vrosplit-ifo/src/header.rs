//! Fixed-offset header fields of a `DVD_RTR_VMG0` info file.

use crate::{Cursor, Error, Result};
use std::io::SeekFrom;

/// Type tag written by DVD-RAM camcorders.
pub const EXPECTED_TYPE_TAG: &str = "DVD_RTR_VMG0";

/// Length of the type tag at offset 0.
pub const TYPE_TAG_LEN: usize = 12;

/// Offset of the clip table head pointer.
pub const CLIP_TABLE_HEAD_OFFSET: u64 = 0x100;

/// Offset of the clip table end pointer.
pub const CLIP_TABLE_END_OFFSET: u64 = 0x104;

/// Offset of the title table head pointer.
pub const TITLE_TABLE_HEAD_OFFSET: u64 = 0x130;

/// Smallest file that holds every header field.
pub const MIN_HEADER_LEN: u64 = TITLE_TABLE_HEAD_OFFSET + 4;

/// Header fields read from fixed offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct InfoHeader {
    /// The 12-byte type tag, decoded lossily.
    pub type_tag: String,
    /// Absolute offset of the clip table.
    pub clip_table_head: u32,
    /// Absolute offset where the clip table ends.
    pub clip_table_end: u32,
    /// Absolute offset of the title table.
    pub title_table_head: u32,
}

impl InfoHeader {
    /// Read the header, failing if the file is too short to hold it.
    pub fn read(cursor: &mut Cursor) -> Result<Self> {
        if cursor.size() < MIN_HEADER_LEN {
            return Err(Error::malformed_header(format!(
                "file is {} bytes, header needs {}",
                cursor.size(),
                MIN_HEADER_LEN
            )));
        }

        cursor.seek(SeekFrom::Start(0))?;
        let tag = cursor.read(TYPE_TAG_LEN)?;
        let type_tag = String::from_utf8_lossy(&tag).into_owned();

        Ok(Self {
            type_tag,
            clip_table_head: read_pointer(cursor, CLIP_TABLE_HEAD_OFFSET)?,
            clip_table_end: read_pointer(cursor, CLIP_TABLE_END_OFFSET)?,
            title_table_head: read_pointer(cursor, TITLE_TABLE_HEAD_OFFSET)?,
        })
    }

    /// Whether the type tag is `DVD_RTR_VMG0`.
    pub fn has_expected_type(&self) -> bool {
        self.type_tag == EXPECTED_TYPE_TAG
    }
}

fn read_pointer(cursor: &mut Cursor, offset: u64) -> Result<u32> {
    cursor.seek(SeekFrom::Start(offset))?;
    cursor.read_u32_be()
}
