//! Title table extraction.

use crate::{Cursor, Error, Marker, Result};
use std::io::SeekFrom;

/// Fixed sub-header preceding each title name.
pub const TITLES_OFFSET: i64 = 73;

/// Distance from a title's marker to its end-of-table flag byte.
pub const TITLES_END_OFFSET: i64 = 10;

/// A recorded title and the durations (in PTS ticks) of its clips.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct Title {
    pub name: String,
    /// Clip durations in discovery order.
    pub clips: Vec<u32>,
}

impl Title {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            clips: Vec::new(),
        }
    }

    /// Sum of the clip durations in PTS ticks.
    pub fn total_ticks(&self) -> u64 {
        self.clips.iter().map(|&c| u64::from(c)).sum()
    }
}

/// Read every title name from the title table, in file order.
///
/// The table ends when no further marker is found, or when the byte
/// [`TITLES_END_OFFSET`] past a title's marker is non-zero. A name seen a
/// second time keeps its first position.
pub fn extract_titles(cursor: &mut Cursor, head: u32, marker: Marker) -> Result<Vec<Title>> {
    cursor.seek(SeekFrom::Start(u64::from(head)))?;
    let mut titles: Vec<Title> = Vec::new();

    while !cursor.is_eof() {
        // A skip that runs past EOF still records the (empty) name.
        cursor.seek(SeekFrom::Current(TITLES_OFFSET))?;

        let name = read_name(cursor)?;
        tracing::trace!(name = %name, "title");
        match titles.iter_mut().find(|t| t.name == name) {
            Some(existing) => existing.clips.clear(),
            None => titles.push(Title::new(name)),
        }

        if !cursor.seek_to_marker(marker) {
            break;
        }

        let marker_pos = cursor.position();
        cursor.seek(SeekFrom::Current(TITLES_END_OFFSET))?;
        match cursor.read_u8() {
            Ok(0) => {
                cursor.seek(SeekFrom::Start(marker_pos))?;
            }
            _ => break,
        }
    }

    Ok(titles)
}

/// Read a zero-terminated name. A name cut off by EOF is kept as-is.
fn read_name(cursor: &mut Cursor) -> Result<String> {
    let offset = cursor.position();
    let mut raw = Vec::new();

    while let Ok(byte) = cursor.read_u8() {
        if byte == 0 {
            break;
        }
        raw.push(byte);
    }

    String::from_utf8(raw).map_err(|_| Error::TitleDecode { offset })
}
