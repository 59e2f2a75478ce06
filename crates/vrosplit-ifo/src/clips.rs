//! Clip table traversal and clip-to-title mapping.
//!
//! Records are delimited by the file's [`Marker`]. Relative to a record's
//! marker, the 3-byte title fingerprint sits 9 bytes before it and the
//! big-endian duration (PTS ticks) 4 bytes after it.

use crate::{Cursor, Error, Marker, Result, Title};
use std::io::SeekFrom;

/// Fingerprint position relative to a record marker.
pub const CLIPS_TITLE_OFFSET: i64 = -9;

/// Duration position relative to a record marker.
pub const CLIPS_DURATION_OFFSET: i64 = 4;

/// One record of the clip table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipRecord {
    pub fingerprint: [u8; 3],
    /// Duration in PTS ticks.
    pub duration: u32,
}

/// Outcome of assigning clips to titles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mapping {
    /// Every clip was assigned to a title.
    Succeeded(Vec<Title>),
    /// More distinct fingerprints than titles were found.
    Inconsistent { fingerprints: usize, titles: usize },
}

/// Read fingerprint and duration of every record in the clip table.
pub fn read_clip_records(
    cursor: &mut Cursor,
    head: u32,
    end: u32,
    marker: Marker,
) -> Result<Vec<ClipRecord>> {
    walk(cursor, head, end, marker, |cursor, marker_pos| {
        seek_relative(cursor, marker_pos, CLIPS_TITLE_OFFSET)?;
        let fingerprint = cursor.read_array::<3>()?;
        let duration = read_duration(cursor, marker_pos)?;
        Ok(ClipRecord {
            fingerprint,
            duration,
        })
    })
}

/// Read only the durations of every record in the clip table.
///
/// Used when clips cannot be mapped to titles; fingerprints are never read.
pub fn read_clip_durations(
    cursor: &mut Cursor,
    head: u32,
    end: u32,
    marker: Marker,
) -> Result<Vec<u32>> {
    walk(cursor, head, end, marker, read_duration)
}

/// Assign each clip to a title by first-seen fingerprint order.
///
/// The n-th distinct fingerprint belongs to the n-th title. This positional
/// pairing is the only link the format offers between the two tables, so
/// `titles` must be in file order.
pub fn map_clips_to_titles(records: &[ClipRecord], mut titles: Vec<Title>) -> Mapping {
    let mut seen: Vec<[u8; 3]> = Vec::new();
    let mut consistent = true;

    for record in records {
        let index = match seen.iter().position(|f| *f == record.fingerprint) {
            Some(index) => index,
            None => {
                seen.push(record.fingerprint);
                seen.len() - 1
            }
        };

        match titles.get_mut(index) {
            Some(title) if consistent => title.clips.push(record.duration),
            _ => consistent = false,
        }
    }

    if consistent {
        Mapping::Succeeded(titles)
    } else {
        Mapping::Inconsistent {
            fingerprints: seen.len(),
            titles: titles.len(),
        }
    }
}

/// Visit every marker in `[head, min(end, size))`, calling `read` with the
/// marker's offset. A record cut off by end of file ends the table.
fn walk<T>(
    cursor: &mut Cursor,
    head: u32,
    end: u32,
    marker: Marker,
    mut read: impl FnMut(&mut Cursor, u64) -> Result<T>,
) -> Result<Vec<T>> {
    let limit = u64::from(end).min(cursor.size());
    let mut out = Vec::new();

    cursor.seek(SeekFrom::Start(u64::from(head)))?;
    if !cursor.seek_to_marker(marker) {
        return Ok(out);
    }

    while cursor.position() < limit {
        let marker_pos = cursor.position();
        match read(cursor, marker_pos) {
            Ok(item) => out.push(item),
            Err(Error::UnexpectedEof { .. }) => {
                tracing::debug!(offset = marker_pos, "clip record truncated by end of file");
                break;
            }
            Err(e) => return Err(e),
        }

        if !cursor.seek_to_marker(marker) {
            break;
        }
    }

    Ok(out)
}

fn read_duration(cursor: &mut Cursor, marker_pos: u64) -> Result<u32> {
    seek_relative(cursor, marker_pos, CLIPS_DURATION_OFFSET)?;
    cursor.read_u32_be()
}

fn seek_relative(cursor: &mut Cursor, marker_pos: u64, delta: i64) -> Result<()> {
    cursor.seek(SeekFrom::Start(marker_pos))?;
    cursor.seek(SeekFrom::Current(delta))?;
    Ok(())
}
