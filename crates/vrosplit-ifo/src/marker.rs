//! Discovery of the two-byte clip record delimiter.
//!
//! The clip table has no explicit delimiter field. Starting 68 bytes into the
//! table, 16-bit words alternate between "even" and "odd" slots; the first
//! non-zero word in an odd slot sits 5 bytes before the first record marker.

use crate::{Cursor, Result};
use std::fmt;
use std::io::SeekFrom;

/// Offset into the clip table where the slot scan starts.
pub const CLIPS_OFFSET: u64 = 68;

/// Gap between the first non-zero odd word and the marker.
pub const MARKER_OFFSET: i64 = 5;

/// Two-byte value separating consecutive clip records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Marker([u8; 2]);

impl Marker {
    pub const fn new(bytes: [u8; 2]) -> Self {
        Self(bytes)
    }

    pub const fn bytes(self) -> [u8; 2] {
        self.0
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}{:02x}", self.0[0], self.0[1])
    }
}

#[cfg(feature = "serialize")]
impl serde::Serialize for Marker {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Scan the clip table for its record marker.
///
/// Returns `Ok(None)` when the region (or the file) is exhausted without a
/// qualifying word.
pub fn detect_marker(cursor: &mut Cursor, head: u32, end: u32) -> Result<Option<Marker>> {
    let limit = u64::from(end).min(cursor.size());
    cursor.seek(SeekFrom::Start(u64::from(head) + CLIPS_OFFSET))?;

    let mut odd = false;
    while cursor.position() < limit {
        let Ok(word) = cursor.read_u16_be() else {
            return Ok(None);
        };

        if odd && word != 0 {
            cursor.seek(SeekFrom::Current(MARKER_OFFSET))?;
            return Ok(cursor.read_array::<2>().ok().map(Marker::new));
        }
        odd = !odd;
    }

    tracing::debug!(head, end, "clip table exhausted without a marker");
    Ok(None)
}
