//! Synthetic info files for tests.
//!
//! The layout mirrors what the parser expects from camcorder output: header
//! pointers at their fixed offsets, a clip table whose first non-zero odd
//! slot precedes the first record marker, and a title table with one marker
//! per title.

use crate::header::{
    CLIP_TABLE_END_OFFSET, CLIP_TABLE_HEAD_OFFSET, EXPECTED_TYPE_TAG, TITLE_TABLE_HEAD_OFFSET,
};
use crate::marker::{CLIPS_OFFSET, MARKER_OFFSET};
use crate::titles::{TITLES_END_OFFSET, TITLES_OFFSET};
use crate::Marker;
use std::path::Path;

/// Marker written by [`IfoBuilder`].
pub const FIXTURE_MARKER: Marker = Marker::new([0xA5, 0x5A]);

const CLIP_TABLE_HEAD: usize = 0x200;
/// First record marker: the odd slot at `head + 74` is the first non-zero one.
const FIRST_RECORD: usize = CLIP_TABLE_HEAD + CLIPS_OFFSET as usize + 6 + 2 + MARKER_OFFSET as usize;
const RECORD_STRIDE: usize = 32;
const NAME_PADDING: usize = 4;

/// Fingerprint used by [`IfoBuilder::clip_for_title`].
///
/// Distinct for title indices below 255.
pub fn fingerprint(title_index: usize) -> [u8; 3] {
    [0xF0, 0x0F, (title_index as u8).wrapping_add(1)]
}

/// Builder for a synthetic `DVD_RTR_VMG0` info file.
#[derive(Debug, Clone)]
pub struct IfoBuilder {
    type_tag: [u8; 12],
    titles: Vec<Vec<u8>>,
    clips: Vec<([u8; 3], u32)>,
    with_marker: bool,
}

impl Default for IfoBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IfoBuilder {
    pub fn new() -> Self {
        let mut type_tag = [0u8; 12];
        type_tag.copy_from_slice(EXPECTED_TYPE_TAG.as_bytes());
        Self {
            type_tag,
            titles: Vec::new(),
            clips: Vec::new(),
            with_marker: true,
        }
    }

    /// Override the 12-byte type tag. Shorter tags are zero padded.
    pub fn type_tag(mut self, tag: &str) -> Self {
        self.type_tag = [0u8; 12];
        let len = tag.len().min(12);
        self.type_tag[..len].copy_from_slice(&tag.as_bytes()[..len]);
        self
    }

    pub fn title(self, name: &str) -> Self {
        self.raw_title(name.as_bytes().to_vec())
    }

    /// Add a title with arbitrary name bytes (no terminator).
    pub fn raw_title(mut self, name: Vec<u8>) -> Self {
        self.titles.push(name);
        self
    }

    pub fn clip(mut self, fingerprint: [u8; 3], duration: u32) -> Self {
        self.clips.push((fingerprint, duration));
        self
    }

    /// Add a clip whose fingerprint is the one assigned to `title_index`.
    pub fn clip_for_title(self, title_index: usize, duration: u32) -> Self {
        self.clip(fingerprint(title_index), duration)
    }

    /// Leave every odd slot zero so no marker can be inferred.
    pub fn without_marker(mut self) -> Self {
        self.with_marker = false;
        self
    }

    pub fn clip_table_head(&self) -> u32 {
        CLIP_TABLE_HEAD as u32
    }

    pub fn clip_table_end(&self) -> u32 {
        let last = FIRST_RECORD + self.clips.len().saturating_sub(1) * RECORD_STRIDE;
        (last + 16) as u32
    }

    pub fn title_table_head(&self) -> u32 {
        self.clip_table_end() + 16
    }

    pub fn build(&self) -> Vec<u8> {
        let mut data = vec![0u8; self.title_table_head() as usize];

        data[..12].copy_from_slice(&self.type_tag);
        put_u32(&mut data, CLIP_TABLE_HEAD_OFFSET as usize, self.clip_table_head());
        put_u32(&mut data, CLIP_TABLE_END_OFFSET as usize, self.clip_table_end());
        put_u32(&mut data, TITLE_TABLE_HEAD_OFFSET as usize, self.title_table_head());

        let count_at = CLIP_TABLE_HEAD + CLIPS_OFFSET as usize;
        data[count_at..count_at + 2].copy_from_slice(&(self.clips.len() as u16).to_be_bytes());

        if self.with_marker {
            // Low byte of the odd word at head + 74; the high byte is part of
            // the first record's fingerprint.
            data[FIRST_RECORD - MARKER_OFFSET as usize - 1] = 0x01;
            write_marker(&mut data, FIRST_RECORD);

            for (i, (fingerprint, duration)) in self.clips.iter().enumerate() {
                let at = FIRST_RECORD + i * RECORD_STRIDE;
                data[at - 9..at - 6].copy_from_slice(fingerprint);
                write_marker(&mut data, at);
                put_u32(&mut data, at + 4, *duration);
            }
        }

        // The first sub-header sits at the table head; every later one is
        // the run of zeros following the previous title's marker.
        data.extend(std::iter::repeat(0u8).take(TITLES_OFFSET as usize));
        for (i, name) in self.titles.iter().enumerate() {
            data.extend_from_slice(name);
            data.push(0);
            data.extend(std::iter::repeat(0u8).take(NAME_PADDING));

            let marker_at = data.len();
            data.extend(std::iter::repeat(0u8).take(TITLES_OFFSET as usize));
            write_marker(&mut data, marker_at);

            if i + 1 == self.titles.len() {
                data[marker_at + TITLES_END_OFFSET as usize] = 1;
            }
        }

        data
    }

    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.build())
    }
}

fn put_u32(data: &mut [u8], at: usize, value: u32) {
    data[at..at + 4].copy_from_slice(&value.to_be_bytes());
}

fn write_marker(data: &mut [u8], at: usize) {
    data[at..at + 2].copy_from_slice(&FIXTURE_MARKER.bytes());
}
