//! Seekable byte cursor over an in-memory info file.

use crate::{Error, Marker, Result};
use bytes::Bytes;
use std::io::SeekFrom;
use std::path::Path;

/// Random-access reader over the bytes of an info file.
///
/// Seeking past the end is allowed (like [`std::io::Seek`]); reading there is
/// not. Multi-byte integers are big-endian.
#[derive(Debug, Clone)]
pub struct Cursor {
    data: Bytes,
    pos: u64,
}

impl Cursor {
    /// Create a cursor positioned at offset 0.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            pos: 0,
        }
    }

    /// Read a whole file into memory and wrap it.
    ///
    /// Info files are a few hundred kilobytes at most.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        Ok(Self::new(data))
    }

    /// Total length of the underlying buffer.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Current read position.
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Whether the position is at or beyond the end of the buffer.
    pub fn is_eof(&self) -> bool {
        self.pos >= self.size()
    }

    /// Move the read position, returning the new absolute offset.
    pub fn seek(&mut self, to: SeekFrom) -> Result<u64> {
        let (base, delta) = match to {
            SeekFrom::Start(offset) => {
                self.pos = offset;
                return Ok(offset);
            }
            SeekFrom::Current(delta) => (self.pos, delta),
            SeekFrom::End(delta) => (self.size(), delta),
        };

        self.pos = base
            .checked_add_signed(delta)
            .ok_or(Error::SeekOutOfRange {
                position: base,
                delta,
            })?;
        Ok(self.pos)
    }

    /// Read `n` bytes and advance past them.
    pub fn read(&mut self, n: usize) -> Result<Bytes> {
        let have = self.size().saturating_sub(self.pos) as usize;
        if have < n {
            return Err(Error::UnexpectedEof {
                offset: self.pos,
                need: n,
                have,
            });
        }

        let start = self.pos as usize;
        self.pos += n as u64;
        Ok(self.data.slice(start..start + n))
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.read(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&bytes);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16_be(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    pub fn read_u32_be(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    /// Advance to the next occurrence of `marker`.
    ///
    /// Scans byte by byte from the current position. On a match the cursor is
    /// left on the first byte of the marker and `true` is returned; reaching
    /// the end of the file returns `false` with the cursor at EOF.
    pub fn seek_to_marker(&mut self, marker: Marker) -> bool {
        let [first, second] = marker.bytes();
        let mut prev: Option<u8> = None;

        while let Ok(byte) = self.read_u8() {
            if prev == Some(first) && byte == second {
                self.pos -= 2;
                return true;
            }
            prev = Some(byte);
        }

        false
    }
}
