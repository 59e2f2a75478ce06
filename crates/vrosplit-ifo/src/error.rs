//! Error types for vrosplit-ifo.

use std::io;
use thiserror::Error;

/// Result type for vrosplit-ifo operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for vrosplit-ifo operations.
///
/// Every variant here is fatal to a parse session. Conditions the parser
/// recovers from are reported as [`ParseWarning`](crate::ParseWarning)s.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A read ran past the end of the info file.
    #[error("Unexpected end of file at offset {offset:#x}: need {need} bytes, have {have}")]
    UnexpectedEof { offset: u64, need: usize, have: usize },

    /// A relative seek would move before the start of the file.
    #[error("Seek out of range: {position} + {delta}")]
    SeekOutOfRange { position: u64, delta: i64 },

    /// The file is too short to contain the header fields.
    #[error("Malformed header: {0}")]
    MalformedHeader(String),

    /// The type tag is not `DVD_RTR_VMG0` and type enforcement is enabled.
    #[error("Info file is of type {found:?}, not \"DVD_RTR_VMG0\"")]
    TypeMismatch { found: String },

    /// No clip delimiter could be inferred from the clip table.
    #[error("Could not find clip marker in clip table {head:#x}..{end:#x}")]
    MarkerNotFound { head: u32, end: u32 },

    /// A title name is not valid UTF-8.
    #[error("Title name at offset {offset:#x} is not valid text")]
    TitleDecode { offset: u64 },
}

impl Error {
    /// Create a malformed header error.
    pub fn malformed_header(msg: impl Into<String>) -> Self {
        Self::MalformedHeader(msg.into())
    }
}
