//! Parse session: header → marker → titles → clips.
//!
//! Each stage consumes the session and returns it updated, so a failed stage
//! leaves nothing half-parsed behind.

use crate::clips::{map_clips_to_titles, read_clip_durations, read_clip_records, Mapping};
use crate::marker::{detect_marker, CLIPS_OFFSET};
use crate::titles::extract_titles;
use crate::{Cursor, Error, InfoHeader, Marker, Result, Title};
use std::fmt;
use std::io::SeekFrom;
use std::path::Path;

/// Parser behaviour switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Abort when the type tag is not `DVD_RTR_VMG0`.
    pub enforce_file_type: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            enforce_file_type: true,
        }
    }
}

/// A recoverable oddity noticed while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
#[cfg_attr(feature = "serialize", serde(tag = "kind", rename_all = "snake_case"))]
pub enum ParseWarning {
    /// The type tag is not `DVD_RTR_VMG0`; parsing continued anyway.
    TypeMismatch { found: String },
    /// Clips could not be attributed to titles and were kept as one list.
    ClipMappingInconsistent { fingerprints: usize, titles: usize },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch { found } => {
                write!(f, "This .IFO is of type {found:?}, not \"DVD_RTR_VMG0\"")
            }
            Self::ClipMappingInconsistent {
                fingerprints,
                titles,
            } => write!(
                f,
                "Failed to map clips to titles ({fingerprints} title hashes, {titles} titles); \
                 clips will not be grouped"
            ),
        }
    }
}

/// Clip durations, either per title or as one flat list.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
#[cfg_attr(feature = "serialize", serde(rename_all = "snake_case"))]
pub enum MappingResult {
    Grouped(Vec<Title>),
    Ungrouped(Vec<u32>),
}

impl MappingResult {
    pub fn is_grouped(&self) -> bool {
        matches!(self, Self::Grouped(_))
    }

    /// Total number of clips.
    pub fn clip_count(&self) -> usize {
        match self {
            Self::Grouped(titles) => titles.iter().map(|t| t.clips.len()).sum(),
            Self::Ungrouped(durations) => durations.len(),
        }
    }
}

/// What is known about the info file itself.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct InfoFile {
    /// File size in bytes.
    pub len: u64,
    pub header: InfoHeader,
    /// Set once by [`ParseSession::detect_marker`].
    pub marker: Option<Marker>,
    /// Clip count stored at the start of the clip table.
    pub declared_clip_count: u16,
}

/// Final product of a successful parse.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct ParsedInfo {
    pub file: InfoFile,
    /// Title names in file order, kept even when clips are ungrouped.
    pub title_names: Vec<String>,
    pub result: MappingResult,
    pub warnings: Vec<ParseWarning>,
}

/// State threaded through the parse stages.
#[derive(Debug)]
pub struct ParseSession {
    cursor: Cursor,
    file: InfoFile,
    titles: Vec<Title>,
    result: Option<MappingResult>,
    warnings: Vec<ParseWarning>,
}

impl ParseSession {
    /// Read the header and check the type tag.
    pub fn open(mut cursor: Cursor, options: &ParseOptions) -> Result<Self> {
        let header = InfoHeader::read(&mut cursor)?;
        let mut warnings = Vec::new();

        if !header.has_expected_type() {
            if options.enforce_file_type {
                return Err(Error::TypeMismatch {
                    found: header.type_tag,
                });
            }
            tracing::warn!(type_tag = %header.type_tag, "unexpected info file type");
            warnings.push(ParseWarning::TypeMismatch {
                found: header.type_tag.clone(),
            });
        }

        // Missing count is not fatal; the clip table walk decides what exists.
        cursor.seek(SeekFrom::Start(u64::from(header.clip_table_head) + CLIPS_OFFSET))?;
        let declared_clip_count = match cursor.read_u16_be() {
            Ok(count) => count,
            Err(e) => {
                tracing::debug!(error = %e, "no clip count in clip table header");
                0
            }
        };

        tracing::debug!(
            len = cursor.size(),
            clip_table_head = header.clip_table_head,
            clip_table_end = header.clip_table_end,
            title_table_head = header.title_table_head,
            "read info header"
        );

        Ok(Self {
            file: InfoFile {
                len: cursor.size(),
                header,
                marker: None,
                declared_clip_count,
            },
            cursor,
            titles: Vec::new(),
            result: None,
            warnings,
        })
    }

    /// Infer the clip record marker.
    pub fn detect_marker(mut self) -> Result<Self> {
        let header = &self.file.header;
        let (head, end) = (header.clip_table_head, header.clip_table_end);

        let marker = detect_marker(&mut self.cursor, head, end)?
            .ok_or(Error::MarkerNotFound { head, end })?;
        tracing::debug!(%marker, "found clip marker");

        self.file.marker = Some(marker);
        Ok(self)
    }

    /// Read the title table.
    pub fn extract_titles(mut self) -> Result<Self> {
        let marker = self.marker()?;
        self.titles = extract_titles(
            &mut self.cursor,
            self.file.header.title_table_head,
            marker,
        )?;
        tracing::debug!(count = self.titles.len(), "read title table");
        Ok(self)
    }

    /// Walk the clip table and attribute clips to titles, falling back to a
    /// flat duration list when that is not possible.
    pub fn map_clips(mut self) -> Result<Self> {
        let marker = self.marker()?;
        let (head, end) = (
            self.file.header.clip_table_head,
            self.file.header.clip_table_end,
        );

        let records = read_clip_records(&mut self.cursor, head, end, marker)?;
        let result = match map_clips_to_titles(&records, self.titles.clone()) {
            Mapping::Succeeded(titles) => MappingResult::Grouped(titles),
            Mapping::Inconsistent {
                fingerprints,
                titles,
            } => {
                tracing::info!(fingerprints, titles, "clips do not map onto titles");
                self.warnings.push(ParseWarning::ClipMappingInconsistent {
                    fingerprints,
                    titles,
                });
                MappingResult::Ungrouped(read_clip_durations(&mut self.cursor, head, end, marker)?)
            }
        };

        tracing::debug!(
            clips = result.clip_count(),
            grouped = result.is_grouped(),
            "read clip table"
        );
        self.result = Some(result);
        Ok(self)
    }

    /// Finish the session. Stages that were skipped contribute nothing.
    pub fn finish(self) -> ParsedInfo {
        let title_names = self.titles.iter().map(|t| t.name.clone()).collect();
        ParsedInfo {
            file: self.file,
            title_names,
            result: self
                .result
                .unwrap_or_else(|| MappingResult::Grouped(Vec::new())),
            warnings: self.warnings,
        }
    }

    pub fn file(&self) -> &InfoFile {
        &self.file
    }

    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    fn marker(&self) -> Result<Marker> {
        let header = &self.file.header;
        self.file.marker.ok_or(Error::MarkerNotFound {
            head: header.clip_table_head,
            end: header.clip_table_end,
        })
    }
}

/// Parse an info file held in memory.
pub fn parse(data: impl Into<bytes::Bytes>, options: &ParseOptions) -> Result<ParsedInfo> {
    let info = ParseSession::open(Cursor::new(data), options)?
        .detect_marker()?
        .extract_titles()?
        .map_clips()?
        .finish();
    Ok(info)
}

/// Read and parse an info file from disk.
pub fn parse_file<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<ParsedInfo> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "parsing info file");
    let cursor = Cursor::open(path)?;
    let info = ParseSession::open(cursor, options)?
        .detect_marker()?
        .extract_titles()?
        .map_clips()?
        .finish();
    Ok(info)
}
