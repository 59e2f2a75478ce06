//! Cutting one segment out of a video object.

use crate::{tools, Error, Result};
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Muxer used for the output files (MPEG-2 program stream, DVD flavour).
pub const OUTPUT_FORMAT: &str = "dvd";

/// A single cut to perform.
#[derive(Debug, Clone, Copy)]
pub struct SplitJob<'a> {
    /// The `.VRO` file.
    pub source: &'a Path,
    /// Offset into the source, in seconds.
    pub start_secs: f64,
    /// Length of the cut, in seconds.
    pub duration_secs: f64,
    /// Output file; overwritten if it exists.
    pub destination: &'a Path,
}

/// Something that can cut a segment out of a source file.
pub trait SegmentSplitter {
    /// Perform the cut, blocking until it is done.
    ///
    /// A failed cut is reported as [`Error::ToolFailed`] carrying whatever
    /// diagnostics the tool wrote.
    fn split(&self, job: &SplitJob<'_>) -> Result<()>;
}

/// Splits with the `ffmpeg` command line tool using stream copy.
#[derive(Debug, Clone)]
pub struct FfmpegSplitter {
    program: PathBuf,
}

impl FfmpegSplitter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Find ffmpeg, preferring a configured path over PATH lookup.
    pub fn locate(configured: Option<&Path>) -> Result<Self> {
        tools::get_tool_path("ffmpeg", configured).map(Self::new)
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Command line arguments for `job`, in invocation order.
    pub fn args(job: &SplitJob<'_>) -> Vec<OsString> {
        vec![
            "-i".into(),
            job.source.into(),
            "-ss".into(),
            format_seconds(job.start_secs).into(),
            "-t".into(),
            format_seconds(job.duration_secs).into(),
            "-f".into(),
            OUTPUT_FORMAT.into(),
            "-c".into(),
            "copy".into(),
            job.destination.into(),
            "-y".into(),
        ]
    }

    fn tool_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.to_string_lossy().to_string())
    }
}

impl SegmentSplitter for FfmpegSplitter {
    fn split(&self, job: &SplitJob<'_>) -> Result<()> {
        if !job.duration_secs.is_finite() || job.duration_secs <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "segment duration must be positive, got {}",
                job.duration_secs
            )));
        }
        if !job.source.exists() {
            return Err(Error::file_not_found(job.source));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "Splitting {:?} at {}s for {}s -> {:?}",
            job.source,
            job.start_secs,
            job.duration_secs,
            job.destination
        );

        let output = Command::new(&self.program)
            .args(Self::args(job))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    Error::tool_not_found(self.tool_name())
                } else {
                    Error::Io(e)
                }
            })?;

        if !output.status.success() {
            return Err(Error::tool_failed(
                self.tool_name(),
                String::from_utf8_lossy(&output.stderr),
            ));
        }

        Ok(())
    }
}

/// Decimal seconds as passed on the command line.
pub fn format_seconds(secs: f64) -> String {
    format!("{secs}")
}
