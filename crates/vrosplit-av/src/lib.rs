//! # vrosplit-av
//!
//! External tool handling for cutting DVD-RAM video objects.
//!
//! This crate provides:
//! - Detection of `ffmpeg` (configured path or PATH lookup)
//! - The [`SegmentSplitter`] seam used by the split runner
//! - [`FfmpegSplitter`], which cuts segments with stream copy into the
//!   `dvd` muxer
//!
//! ## Features
//!
//! - `tracing` - Enable tracing support
//!
//! ## Example
//!
//! ```no_run
//! use vrosplit_av::{FfmpegSplitter, SegmentSplitter, SplitJob};
//! use std::path::Path;
//!
//! let ffmpeg = FfmpegSplitter::locate(None)?;
//! ffmpeg.split(&SplitJob {
//!     source: Path::new("VR_MOVIE.VRO"),
//!     start_secs: 0.0,
//!     duration_secs: 10.0,
//!     destination: Path::new("1.mpg"),
//! })?;
//! # Ok::<(), vrosplit_av::Error>(())
//! ```

mod error;
pub mod splitter;
pub mod tools;

// Re-exports
pub use error::{Error, Result};
pub use splitter::{FfmpegSplitter, SegmentSplitter, SplitJob};
pub use tools::{check_tool, check_tools, get_tool_path, require_tool, ToolInfo};
