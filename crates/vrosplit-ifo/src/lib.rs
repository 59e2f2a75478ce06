//! vrosplit-ifo: `DVD_RTR_VMG0` info file parsing and VRO split planning
//!
//! DVD-RAM camcorders record every clip into one `.VRO` video object and
//! describe the recording in an info file (`VR_MANGR.IFO`). This crate reads
//! that info file and plans the cuts that turn the video object back into
//! one file per clip.
//!
//! # Modules
//!
//! - `cursor` - Seekable big-endian byte reader
//! - `header` - Type tag and table pointers at fixed offsets
//! - `marker` - Inference of the clip record delimiter
//! - `titles` - Title table extraction
//! - `clips` - Clip table walk and clip-to-title mapping
//! - `session` - The staged parse tying the above together
//! - `plan` - Cumulative (start, duration, destination) segments
//! - `time` - PTS tick conversions
//!
//! # Example
//!
//! ```no_run
//! use vrosplit_ifo::{parse_file, ParseOptions, SplitPlanner};
//!
//! let info = parse_file("VR_MANGR.IFO", &ParseOptions::default())?;
//! let planner = SplitPlanner::new("out").group_by_title(true);
//! for segment in planner.plan(&info.result) {
//!     println!("{} -> {}", segment.start_secs, segment.destination.display());
//! }
//! # Ok::<(), vrosplit_ifo::Error>(())
//! ```

pub mod clips;
pub mod cursor;
pub mod error;
pub mod header;
pub mod marker;
pub mod plan;
pub mod session;
pub mod time;
pub mod titles;

#[cfg(any(test, feature = "test-util"))]
pub mod test_fixtures;

pub use clips::{ClipRecord, Mapping};
pub use cursor::Cursor;
pub use error::{Error, Result};
pub use header::{InfoHeader, EXPECTED_TYPE_TAG};
pub use marker::Marker;
pub use plan::{sanitize_title_name, SplitPlan, SplitPlanner, SplitSegment};
pub use session::{
    parse, parse_file, InfoFile, MappingResult, ParseOptions, ParseSession, ParseWarning,
    ParsedInfo,
};
pub use time::{pts_to_frames, pts_to_seconds, PTS_PER_FRAME, PTS_PER_SECOND};
pub use titles::Title;
