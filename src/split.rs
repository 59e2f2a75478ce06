//! Applying a split plan to a video object.
//!
//! Segments are cut strictly in plan order: each start time is a position in
//! one continuous stream. A failing segment is reported and the run moves on;
//! only an unusable destination stops the run, and it does so before the
//! first cut.

use crate::config::{LogConfig, ToolsConfig};
use crate::status::StatusLog;
use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};
use vrosplit_av::{FfmpegSplitter, SegmentSplitter, SplitJob};
use vrosplit_ifo::SplitSegment;

#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    /// An output directory could not be created or entered.
    #[error("A problem occurred while accessing {}: {source}", path.display())]
    DestinationUnwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// ffmpeg could not be found.
    #[error("Failed to run ffmpeg. Is ffmpeg installed? ({0})")]
    ToolUnavailable(#[from] vrosplit_av::Error),

    /// The status log file could not be opened.
    #[error("Cannot open status log {}: {source}", path.display())]
    Log {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SplitOptions {
    /// Do not cut segments whose output file already exists.
    pub skip_existing: bool,
}

/// What happened to one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentOutcome {
    Split,
    Skipped,
    /// The splitter failed; carries its diagnostic text verbatim.
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct SegmentReport {
    pub index: u32,
    pub destination: PathBuf,
    pub outcome: SegmentOutcome,
}

#[derive(Debug, Clone, Default)]
pub struct SplitReport {
    pub segments: Vec<SegmentReport>,
}

impl SplitReport {
    pub fn split_count(&self) -> usize {
        self.count(|o| matches!(o, SegmentOutcome::Split))
    }

    pub fn skipped_count(&self) -> usize {
        self.count(|o| matches!(o, SegmentOutcome::Skipped))
    }

    pub fn failed_count(&self) -> usize {
        self.count(|o| matches!(o, SegmentOutcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&SegmentOutcome) -> bool) -> usize {
        self.segments.iter().filter(|s| pred(&s.outcome)).count()
    }
}

/// Find ffmpeg, preferring the configured binary.
pub fn locate_ffmpeg(tools: &ToolsConfig) -> Result<FfmpegSplitter, SplitError> {
    Ok(FfmpegSplitter::locate(tools.ffmpeg_path.as_deref())?)
}

/// Create `root` if needed and open the status log inside it.
pub fn open_status_log(root: &Path, log: &LogConfig) -> Result<StatusLog, SplitError> {
    ensure_dir(root)?;
    if !log.enabled {
        return Ok(StatusLog::new());
    }

    let path = root.join(&log.file_name);
    StatusLog::with_file(&path).map_err(|source| SplitError::Log { path, source })
}

/// Cut every segment out of `source`, in order.
pub fn run_split(
    segments: impl IntoIterator<Item = SplitSegment>,
    source: &Path,
    splitter: &dyn SegmentSplitter,
    options: &SplitOptions,
    log: &mut StatusLog,
) -> Result<SplitReport, SplitError> {
    let segments: Vec<SplitSegment> = segments.into_iter().collect();

    let directories: BTreeSet<&Path> = segments.iter().map(|s| s.directory()).collect();
    for dir in directories {
        if let Err(e) = ensure_dir(dir) {
            log.critical(&e);
            return Err(e);
        }
    }

    log.info(format!(
        "NOW SPLITTING {} clips from {}",
        segments.len(),
        source.display()
    ));

    let mut report = SplitReport::default();
    let mut current_title: Option<&str> = None;

    for segment in &segments {
        if let Some(title) = segment.title.as_deref() {
            if current_title != Some(title) {
                log.info(format!("Now splitting clips in title \"{title}\""));
                current_title = Some(title);
            }
        }

        log.info(format!("Splitting clip {}...", segment.index));

        let outcome = if options.skip_existing && segment.destination.exists() {
            log.info(format!(
                "Skipped clip {} as it already exists",
                segment.index
            ));
            SegmentOutcome::Skipped
        } else {
            let job = SplitJob {
                source,
                start_secs: segment.start_secs,
                duration_secs: segment.duration_secs,
                destination: &segment.destination,
            };
            match splitter.split(&job) {
                Ok(()) => {
                    log.info(format!("Successfully split clip {}", segment.index));
                    SegmentOutcome::Split
                }
                Err(e) => {
                    let message = match e {
                        vrosplit_av::Error::ToolFailed { message, .. } => message,
                        other => other.to_string(),
                    };
                    log.alert(format!(
                        "Failed to split clip {}:\n{}",
                        segment.index, message
                    ));
                    SegmentOutcome::Failed(message)
                }
            }
        };

        report.segments.push(SegmentReport {
            index: segment.index,
            destination: segment.destination.clone(),
            outcome,
        });
    }

    log.info(format!(
        "Finished! {} split, {} skipped, {} failed",
        report.split_count(),
        report.skipped_count(),
        report.failed_count()
    ));

    Ok(report)
}

fn ensure_dir(dir: &Path) -> Result<(), SplitError> {
    std::fs::create_dir_all(dir).map_err(|source| SplitError::DestinationUnwritable {
        path: dir.to_path_buf(),
        source,
    })
}
