//! Integration tests for the split runner.
//!
//! A recording splitter stands in for ffmpeg so the runner's ordering,
//! skipping and error handling can be checked without external tools.

use assert_matches::assert_matches;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;
use vrosplit::config::LogConfig;
use vrosplit::split::{open_status_log, run_split, SegmentOutcome, SplitError, SplitOptions};
use vrosplit::status::StatusLog;
use vrosplit_av::{SegmentSplitter, SplitJob};
use vrosplit_ifo::test_fixtures::IfoBuilder;
use vrosplit_ifo::{parse, MappingResult, ParseOptions, SplitPlanner};

#[derive(Debug, Clone, PartialEq)]
struct RecordedJob {
    start_secs: f64,
    duration_secs: f64,
    destination: PathBuf,
}

/// Records every job and writes an empty output file, optionally failing on
/// selected destinations.
#[derive(Default)]
struct RecordingSplitter {
    jobs: RefCell<Vec<RecordedJob>>,
    fail_on: Vec<String>,
}

impl RecordingSplitter {
    fn failing_on(file_name: &str) -> Self {
        Self {
            fail_on: vec![file_name.to_string()],
            ..Default::default()
        }
    }

    fn jobs(&self) -> Vec<RecordedJob> {
        self.jobs.borrow().clone()
    }
}

impl SegmentSplitter for RecordingSplitter {
    fn split(&self, job: &SplitJob<'_>) -> vrosplit_av::Result<()> {
        self.jobs.borrow_mut().push(RecordedJob {
            start_secs: job.start_secs,
            duration_secs: job.duration_secs,
            destination: job.destination.to_path_buf(),
        });

        let name = job
            .destination
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        if self.fail_on.iter().any(|f| f == name) {
            return Err(vrosplit_av::Error::tool_failed(
                "ffmpeg",
                "Invalid data found when processing input",
            ));
        }

        fs::write(job.destination, b"")?;
        Ok(())
    }
}

fn source() -> &'static Path {
    Path::new("VR_MOVIE.VRO")
}

fn ungrouped(durations: &[u32]) -> MappingResult {
    MappingResult::Ungrouped(durations.to_vec())
}

#[test]
fn test_negative_offset_shortens_segment() {
    let dir = tempdir().unwrap();
    let result = ungrouped(&[450_000]);
    let planner = SplitPlanner::new(dir.path()).offset_secs(-1.0);
    let splitter = RecordingSplitter::default();
    let mut log = StatusLog::new();

    let report = run_split(
        planner.plan(&result),
        source(),
        &splitter,
        &SplitOptions::default(),
        &mut log,
    )
    .unwrap();

    assert_eq!(report.split_count(), 1);
    let jobs = splitter.jobs();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].start_secs, 0.0);
    assert_eq!(jobs[0].duration_secs, 4.0);
    assert_eq!(jobs[0].destination, dir.path().join("1.mpg"));
}

#[test]
fn test_skip_existing_leaves_file_alone() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("3.mpg"), b"already split").unwrap();

    let result = ungrouped(&[90_000, 90_000, 90_000, 90_000]);
    let planner = SplitPlanner::new(dir.path());
    let splitter = RecordingSplitter::default();
    let mut log = StatusLog::new();

    let report = run_split(
        planner.plan(&result),
        source(),
        &splitter,
        &SplitOptions {
            skip_existing: true,
        },
        &mut log,
    )
    .unwrap();

    let destinations: Vec<PathBuf> = splitter.jobs().into_iter().map(|j| j.destination).collect();
    assert_eq!(
        destinations,
        [
            dir.path().join("1.mpg"),
            dir.path().join("2.mpg"),
            dir.path().join("4.mpg"),
        ]
    );
    assert_eq!(report.skipped_count(), 1);
    assert_eq!(report.segments[2].outcome, SegmentOutcome::Skipped);
    assert!(log
        .lines()
        .iter()
        .any(|l| l.ends_with("Skipped clip 3 as it already exists")));
    assert_eq!(
        fs::read(dir.path().join("3.mpg")).unwrap(),
        b"already split"
    );

    // Clip 4 still starts after clip 3's time span.
    assert_eq!(splitter.jobs()[2].start_secs, 3.0);
}

#[test]
fn test_existing_file_is_resplit_without_skip() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("1.mpg"), b"stale").unwrap();

    let result = ungrouped(&[90_000]);
    let planner = SplitPlanner::new(dir.path());
    let splitter = RecordingSplitter::default();
    let mut log = StatusLog::new();

    run_split(
        planner.plan(&result),
        source(),
        &splitter,
        &SplitOptions::default(),
        &mut log,
    )
    .unwrap();

    assert_eq!(splitter.jobs().len(), 1);
}

#[test]
fn test_failed_segment_does_not_stop_run() {
    let dir = tempdir().unwrap();
    let result = ungrouped(&[90_000, 90_000, 90_000]);
    let planner = SplitPlanner::new(dir.path());
    let splitter = RecordingSplitter::failing_on("2.mpg");
    let mut log = StatusLog::new();

    let report = run_split(
        planner.plan(&result),
        source(),
        &splitter,
        &SplitOptions::default(),
        &mut log,
    )
    .unwrap();

    assert_eq!(splitter.jobs().len(), 3);
    assert_eq!(report.split_count(), 2);
    assert_eq!(report.failed_count(), 1);
    assert_matches!(
        &report.segments[1].outcome,
        SegmentOutcome::Failed(msg) if msg == "Invalid data found when processing input"
    );
    assert!(log
        .lines()
        .iter()
        .any(|l| l.contains("[ALERT] Failed to split clip 2:\nInvalid data found")));
    assert!(log.lines().last().unwrap().contains("Finished!"));
}

#[test]
fn test_grouped_run_creates_title_directories() {
    let dir = tempdir().unwrap();
    let data = IfoBuilder::new()
        .title("Day 1: Beach")
        .title("Day2")
        .clip_for_title(0, 900_000)
        .clip_for_title(0, 450_000)
        .clip_for_title(1, 90_000)
        .build();
    let info = parse(data, &ParseOptions::default()).unwrap();
    let planner = SplitPlanner::new(dir.path()).group_by_title(true);
    let splitter = RecordingSplitter::default();
    let mut log = StatusLog::new();

    run_split(
        planner.plan(&info.result),
        source(),
        &splitter,
        &SplitOptions::default(),
        &mut log,
    )
    .unwrap();

    assert!(dir.path().join("Day1-Beach").join("1.mpg").exists());
    assert!(dir.path().join("Day1-Beach").join("2.mpg").exists());
    assert!(dir.path().join("Day2").join("3.mpg").exists());

    let starts: Vec<f64> = splitter.jobs().iter().map(|j| j.start_secs).collect();
    assert_eq!(starts, [0.0, 10.0, 15.0]);

    let title_lines: Vec<&String> = log
        .lines()
        .iter()
        .filter(|l| l.contains("Now splitting clips in title"))
        .collect();
    assert_eq!(title_lines.len(), 2);
    assert!(title_lines[0].ends_with("\"Day 1: Beach\""));
}

#[test]
fn test_unwritable_destination_is_fatal_before_splitting() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, b"").unwrap();

    let result = ungrouped(&[90_000, 90_000]);
    let planner = SplitPlanner::new(&blocker);
    let splitter = RecordingSplitter::default();
    let mut log = StatusLog::new();

    let err = run_split(
        planner.plan(&result),
        source(),
        &splitter,
        &SplitOptions::default(),
        &mut log,
    )
    .unwrap_err();

    assert_matches!(err, SplitError::DestinationUnwritable { ref path, .. } if path == &blocker);
    assert!(splitter.jobs().is_empty());
    assert!(log.lines().iter().any(|l| l.contains("[CRITICAL]")));
}

#[test]
fn test_status_log_lands_in_destination() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("out");

    let mut log = open_status_log(&dest, &LogConfig::default()).unwrap();
    let result = ungrouped(&[90_000]);
    let planner = SplitPlanner::new(&dest);
    let splitter = RecordingSplitter::default();
    run_split(
        planner.plan(&result),
        source(),
        &splitter,
        &SplitOptions::default(),
        &mut log,
    )
    .unwrap();
    drop(log);

    let content = fs::read_to_string(dest.join("log.txt")).unwrap();
    assert!(content.contains("NOW SPLITTING 1 clips"));
    assert!(content.contains("Successfully split clip 1"));
}

#[test]
fn test_disabled_status_log_writes_no_file() {
    let dir = tempdir().unwrap();
    let config = LogConfig {
        enabled: false,
        ..Default::default()
    };

    let log = open_status_log(dir.path(), &config).unwrap();

    assert!(log.file_path().is_none());
    assert!(!dir.path().join("log.txt").exists());
}
