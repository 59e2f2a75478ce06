//! Split planning: clip durations to cumulative cut points.
//!
//! A VRO file is one continuous stream, so every segment starts where the
//! previous one (across all titles) ended. Segments must be applied in the
//! order they are produced.

use crate::time::pts_to_seconds;
use crate::MappingResult;
use std::path::{Path, PathBuf};

/// Extension of the files written for each clip.
pub const OUTPUT_EXTENSION: &str = "mpg";

/// Characters that may not appear in a title directory name.
const ILLEGAL_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// One cut of the source video object.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct SplitSegment {
    /// 1-based position across the whole run; also the output file stem.
    pub index: u32,
    /// Title the clip was mapped to, if clips were grouped.
    pub title: Option<String>,
    /// Offset into the source, in seconds.
    pub start_secs: f64,
    /// Clip duration plus the configured offset, in seconds.
    pub duration_secs: f64,
    /// Output file path.
    pub destination: PathBuf,
}

impl SplitSegment {
    /// Directory the output file is written to.
    pub fn directory(&self) -> &Path {
        self.destination.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// Settings for turning a mapping result into segments.
#[derive(Debug, Clone)]
pub struct SplitPlanner {
    root: PathBuf,
    offset_secs: f64,
    group_by_title: bool,
}

impl SplitPlanner {
    /// Create a planner writing into `root`, without offset or grouping.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            offset_secs: 0.0,
            group_by_title: false,
        }
    }

    /// Seconds added to every clip's duration. May be negative.
    pub fn offset_secs(mut self, secs: f64) -> Self {
        self.offset_secs = secs;
        self
    }

    /// Write each title's clips into its own sub-directory.
    pub fn group_by_title(mut self, enabled: bool) -> Self {
        self.group_by_title = enabled;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Plan the segments for `result`, titles in discovery order.
    ///
    /// An ungrouped result is planned as a single group without a title.
    pub fn plan<'a>(&'a self, result: &'a MappingResult) -> SplitPlan<'a> {
        let groups = match result {
            MappingResult::Grouped(titles) => titles
                .iter()
                .map(|t| (Some(t.name.as_str()), t.clips.as_slice()))
                .collect(),
            MappingResult::Ungrouped(durations) => vec![(None, durations.as_slice())],
        };

        SplitPlan {
            planner: self,
            groups,
            group: 0,
            clip: 0,
            counter: 0,
            elapsed_secs: 0.0,
        }
    }

    fn destination(&self, title: Option<&str>, index: u32) -> PathBuf {
        let file_name = format!("{index}.{OUTPUT_EXTENSION}");
        match title {
            Some(name) if self.group_by_title => {
                self.root.join(sanitize_title_name(name)).join(file_name)
            }
            _ => self.root.join(file_name),
        }
    }
}

/// Lazily produced, ordered sequence of [`SplitSegment`]s.
#[derive(Debug)]
pub struct SplitPlan<'a> {
    planner: &'a SplitPlanner,
    groups: Vec<(Option<&'a str>, &'a [u32])>,
    group: usize,
    clip: usize,
    counter: u32,
    elapsed_secs: f64,
}

impl SplitPlan<'_> {
    /// Running sum of the durations of the segments produced so far.
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    /// Number of segments produced so far.
    pub fn emitted(&self) -> u32 {
        self.counter
    }
}

impl Iterator for SplitPlan<'_> {
    type Item = SplitSegment;

    fn next(&mut self) -> Option<SplitSegment> {
        loop {
            let &(title, clips) = self.groups.get(self.group)?;

            let Some(&ticks) = clips.get(self.clip) else {
                self.group += 1;
                self.clip = 0;
                continue;
            };
            self.clip += 1;
            self.counter += 1;

            let start_secs = self.elapsed_secs;
            let duration_secs = pts_to_seconds(ticks) + self.planner.offset_secs;
            self.elapsed_secs += duration_secs;

            return Some(SplitSegment {
                index: self.counter,
                title: title.map(str::to_string),
                start_secs,
                duration_secs,
                destination: self.planner.destination(title, self.counter),
            });
        }
    }
}

/// Make a title usable as a directory name.
///
/// Path separators and other characters illegal on common filesystems become
/// `-`. Spaces are dropped rather than replaced. The names `.` and `..`
/// become dashes so they never point at the root or its parent.
pub fn sanitize_title_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .filter(|&c| c != ' ')
        .map(|c| if ILLEGAL_CHARS.contains(&c) { '-' } else { c })
        .collect();

    match sanitized.as_str() {
        "." | ".." => sanitized.replace('.', "-"),
        _ => sanitized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Title;

    fn title(name: &str, clips: &[u32]) -> Title {
        Title {
            name: name.to_string(),
            clips: clips.to_vec(),
        }
    }

    #[test]
    fn test_cumulative_starts_across_titles() {
        let result = MappingResult::Grouped(vec![
            title("A", &[900_000, 450_000]),
            title("B", &[90_000]),
        ]);
        let planner = SplitPlanner::new("/out");
        let segments: Vec<_> = planner.plan(&result).collect();

        let starts: Vec<f64> = segments.iter().map(|s| s.start_secs).collect();
        let durations: Vec<f64> = segments.iter().map(|s| s.duration_secs).collect();
        assert_eq!(starts, [0.0, 10.0, 15.0]);
        assert_eq!(durations, [10.0, 5.0, 1.0]);
    }

    #[test]
    fn test_numbering_never_resets() {
        let result = MappingResult::Grouped(vec![
            title("A", &[1, 1]),
            title("B", &[]),
            title("C", &[1, 1, 1]),
        ]);
        let planner = SplitPlanner::new("/out").group_by_title(true);
        let indices: Vec<u32> = planner.plan(&result).map(|s| s.index).collect();
        assert_eq!(indices, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_elapsed_is_sum_with_offset() {
        let result = MappingResult::Ungrouped(vec![180_000; 4]);
        let planner = SplitPlanner::new("/out").offset_secs(0.5);
        let mut plan = planner.plan(&result);
        plan.by_ref().for_each(drop);

        assert_eq!(plan.emitted(), 4);
        assert_eq!(plan.elapsed_secs(), 4.0 * (2.0 + 0.5));
    }

    #[test]
    fn test_negative_offset() {
        let result = MappingResult::Ungrouped(vec![450_000]);
        let planner = SplitPlanner::new("/out").offset_secs(-1.0);
        let segment = planner.plan(&result).next().unwrap();
        assert_eq!(segment.start_secs, 0.0);
        assert_eq!(segment.duration_secs, 4.0);
    }

    #[test]
    fn test_grouped_destinations() {
        let result = MappingResult::Grouped(vec![
            title("Day 1: Beach", &[1]),
            title("Zoo", &[1]),
        ]);
        let planner = SplitPlanner::new("/out").group_by_title(true);
        let paths: Vec<PathBuf> = planner.plan(&result).map(|s| s.destination).collect();
        assert_eq!(
            paths,
            [
                PathBuf::from("/out/Day1-Beach/1.mpg"),
                PathBuf::from("/out/Zoo/2.mpg"),
            ]
        );
    }

    #[test]
    fn test_grouping_disabled_writes_to_root() {
        let result = MappingResult::Grouped(vec![title("A", &[1]), title("B", &[1])]);
        let planner = SplitPlanner::new("/out");
        let segments: Vec<_> = planner.plan(&result).collect();

        assert_eq!(segments[1].destination, PathBuf::from("/out/2.mpg"));
        assert_eq!(segments[1].directory(), Path::new("/out"));
        assert_eq!(segments[1].title.as_deref(), Some("B"));
    }

    #[test]
    fn test_ungrouped_ignores_grouping_flag() {
        let result = MappingResult::Ungrouped(vec![1, 2]);
        let planner = SplitPlanner::new("/out").group_by_title(true);
        let segments: Vec<_> = planner.plan(&result).collect();

        assert!(segments.iter().all(|s| s.title.is_none()));
        assert_eq!(segments[0].destination, PathBuf::from("/out/1.mpg"));
    }

    #[test]
    fn test_empty_result() {
        let planner = SplitPlanner::new("/out");
        assert_eq!(planner.plan(&MappingResult::Ungrouped(Vec::new())).count(), 0);
        assert_eq!(planner.plan(&MappingResult::Grouped(Vec::new())).count(), 0);
    }

    #[test]
    fn test_sanitize_replaces_illegal_characters() {
        assert_eq!(sanitize_title_name(r#"a/b\c:d*e?f"g<h>i|j"#), "a-b-c-d-e-f-g-h-i-j");
    }

    // Spaces are removed, not hyphenated. This pins existing behaviour of
    // the tool; it is not a statement that removal is preferable.
    #[test]
    fn test_sanitize_dot_names_stay_inside_root() {
        assert_eq!(sanitize_title_name(".."), "--");
        assert_eq!(sanitize_title_name(" . "), "-");
        assert_eq!(sanitize_title_name("...and more"), "...andmore");

        let result = MappingResult::Grouped(vec![title("..", &[90_000])]);
        let planner = SplitPlanner::new("/out").group_by_title(true);
        let segment = planner.plan(&result).next().unwrap();
        assert_eq!(segment.destination, Path::new("/out/--/1.mpg"));
    }

    #[test]
    fn test_sanitize_removes_spaces() {
        assert_eq!(sanitize_title_name("Summer 2004 / Lake"), "Summer2004-Lake");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for name in ["Summer 2004 / Lake", "plain", "  ", "?:*", "Müller Geburtstag"] {
            let once = sanitize_title_name(name);
            assert_eq!(sanitize_title_name(&once), once);
        }
    }
}
