//! Human-readable summaries of parse results and split plans.

use std::fmt::Write;
use vrosplit_ifo::{pts_to_frames, pts_to_seconds, MappingResult, ParsedInfo, SplitSegment};

const TAB: &str = " ";

/// Summarise a parsed info file: type, clip count, titles and clips.
pub fn parse_summary(info: &ParsedInfo) -> String {
    let mut out = String::new();

    let _ = writeln!(out, ".IFO type: {}", info.file.header.type_tag);
    for warning in &info.warnings {
        let _ = writeln!(out, "[ALERT] {warning}");
    }
    if let Some(marker) = info.file.marker {
        let _ = writeln!(out, "Clip marker: {marker}");
    }
    let _ = writeln!(out, "Number of clips: {}", info.file.declared_clip_count);

    match &info.result {
        MappingResult::Grouped(titles) => {
            let _ = writeln!(out, "\n[Titles and their clip durations]");
            for title in titles {
                let _ = writeln!(out, "{}:", title.name);
                list_clips(&mut out, &title.clips);
            }
        }
        MappingResult::Ungrouped(durations) => {
            let _ = writeln!(out, "\n[Titles]");
            for name in &info.title_names {
                let _ = writeln!(out, "{name}");
            }
            let _ = writeln!(out, "\n[Clips]");
            list_clips(&mut out, durations);
        }
    }

    out
}

fn list_clips(out: &mut String, clips: &[u32]) {
    for (i, &clip) in clips.iter().enumerate() {
        let _ = writeln!(
            out,
            "{TAB} Clip {}: {} seconds, {} frames",
            i + 1,
            pts_to_seconds(clip),
            pts_to_frames(clip)
        );
    }
}

/// One line per planned segment.
pub fn plan_summary<'a>(segments: impl IntoIterator<Item = &'a SplitSegment>) -> String {
    let mut out = String::new();
    for segment in segments {
        let _ = writeln!(
            out,
            "{:>4}  start {:>10.3}s  duration {:>9.3}s  -> {}",
            segment.index,
            segment.start_secs,
            segment.duration_secs,
            segment.destination.display()
        );
    }
    out
}
