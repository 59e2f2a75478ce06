//! Append-only status log for parse and split runs.
//!
//! Every event becomes one timestamped line. Lines are mirrored to tracing,
//! kept in memory for the caller, and optionally appended to a log file.

use chrono::Local;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Severity of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Alert,
    Critical,
}

impl StatusLevel {
    fn tag(self) -> &'static str {
        match self {
            StatusLevel::Info => "",
            StatusLevel::Alert => "[ALERT] ",
            StatusLevel::Critical => "[CRITICAL] ",
        }
    }
}

#[derive(Debug, Default)]
pub struct StatusLog {
    file: Option<(PathBuf, File)>,
    lines: Vec<String>,
}

impl StatusLog {
    /// A log that only keeps lines in memory (and traces them).
    pub fn new() -> Self {
        Self::default()
    }

    /// A log that also appends every line to `path`.
    pub fn with_file(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Some((path.to_path_buf(), file)),
            lines: Vec::new(),
        })
    }

    pub fn info(&mut self, message: impl fmt::Display) {
        self.push(StatusLevel::Info, message);
    }

    pub fn alert(&mut self, message: impl fmt::Display) {
        self.push(StatusLevel::Alert, message);
    }

    pub fn critical(&mut self, message: impl fmt::Display) {
        self.push(StatusLevel::Critical, message);
    }

    /// Every line recorded so far, oldest first.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file.as_ref().map(|(path, _)| path.as_path())
    }

    fn push(&mut self, level: StatusLevel, message: impl fmt::Display) {
        let message = message.to_string();
        match level {
            StatusLevel::Info => tracing::info!("{}", message),
            StatusLevel::Alert => tracing::warn!("{}", message),
            StatusLevel::Critical => tracing::error!("{}", message),
        }

        let line = format!(
            "[{}] {}{}",
            Local::now().format("%Y-%m-%d %H:%M:%S%.6f"),
            level.tag(),
            message
        );

        if let Some((path, file)) = self.file.as_mut() {
            let written = writeln!(file, "{line}").and_then(|_| file.flush());
            if let Err(e) = written {
                tracing::warn!("Failed to write status log {:?}: {}; disabling it", path, e);
                self.file = None;
            }
        }

        self.lines.push(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_are_timestamped_and_tagged() {
        let mut log = StatusLog::new();
        log.info("Splitting clip 1...");
        log.alert("Skipped clip 2 as it already exists");
        log.critical("Failed to run ffmpeg");

        let lines = log.lines();
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.starts_with('[')));
        assert!(lines[0].ends_with("] Splitting clip 1..."));
        assert!(lines[1].contains("] [ALERT] Skipped clip 2"));
        assert!(lines[2].contains("] [CRITICAL] Failed to run ffmpeg"));
    }

    #[test]
    fn test_file_is_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");
        std::fs::write(&path, "earlier run\n").unwrap();

        let mut log = StatusLog::with_file(&path).unwrap();
        log.info("first");
        log.info("second");
        drop(log);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "earlier run");
        assert!(lines[1].ends_with("first"));
        assert!(lines[2].ends_with("second"));
    }
}
