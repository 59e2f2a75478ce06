use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub split: SplitConfig,

    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SplitConfig {
    /// Refuse info files whose type tag is not DVD_RTR_VMG0
    #[serde(default = "default_true")]
    pub enforce_file_type: bool,

    /// Leave clips alone whose output file already exists
    #[serde(default)]
    pub skip_existing: bool,

    /// Write each title's clips into its own sub-directory
    #[serde(default = "default_true")]
    pub group_by_title: bool,

    /// Seconds added to every clip's duration (may be negative)
    #[serde(default)]
    pub offset_secs: f64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            enforce_file_type: true,
            skip_existing: false,
            group_by_title: true,
            offset_secs: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToolsConfig {
    /// Explicit ffmpeg binary; PATH is searched when unset
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    /// Append status lines to a file in the destination directory
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_log_file")]
    pub file_name: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            file_name: default_log_file(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_file() -> String {
    "log.txt".to_string()
}
