use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vrosplit")]
#[command(author, version, about = "Split DVD-RAM .VRO recordings into one file per clip")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a VR_MANGR.IFO file and list its titles and clips
    Parse {
        /// Info file to parse
        #[arg(required = true)]
        ifo: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        file_type: FileTypeArgs,
    },

    /// Show where each clip would be written, without splitting
    Plan {
        /// Info file to parse
        #[arg(required = true)]
        ifo: PathBuf,

        /// Destination directory
        #[arg(required = true)]
        dest: PathBuf,

        #[command(flatten)]
        plan: PlanArgs,

        #[command(flatten)]
        file_type: FileTypeArgs,
    },

    /// Split a .VRO file into one .mpg per clip
    Split {
        /// Info file describing the recording
        #[arg(required = true)]
        ifo: PathBuf,

        /// Video object to split
        #[arg(required = true)]
        vro: PathBuf,

        /// Destination directory
        #[arg(required = true)]
        dest: PathBuf,

        /// Leave clips alone whose output file already exists
        #[arg(long)]
        skip_existing: bool,

        #[command(flatten)]
        plan: PlanArgs,

        #[command(flatten)]
        file_type: FileTypeArgs,
    },

    /// Check that required external tools are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        #[arg(value_name = "CONFIG")]
        file: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

#[derive(Args)]
pub struct PlanArgs {
    /// Seconds added to every clip's duration (may be negative)
    #[arg(long, allow_hyphen_values = true)]
    pub offset: Option<f64>,

    /// Write each title's clips into its own sub-directory
    #[arg(long, overrides_with = "no_group")]
    pub group: bool,

    /// Write all clips directly into the destination directory
    #[arg(long, overrides_with = "group")]
    pub no_group: bool,
}

impl PlanArgs {
    pub fn group_by_title(&self) -> Option<bool> {
        resolve_flag(self.group, self.no_group)
    }
}

#[derive(Args)]
pub struct FileTypeArgs {
    /// Refuse info files that are not DVD_RTR_VMG0
    #[arg(long, overrides_with = "no_enforce_type")]
    pub enforce_type: bool,

    /// Parse info files of any type, with a warning
    #[arg(long, overrides_with = "enforce_type")]
    pub no_enforce_type: bool,
}

impl FileTypeArgs {
    pub fn enforce_file_type(&self) -> Option<bool> {
        resolve_flag(self.enforce_type, self.no_enforce_type)
    }
}

fn resolve_flag(yes: bool, no: bool) -> Option<bool> {
    match (yes, no) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_offset_is_accepted() {
        let cli = Cli::try_parse_from(["vrosplit", "plan", "a.ifo", "out", "--offset", "-1"]).unwrap();
        match cli.command {
            Commands::Plan { plan, .. } => assert_eq!(plan.offset, Some(-1.0)),
            _ => panic!("expected plan"),
        }
    }

    #[test]
    fn test_last_group_flag_wins() {
        let cli =
            Cli::try_parse_from(["vrosplit", "plan", "a.ifo", "out", "--group", "--no-group"]).unwrap();
        match cli.command {
            Commands::Plan { plan, .. } => assert_eq!(plan.group_by_title(), Some(false)),
            _ => panic!("expected plan"),
        }
    }

    #[test]
    fn test_flags_default_to_config() {
        let cli = Cli::try_parse_from(["vrosplit", "parse", "a.ifo"]).unwrap();
        match cli.command {
            Commands::Parse { file_type, .. } => assert_eq!(file_type.enforce_file_type(), None),
            _ => panic!("expected parse"),
        }
    }
}
