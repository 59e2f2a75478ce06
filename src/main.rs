mod cli;

use vrosplit::{
    config::{self, Config},
    report,
    split::{self, SplitOptions},
};
use vrosplit_ifo::{ParseOptions, ParsedInfo, SplitPlanner};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, FileTypeArgs, PlanArgs};
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "vrosplit=debug,vrosplit_ifo=trace,vrosplit_av=debug".to_string()
        } else {
            "vrosplit=info,vrosplit_ifo=info,vrosplit_av=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Parse {
            ifo,
            json,
            file_type,
        } => parse_info(&ifo, json, &file_type, config_path),
        Commands::Plan {
            ifo,
            dest,
            plan,
            file_type,
        } => plan_split(&ifo, &dest, &plan, &file_type, config_path),
        Commands::Split {
            ifo,
            vro,
            dest,
            skip_existing,
            plan,
            file_type,
        } => run_split(
            &ifo,
            &vro,
            &dest,
            skip_existing,
            &plan,
            &file_type,
            config_path,
        ),
        Commands::CheckTools => check_tools(config_path),
        Commands::Validate { file } => validate_config(file.as_deref()),
        Commands::Version => {
            println!("vrosplit {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn load_info(ifo: &Path, file_type: &FileTypeArgs, config: &Config) -> Result<ParsedInfo> {
    if !ifo.exists() {
        anyhow::bail!("Info file does not exist: {:?}", ifo);
    }

    let options = ParseOptions {
        enforce_file_type: file_type
            .enforce_file_type()
            .unwrap_or(config.split.enforce_file_type),
    };

    let info = vrosplit_ifo::parse_file(ifo, &options)
        .with_context(|| format!("Failed to parse info file {:?}", ifo))?;

    for warning in &info.warnings {
        tracing::warn!("{}", warning);
    }

    Ok(info)
}

fn planner(dest: &Path, plan: &PlanArgs, config: &Config) -> SplitPlanner {
    SplitPlanner::new(dest)
        .offset_secs(plan.offset.unwrap_or(config.split.offset_secs))
        .group_by_title(plan.group_by_title().unwrap_or(config.split.group_by_title))
}

fn parse_info(
    ifo: &Path,
    json: bool,
    file_type: &FileTypeArgs,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let info = load_info(ifo, file_type, &config)?;

    if json {
        let json_str = serde_json::to_string_pretty(&info)?;
        println!("{}", json_str);
    } else {
        print!("{}", report::parse_summary(&info));
    }

    Ok(())
}

fn plan_split(
    ifo: &Path,
    dest: &Path,
    plan: &PlanArgs,
    file_type: &FileTypeArgs,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    if let Some(offset) = plan.offset {
        if !offset.is_finite() {
            anyhow::bail!("--offset must be a finite number of seconds");
        }
    }

    let info = load_info(ifo, file_type, &config)?;
    let planner = planner(dest, plan, &config);
    let segments: Vec<_> = planner.plan(&info.result).collect();

    print!("{}", report::plan_summary(&segments));
    println!("\n{} clips planned", segments.len());

    Ok(())
}

fn run_split(
    ifo: &Path,
    vro: &Path,
    dest: &Path,
    skip_existing: bool,
    plan: &PlanArgs,
    file_type: &FileTypeArgs,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    if let Some(offset) = plan.offset {
        if !offset.is_finite() {
            anyhow::bail!("--offset must be a finite number of seconds");
        }
    }

    if !vro.exists() {
        anyhow::bail!("Video object does not exist: {:?}", vro);
    }

    let info = load_info(ifo, file_type, &config)?;
    let ffmpeg = split::locate_ffmpeg(&config.tools)?;
    tracing::debug!("Using ffmpeg at {:?}", ffmpeg.program());

    let mut log = split::open_status_log(dest, &config.log)?;
    log.info(format!("Parsed {:?}", ifo));
    for warning in &info.warnings {
        log.alert(warning);
    }

    let planner = planner(dest, plan, &config);
    let options = SplitOptions {
        skip_existing: skip_existing || config.split.skip_existing,
    };

    let report = split::run_split(planner.plan(&info.result), vro, &ffmpeg, &options, &mut log)?;

    println!(
        "Split {} clips, skipped {}, failed {}",
        report.split_count(),
        report.skipped_count(),
        report.failed_count()
    );
    if let Some(path) = log.file_path() {
        println!("Status log: {}", path.display());
    }

    if report.failed_count() > 0 {
        anyhow::bail!("{} clips failed to split", report.failed_count());
    }

    Ok(())
}

fn check_tools(config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    println!("Checking external tools...\n");

    let tools = vrosplit_av::check_tools(config.tools.ffmpeg_path.as_deref());
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version.lines().next().unwrap_or(""));
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Install ffmpeg to enable splitting.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    println!("  Enforce file type: {}", config.split.enforce_file_type);
    println!("  Skip existing: {}", config.split.skip_existing);
    println!("  Group by title: {}", config.split.group_by_title);
    println!("  Offset: {}s", config.split.offset_secs);
    match config.tools.ffmpeg_path {
        Some(ref p) => println!("  ffmpeg: {}", p.display()),
        None => println!("  ffmpeg: (PATH)"),
    }
    if config.log.enabled {
        println!("  Status log: <destination>/{}", config.log.file_name);
    } else {
        println!("  Status log: disabled");
    }

    Ok(())
}
