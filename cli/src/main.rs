mod commands;
mod config;
mod discover;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use output::OutputFormat;
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "thtml2doxy",
    version,
    about = "Convert THtml comments in C++ sources to Doxygen comments"
)]
struct Cli {
    /// Source files, or directories to search for sources
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Print converted sources on stdout instead of rewriting them
    #[arg(short = 'o', long)]
    stdout: bool,

    /// Shorthand for --log-level debug
    #[arg(short, long)]
    debug: bool,

    /// Log level: error, warning, info, debug or trace
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Include directory for the C++ parser (repeatable)
    #[arg(short = 'I', value_name = "DIR")]
    include: Vec<PathBuf>,

    /// List the comments found instead of converting; no file is written
    #[arg(long)]
    list: bool,

    /// Output format for --list
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Config profile to use
    #[arg(long, default_value = "default")]
    profile: String,
}

/// Level names; `warning` and `critical` are accepted as well.
fn parse_level(name: &str) -> Option<Level> {
    match name.to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" | "critical" | "fatal" => Some(Level::ERROR),
        _ => None,
    }
}

/// Log to stderr; `RUST_LOG` directives still apply on top of `level`.
fn init_logging(level: Level) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let profile = config::load_config(&cli.profile);

    let level_name = cli
        .log_level
        .clone()
        .or_else(|| cli.debug.then(|| "debug".to_string()))
        .or_else(|| profile.log_level.clone())
        .unwrap_or_else(|| "info".to_string());
    let Some(level) = parse_level(&level_name) else {
        eprintln!("Error: log level must be one of: error, warning, info, debug, trace (got '{level_name}')");
        return ExitCode::from(1);
    };
    init_logging(level);

    let include_dirs = if cli.include.is_empty() {
        profile.include_dirs.clone().unwrap_or_default()
    } else {
        cli.include.clone()
    };
    if let Some(missing) = include_dirs.iter().find(|dir| !dir.is_dir()) {
        tracing::error!(dir = %missing.display(), "include directory not found");
        return ExitCode::from(2);
    }

    let command = if cli.list {
        commands::Command::List {
            paths: cli.paths,
            format: cli.format,
        }
    } else {
        commands::Command::Convert {
            paths: cli.paths,
            stdout: cli.stdout,
        }
    };

    if let Err(e) = commands::run(command, &profile, include_dirs) {
        eprintln!("Error: {e}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}
