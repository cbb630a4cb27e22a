use clap::{Parser, Subcommand};
use eyre::{Context, Result, eyre};
use instapaper_stats::commands;
use instapaper_stats::fetcher::{DEFAULT_BASE_URL, InstapaperFetcher};
use instapaper_stats::renderer::MustacheRenderer;
use instapaper_stats::utils::{self, StatsConfig};
use serde::Deserialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Archive Instapaper exports and chart folder counts over time.
#[derive(Parser)]
#[command(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to a specific configuration file.
    /// Defaults to $XDG_CONFIG_HOME/instapaper-stats/config.toml
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Directory holding the dated snapshots.
    /// Defaults to ./backup if not set in config.
    #[arg(long, value_name = "DIR", global = true)]
    archive_dir: Option<PathBuf>,

    /// Log each file read and request made.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress the progress spinner.
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch new data and save it to the archive directory.
    Fetch {
        /// File containing `user|password`.
        credentials: Option<PathBuf>,
    },
    /// Show item and folder counts of one snapshot.
    Info {
        #[arg(value_name = "CSV_FILE")]
        csv_file: PathBuf,
    },
    /// Search articles by title or url; WORD can be a regexp.
    Search { word: String },
    /// Print the latest snapshot's counts in CSV format.
    Csv { dir: Option<PathBuf> },
    /// Print every snapshot's counts in CSV format.
    #[command(name = "csv_full")]
    CsvFull { dir: Option<PathBuf> },
    /// Write chart data from a csv_full report (or the archive) to the output path.
    Graph {
        #[arg(value_name = "CSV_FILE")]
        report: Option<PathBuf>,
    },
}

#[derive(Deserialize, Default)]
struct FileConfig {
    archive_dir: Option<PathBuf>,
    template_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    credentials: Option<PathBuf>,
    base_url: Option<String>,
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("instapaper-stats/config.toml"))
}

/// An explicit `--config` must exist; the default location is optional.
fn load_file_config(explicit_path: Option<&Path>) -> Result<FileConfig> {
    let path = match explicit_path {
        Some(p) if !p.exists() => return Err(eyre!("Config file not found: {}", p.display())),
        Some(p) => p.to_path_buf(),
        None => match default_config_path().filter(|p| p.exists()) {
            Some(p) => p,
            None => return Ok(FileConfig::default()),
        },
    };

    let content = fs::read_to_string(&path)
        .wrap_err_with(|| format!("Failed to read config: {}", path.display()))?;
    let config: FileConfig = toml::from_str(&content)
        .wrap_err_with(|| format!("Failed to parse config: {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("instapaper_stats={}", level))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn build_config(cli: &Cli) -> Result<StatsConfig> {
    let file_cfg = load_file_config(cli.config.as_deref())?;

    let base_url = file_cfg.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
    let base_url =
        Url::parse(base_url).wrap_err_with(|| format!("Invalid base_url: {}", base_url))?;

    Ok(StatsConfig {
        archive_dir: cli
            .archive_dir
            .clone()
            .or(file_cfg.archive_dir)
            .unwrap_or_else(|| PathBuf::from(utils::DEFAULT_ARCHIVE_DIR)),
        template_path: file_cfg
            .template_path
            .unwrap_or_else(|| PathBuf::from(utils::DEFAULT_TEMPLATE_PATH)),
        output_path: file_cfg
            .output_path
            .unwrap_or_else(|| PathBuf::from(utils::DEFAULT_OUTPUT_PATH)),
        credentials: file_cfg.credentials,
        base_url,
        quiet: cli.quiet,
    })
}

fn run(cli: Cli) -> Result<()> {
    let config = build_config(&cli)?;
    let dir_or_default = |dir: Option<PathBuf>| dir.unwrap_or_else(|| config.archive_dir.clone());

    // Buffered so a failing command prints nothing but the error.
    let mut out: Vec<u8> = Vec::new();
    match cli.command {
        Command::Fetch { credentials } => {
            let fetcher = InstapaperFetcher::new(config.base_url.clone())?;
            commands::fetch(
                &config,
                &fetcher,
                credentials.as_deref(),
                utils::today(),
                &mut out,
            )?;
        }
        Command::Info { csv_file } => commands::info(&csv_file, &mut out)?,
        Command::Search { word } => {
            commands::search(&config.archive_dir, &word, &mut out)?;
        }
        Command::Csv { dir } => commands::csv(&dir_or_default(dir), &mut out)?,
        Command::CsvFull { dir } => commands::csv_full(&dir_or_default(dir), &mut out)?,
        Command::Graph { report } => {
            commands::graph(&config, &MustacheRenderer, report.as_deref())?;
        }
    }

    io::stdout()
        .lock()
        .write_all(&out)
        .wrap_err("Failed to write output")
}

fn main() -> ExitCode {
    // Help and unknown commands both exit 1.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
