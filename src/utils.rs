use chrono::{Local, NaiveDate};
use std::path::PathBuf;
use url::Url;

/// Paths and endpoints every command needs.
/// This decouples the logic from how the arguments were parsed (CLI/Config file).
#[derive(Clone, Debug)]
pub struct StatsConfig {
    pub archive_dir: PathBuf,
    pub template_path: PathBuf,
    pub output_path: PathBuf,
    pub credentials: Option<PathBuf>,
    pub base_url: Url,
    pub quiet: bool,
}

pub const DEFAULT_ARCHIVE_DIR: &str = "backup";
pub const DEFAULT_TEMPLATE_PATH: &str = "html/app.mustache";
pub const DEFAULT_OUTPUT_PATH: &str = "html/app.js";

/// Local calendar date used to name a new snapshot.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
