//! One function per CLI command. Output goes to the supplied writer so a
//! failing command never leaves half a report on stdout.

use crate::aggregate;
use crate::error::Result;
use crate::fetcher::{self, Credentials, Fetcher};
use crate::renderer::{self, ChartData, TemplateRenderer};
use crate::report;
use crate::search;
use crate::store;
use crate::utils::StatsConfig;
use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Download today's export and archive it.
pub fn fetch(
    config: &StatsConfig,
    fetcher: &dyn Fetcher,
    credentials: Option<&Path>,
    date: NaiveDate,
    out: &mut dyn Write,
) -> Result<PathBuf> {
    let credentials = Credentials::from_file(credentials.or(config.credentials.as_deref()))?;

    let spinner = if config.quiet {
        ProgressBar::hidden()
    } else {
        let s = ProgressBar::new_spinner();
        s.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg}")
                .expect("static spinner template")
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        s.set_message(format!("Fetching export for {}...", credentials.username));
        s.enable_steady_tick(Duration::from_millis(80));
        s
    };
    let saved = fetcher::archive(fetcher, &credentials, &config.archive_dir, date);
    spinner.finish_and_clear();
    let saved = saved?;

    let name = saved
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    writeln!(out, "saved to '{}'.", name)?;
    Ok(saved)
}

/// Item count and per-folder breakdown of one snapshot.
pub fn info(csv_file: &Path, out: &mut dyn Write) -> Result<()> {
    let counts = aggregate::aggregate_one(&store::parse(csv_file)?);
    writeln!(
        out,
        "{} items in {} folders.",
        counts.total,
        counts.by_folder.len()
    )?;
    for (folder, n) in &counts.by_folder {
        writeln!(out, "{:>7}: {:>3} items", folder, n)?;
    }
    Ok(())
}

pub fn search(dir: &Path, pattern: &str, out: &mut dyn Write) -> Result<usize> {
    let mut hits = 0;
    for hit in search::search(dir, pattern)? {
        let hit = hit?;
        writeln!(out, "{}\n  {}", hit.title, hit.url)?;
        hits += 1;
    }
    tracing::debug!(hits, "search finished");
    Ok(hits)
}

/// Latest snapshot as a single report row.
pub fn csv(dir: &Path, out: &mut dyn Write) -> Result<()> {
    let row = aggregate::latest(dir)?;
    writeln!(out, "{}", report::format_row(&row))?;
    Ok(())
}

/// Every snapshot as a report with header.
pub fn csv_full(dir: &Path, out: &mut dyn Write) -> Result<()> {
    for line in report::full(&aggregate::series(dir)?) {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

/// Render the chart script from a saved `csv_full` report, or straight from
/// the archive when no report is given.
pub fn graph(
    config: &StatsConfig,
    renderer: &dyn TemplateRenderer,
    report_file: Option<&Path>,
) -> Result<()> {
    let (rows, source) = match report_file {
        Some(path) => (report::read_series(path)?, path),
        None => (
            aggregate::series(&config.archive_dir)?,
            config.archive_dir.as_path(),
        ),
    };
    let data = ChartData::from_series(&rows, source)?;
    renderer::render_to_file(renderer, &config.template_path, &config.output_path, &data)
}
