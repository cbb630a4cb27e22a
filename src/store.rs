//! Dated CSV snapshots on disk.
//!
//! An archive directory holds one `instapaper-YYYY-MM-DD.csv` per fetch day.
//! File names are zero-padded ISO dates, so lexical order is date order.

use crate::entry::{self, Entry};
use crate::error::{Error, Result};
use chrono::NaiveDate;
use regex::Regex;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tempfile::NamedTempFile;

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("static date pattern"));

/// Snapshot files (`.csv`, any case) in `dir`, sorted ascending by file name.
/// A missing directory yields an empty list.
pub fn list(dir: &Path) -> Result<Vec<PathBuf>> {
    let read = match fs::read_dir(dir) {
        Ok(r) => r,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(dir = %dir.display(), "archive directory does not exist");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let mut files = Vec::new();
    for dir_entry in read {
        let path = dir_entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv")) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    tracing::debug!(dir = %dir.display(), count = files.len(), "listed snapshots");
    Ok(files)
}

/// Read every entry from one snapshot. Header rows are skipped; the first
/// malformed row aborts the whole file.
pub fn parse(path: &Path) -> Result<Vec<Entry>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record?;
        if entry::is_header(&record) {
            continue;
        }
        entries.push(Entry::from_record(&record, path)?);
    }
    tracing::debug!(path = %path.display(), entries = entries.len(), "parsed snapshot");
    Ok(entries)
}

/// Calendar date embedded in a snapshot's file name.
pub fn date_of(path: &Path) -> Result<NaiveDate> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .ok_or_else(|| Error::UnrecognizedFilename(path.to_path_buf()))?;
    DATE_RE
        .find(&name)
        .and_then(|m| NaiveDate::parse_from_str(m.as_str(), "%Y-%m-%d").ok())
        .ok_or_else(|| Error::UnrecognizedFilename(path.to_path_buf()))
}

pub fn snapshot_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("instapaper-{}.csv", date.format("%Y-%m-%d")))
}

/// Persist `contents` as the snapshot for `date`, replacing any earlier
/// snapshot from the same day. The file is renamed into place so readers
/// never observe a half-written snapshot.
pub fn write_snapshot(dir: &Path, date: NaiveDate, contents: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let target = snapshot_path(dir, date);

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.flush()?;
    tmp.persist(&target).map_err(|e| Error::Io(e.error))?;

    tracing::info!(path = %target.display(), bytes = contents.len(), "snapshot written");
    Ok(target)
}
