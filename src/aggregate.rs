use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::store;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::path::Path;

/// Folders that get a fixed column in reports, in column order.
pub const KNOWN_FOLDERS: [&str; 3] = ["Unread", "Archive", "Starred"];

/// Per-folder tally of one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderCounts {
    pub total: usize,
    pub by_folder: BTreeMap<String, usize>,
}

impl FolderCounts {
    pub fn get(&self, folder: &str) -> usize {
        self.by_folder.get(folder).copied().unwrap_or(0)
    }

    /// Project onto the fixed report schema. Folders outside
    /// [`KNOWN_FOLDERS`] stay in `total` only.
    pub fn row(&self, date: NaiveDate) -> SeriesRow {
        SeriesRow {
            date,
            total: self.total,
            unread: self.get(KNOWN_FOLDERS[0]),
            archive: self.get(KNOWN_FOLDERS[1]),
            starred: self.get(KNOWN_FOLDERS[2]),
        }
    }

    /// Folders counted in `total` that no report column shows.
    pub fn unreported(&self) -> impl Iterator<Item = &str> {
        self.by_folder
            .keys()
            .map(String::as_str)
            .filter(|f| !KNOWN_FOLDERS.contains(f))
    }
}

/// One line of the time series: a snapshot date and its counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesRow {
    pub date: NaiveDate,
    pub total: usize,
    pub unread: usize,
    pub archive: usize,
    pub starred: usize,
}

pub fn aggregate_one(entries: &[Entry]) -> FolderCounts {
    let mut counts = FolderCounts::default();
    for entry in entries {
        counts.total += 1;
        *counts.by_folder.entry(entry.folder.clone()).or_insert(0) += 1;
    }
    counts
}

fn row_for(path: &Path) -> Result<SeriesRow> {
    let date = store::date_of(path)?;
    let counts = aggregate_one(&store::parse(path)?);
    for folder in counts.unreported() {
        tracing::warn!(%folder, %date, "folder has no report column");
    }
    Ok(counts.row(date))
}

/// One row per snapshot in `dir`, ascending by date.
pub fn series(dir: &Path) -> Result<Vec<SeriesRow>> {
    let files = store::list(dir)?;
    if files.is_empty() {
        return Err(Error::EmptyArchive(dir.to_path_buf()));
    }
    files.iter().map(|f| row_for(f)).collect()
}

/// Row for the most recent snapshot in `dir`.
pub fn latest(dir: &Path) -> Result<SeriesRow> {
    let files = store::list(dir)?;
    let last = files
        .last()
        .ok_or_else(|| Error::EmptyArchive(dir.to_path_buf()))?;
    row_for(last)
}
