use crate::error::{Error, Result};
use csv::StringRecord;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Column names of an Instapaper CSV export, in file order.
pub const HEADER: [&str; 4] = ["URL", "Title", "Summary", "Folder"];

/// One bookmarked article as it appears in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub url: String,
    pub title: String,
    pub summary: String,
    pub folder: String,
}

impl Entry {
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        summary: impl Into<String>,
        folder: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            summary: summary.into(),
            folder: folder.into(),
        }
    }

    /// Build an entry from a raw CSV row read out of `path`.
    /// Rows must have exactly four fields.
    pub fn from_record(record: &StringRecord, path: &Path) -> Result<Self> {
        if record.len() != HEADER.len() {
            return Err(Error::MalformedRecord {
                path: path.to_path_buf(),
                line: record.position().map(|p| p.line()).unwrap_or(0),
                fields: record.len(),
            });
        }
        Ok(Self::new(&record[0], &record[1], &record[2], &record[3]))
    }

    /// Fields in export column order.
    pub fn to_record(&self) -> [&str; 4] {
        [&self.url, &self.title, &self.summary, &self.folder]
    }

    /// Deduplication key: hex SHA-256 of the url.
    /// Two entries with the same url share an identity whatever their folder.
    pub fn identity(&self) -> String {
        identity_of(&self.url)
    }
}

pub fn identity_of(url: &str) -> String {
    format!("{:x}", Sha256::digest(url.as_bytes()))
}

/// True for the `URL,Title,Summary,Folder` header row.
pub fn is_header(record: &StringRecord) -> bool {
    record.get(0) == Some(HEADER[0])
}
