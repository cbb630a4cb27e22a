//! Regex search across every archived snapshot.
//!
//! Each bookmark is reported at most once per search, keyed by its url
//! identity. The first snapshot (in name order) that contains a match wins,
//! so a hit shows the title the article had at that point.

use crate::entry::Entry;
use crate::error::Result;
use crate::store;
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::vec;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub title: String,
    pub url: String,
}

/// Lazily walks the archive, parsing one snapshot at a time.
pub struct Search {
    pattern: Regex,
    files: vec::IntoIter<PathBuf>,
    current: vec::IntoIter<Entry>,
    seen: HashSet<String>,
}

/// Case-insensitive search of titles and urls in all snapshots of `dir`.
pub fn search(dir: &Path, pattern: &str) -> Result<Search> {
    let pattern = RegexBuilder::new(pattern).case_insensitive(true).build()?;
    Ok(Search {
        pattern,
        files: store::list(dir)?.into_iter(),
        current: Vec::new().into_iter(),
        seen: HashSet::new(),
    })
}

impl Iterator for Search {
    type Item = Result<Hit>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            for entry in self.current.by_ref() {
                if !self.pattern.is_match(&entry.title) && !self.pattern.is_match(&entry.url) {
                    continue;
                }
                if self.seen.insert(entry.identity()) {
                    return Some(Ok(Hit {
                        title: entry.title,
                        url: entry.url,
                    }));
                }
            }

            let file = self.files.next()?;
            match store::parse(&file) {
                Ok(entries) => self.current = entries.into_iter(),
                Err(e) => {
                    self.files = Vec::new().into_iter();
                    return Some(Err(e));
                }
            }
        }
    }
}
