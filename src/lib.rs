//! # instapaper-stats
//!
//! Keep a dated archive of your [Instapaper](https://www.instapaper.com) reading list
//! and see how it changes over time.
//!
//! ## What it does
//!
//! Instapaper lets you download your whole reading list as a CSV file
//! (`URL,Title,Summary,Folder`). This tool logs in, downloads that export and saves it as
//! `backup/instapaper-YYYY-MM-DD.csv`. Run it once a day and the archive becomes a
//! history of your reading habits.
//!
//! From the archive it can:
//!
//! - count items per folder in a single snapshot (`info`),
//! - search every snapshot by title or url, reporting each article once (`search`),
//! - print the Unread / Archive / Starred counts of the latest or of every snapshot as CSV
//!   (`csv`, `csv_full`),
//! - fill a mustache template with the same numbers to draw a chart (`graph`).
//!
//! Nothing is cached: every command re-reads the CSV files on disk.
//!
//! ## Usage
//!
//! ```sh
//! # Save today's export (credentials file holds `user|password`)
//! instapaper-stats fetch ~/.instapaper-credentials
//!
//! # Folder counts over time
//! instapaper-stats csv_full backup > stats.csv
//! instapaper-stats graph stats.csv
//! ```
//!
//! Paths can be persisted in `~/.config/instapaper-stats/config.toml`.

pub mod aggregate;
pub mod commands;
pub mod entry;
pub mod error;
pub mod fetcher;
pub mod renderer;
pub mod report;
pub mod search;
pub mod store;
pub mod utils;

pub use error::{Error, Result};
