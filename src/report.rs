use crate::aggregate::{KNOWN_FOLDERS, SeriesRow};
use crate::error::{Error, Result};
use chrono::NaiveDate;
use std::path::Path;

pub fn header() -> String {
    format!("Date,Total,{}", KNOWN_FOLDERS.join(","))
}

pub fn format_row(row: &SeriesRow) -> String {
    format!(
        "{},{},{},{},{}",
        row.date.format("%Y-%m-%d"),
        row.total,
        row.unread,
        row.archive,
        row.starred
    )
}

/// The `csv_full` report: header plus one line per snapshot.
pub fn full(rows: &[SeriesRow]) -> Vec<String> {
    std::iter::once(header())
        .chain(rows.iter().map(format_row))
        .collect()
}

/// Read back a report written by `csv_full`. The header line is optional.
pub fn read_series(path: &Path) -> Result<Vec<SeriesRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        if record.get(0) == Some("Date") {
            continue;
        }
        if record.len() != 5 {
            return Err(Error::MalformedReport {
                line,
                reason: format!("expected 5 columns, found {}", record.len()),
            });
        }
        let date = NaiveDate::parse_from_str(&record[0], "%Y-%m-%d").map_err(|e| {
            Error::MalformedReport {
                line,
                reason: format!("bad date {:?}: {}", &record[0], e),
            }
        })?;
        let mut counts = [0usize; 4];
        for (slot, field) in counts.iter_mut().zip(record.iter().skip(1)) {
            *slot = field.trim().parse().map_err(|_| Error::MalformedReport {
                line,
                reason: format!("bad count {:?}", field),
            })?;
        }
        rows.push(SeriesRow {
            date,
            total: counts[0],
            unread: counts[1],
            archive: counts[2],
            starred: counts[3],
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn row(y: i32, m: u32, d: u32, counts: [usize; 4]) -> SeriesRow {
        SeriesRow {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            total: counts[0],
            unread: counts[1],
            archive: counts[2],
            starred: counts[3],
        }
    }

    #[test]
    fn full_report_layout() {
        let lines = full(&[
            row(2023, 1, 1, [2, 2, 0, 0]),
            row(2023, 1, 2, [2, 1, 1, 0]),
        ]);
        assert_eq!(
            lines,
            [
                "Date,Total,Unread,Archive,Starred",
                "2023-01-01,2,2,0,0",
                "2023-01-02,2,1,1,0"
            ]
        );
    }

    #[test]
    fn reads_report_written_by_full() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("stats.csv");
        let rows = vec![row(2023, 1, 1, [2, 2, 0, 0]), row(2023, 2, 9, [5, 3, 1, 1])];
        fs::write(&path, full(&rows).join("\n") + "\n").unwrap();
        assert_eq!(read_series(&path).unwrap(), rows);
    }

    #[test]
    fn rejects_bad_rows() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("stats.csv");

        fs::write(&path, "2023-01-01,2,2\n").unwrap();
        assert!(matches!(read_series(&path), Err(Error::MalformedReport { line: 1, .. })));

        fs::write(&path, "Date,Total,Unread,Archive,Starred\n01/02,1,1,0,0\n").unwrap();
        assert!(matches!(read_series(&path), Err(Error::MalformedReport { line: 2, .. })));

        fs::write(&path, "2023-01-01,two,2,0,0\n").unwrap();
        assert!(read_series(&path).is_err());
    }
}
