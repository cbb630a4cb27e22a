use chrono::NaiveDate;
use instapaper_stats::commands;
use instapaper_stats::fetcher::{Credentials, DEFAULT_BASE_URL, Fetcher};
use instapaper_stats::renderer::MustacheRenderer;
use instapaper_stats::utils::StatsConfig;
use instapaper_stats::{Error, Result};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use url::Url;

/// Hands back a different export on every call, like a reading list that
/// changes between days.
struct DailyExports(std::cell::RefCell<Vec<&'static str>>);

impl Fetcher for DailyExports {
    fn fetch(&self, _: &Credentials) -> Result<String> {
        Ok(self.0.borrow_mut().remove(0).to_string())
    }
}

fn config(root: &Path) -> StatsConfig {
    StatsConfig {
        archive_dir: root.join("backup"),
        template_path: Path::new(env!("CARGO_MANIFEST_DIR")).join("html/app.mustache"),
        output_path: root.join("html/app.js"),
        credentials: Some(root.join("credentials")),
        base_url: Url::parse(DEFAULT_BASE_URL).unwrap(),
        quiet: true,
    }
}

fn output(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
    let mut out: Vec<u8> = Vec::new();
    f(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn fetch_over_several_days_then_report_and_chart() {
    let tmp = TempDir::new().unwrap();
    let cfg = config(tmp.path());
    fs::write(cfg.credentials.as_ref().unwrap(), "alice|secret").unwrap();

    let fetcher = DailyExports(std::cell::RefCell::new(vec![
        "URL,Title,Summary,Folder\nhttp://a,Alpha,,Unread\nhttp://b,Beta,,Unread\n",
        "URL,Title,Summary,Folder\nhttp://a,Alpha,,Archive\nhttp://b,Beta,,Unread\nhttp://c,Gamma,,Starred\nhttp://d,Delta,,Kindle\n",
    ]));

    for day in [1, 2] {
        let date = NaiveDate::from_ymd_opt(2023, 1, day).unwrap();
        commands::fetch(&cfg, &fetcher, None, date, &mut std::io::sink()).unwrap();
    }

    assert_eq!(
        output(|o| commands::csv_full(&cfg.archive_dir, o)),
        "Date,Total,Unread,Archive,Starred\n2023-01-01,2,2,0,0\n2023-01-02,4,1,1,1\n"
    );
    assert_eq!(
        output(|o| commands::csv(&cfg.archive_dir, o)),
        "2023-01-02,4,1,1,1\n"
    );

    let hits = output(|o| commands::search(&cfg.archive_dir, "a$", o).map(|_| ()));
    assert_eq!(
        hits,
        "Alpha\n  http://a\nBeta\n  http://b\nGamma\n  http://c\nDelta\n  http://d\n"
    );

    commands::graph(&cfg, &MustacheRenderer, None).unwrap();
    let chart = fs::read_to_string(&cfg.output_path).unwrap();
    assert!(chart.contains(r#"categories: ["01/01","01/02"]"#));
    assert!(chart.contains("max: 9,"));
    assert!(chart.contains("data: [2,4]"));
    assert!(chart.contains("data: [0,1]"));
}

#[test]
fn same_day_fetch_replaces_snapshot() {
    let tmp = TempDir::new().unwrap();
    let cfg = config(tmp.path());
    fs::write(cfg.credentials.as_ref().unwrap(), "alice|secret\n").unwrap();
    let fetcher = DailyExports(std::cell::RefCell::new(vec![
        "URL,Title,Summary,Folder\nhttp://a,Alpha,,Unread\n",
        "URL,Title,Summary,Folder\nhttp://x,Foo,,Unread\n",
    ]));
    let date = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();

    commands::fetch(&cfg, &fetcher, None, date, &mut std::io::sink()).unwrap();
    let saved = commands::fetch(&cfg, &fetcher, None, date, &mut std::io::sink()).unwrap();

    assert_eq!(
        fs::read_to_string(saved).unwrap(),
        "URL,Title,Summary,Folder\nhttp://x,Foo,,Unread\n"
    );
    assert_eq!(fs::read_dir(&cfg.archive_dir).unwrap().count(), 1);
}

#[test]
fn malformed_snapshot_aborts_report() {
    let tmp = TempDir::new().unwrap();
    let cfg = config(tmp.path());
    fs::create_dir_all(&cfg.archive_dir).unwrap();
    fs::write(cfg.archive_dir.join("instapaper-2023-01-01.csv"), "http://a,A,,Unread\n").unwrap();
    fs::write(cfg.archive_dir.join("instapaper-2023-01-02.csv"), "http://a,A\n").unwrap();

    let mut out: Vec<u8> = Vec::new();
    let err = commands::csv_full(&cfg.archive_dir, &mut out).unwrap_err();
    assert!(matches!(err, Error::MalformedRecord { .. }));
    assert!(out.is_empty());
}

#[test]
fn undated_snapshot_name_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let cfg = config(tmp.path());
    fs::create_dir_all(&cfg.archive_dir).unwrap();
    fs::write(cfg.archive_dir.join("latest.csv"), "http://a,A,,Unread\n").unwrap();

    let err = commands::csv(&cfg.archive_dir, &mut std::io::sink()).unwrap_err();
    assert!(matches!(err, Error::UnrecognizedFilename(_)));
}
