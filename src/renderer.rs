//! Shape a time series for the chart template and render it.

use crate::aggregate::SeriesRow;
use crate::error::{Error, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Headroom added above the highest value so the top line is not clipped.
const AXIS_PADDING: usize = 5;

/// Values handed to the chart template.
///
/// `categories` is a comma-joined list of quoted `"MM/DD"` labels and the
/// `*_data` fields are JSON arrays, so the template can drop them straight
/// into a script with triple-mustache tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartData {
    pub max: usize,
    pub categories: String,
    pub total_data: String,
    pub unread_data: String,
    pub archive_data: String,
    pub starred_data: String,
}

impl ChartData {
    pub fn from_series(rows: &[SeriesRow], source: &Path) -> Result<Self> {
        if rows.is_empty() {
            return Err(Error::EmptyArchive(source.to_path_buf()));
        }

        let column = |f: fn(&SeriesRow) -> usize| rows.iter().map(f).collect::<Vec<_>>();
        let total = column(|r| r.total);
        let unread = column(|r| r.unread);
        let archive = column(|r| r.archive);
        let starred = column(|r| r.starred);

        let max = [&total, &unread, &archive, &starred]
            .iter()
            .flat_map(|s| s.iter().copied())
            .max()
            .unwrap_or(0)
            + AXIS_PADDING;

        let categories = rows
            .iter()
            .map(|r| format!("\"{}\"", r.date.format("%m/%d")))
            .collect::<Vec<_>>()
            .join(",");

        Ok(Self {
            max,
            categories,
            total_data: json_array(&total),
            unread_data: json_array(&unread),
            archive_data: json_array(&archive),
            starred_data: json_array(&starred),
        })
    }
}

fn json_array(values: &[usize]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

/// Turns a template plus chart data into the final artifact.
pub trait TemplateRenderer {
    fn render(&self, template: &str, data: &ChartData) -> Result<String>;
}

pub struct MustacheRenderer;

impl TemplateRenderer for MustacheRenderer {
    fn render(&self, template: &str, data: &ChartData) -> Result<String> {
        let compiled = mustache::compile_str(template)?;
        let mut out = Vec::new();
        compiled.render(&mut out, data)?;
        String::from_utf8(out).map_err(|e| {
            Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }
}

/// Render `template_path` with `data` and write the result to `output_path`.
pub fn render_to_file(
    renderer: &dyn TemplateRenderer,
    template_path: &Path,
    output_path: &Path,
    data: &ChartData,
) -> Result<()> {
    let template = fs::read_to_string(template_path)?;
    let rendered = renderer.render(&template, data)?;
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(output_path, rendered)?;
    tracing::info!(output = %output_path.display(), "chart data written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn rows() -> Vec<SeriesRow> {
        vec![
            SeriesRow {
                date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
                total: 2,
                unread: 2,
                archive: 0,
                starred: 0,
            },
            SeriesRow {
                date: NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(),
                total: 12,
                unread: 1,
                archive: 11,
                starred: 0,
            },
        ]
    }

    #[test]
    fn shapes_series_for_template() {
        let data = ChartData::from_series(&rows(), Path::new("x")).unwrap();
        assert_eq!(data.max, 17);
        assert_eq!(data.categories, "\"01/01\",\"01/02\"");
        assert_eq!(data.total_data, "[2,12]");
        assert_eq!(data.unread_data, "[2,1]");
        assert_eq!(data.archive_data, "[0,11]");
        assert_eq!(data.starred_data, "[0,0]");
    }

    #[test]
    fn empty_series_is_rejected() {
        assert!(matches!(
            ChartData::from_series(&[], Path::new("x")),
            Err(Error::EmptyArchive(_))
        ));
    }

    #[test]
    fn mustache_fills_fields() {
        let data = ChartData::from_series(&rows(), Path::new("x")).unwrap();
        let out = MustacheRenderer
            .render("max={{max}} cats=[{{{categories}}}] total={{{total_data}}}", &data)
            .unwrap();
        assert_eq!(out, "max=17 cats=[\"01/01\",\"01/02\"] total=[2,12]");
    }

    #[test]
    fn render_to_file_creates_output_dir() {
        let tmp = TempDir::new().unwrap();
        let template = tmp.path().join("app.mustache");
        fs::write(&template, "var max = {{max}};").unwrap();
        let output = tmp.path().join("html").join("app.js");

        let data = ChartData::from_series(&rows(), Path::new("x")).unwrap();
        render_to_file(&MustacheRenderer, &template, &output, &data).unwrap();
        assert_eq!(fs::read_to_string(output).unwrap(), "var max = 17;");
    }
}
