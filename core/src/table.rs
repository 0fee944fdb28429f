//! Tabular (CSV) form of probe records.
//!
//! Columns are `url, status_codes, title`, plus `redirect_url` when at least
//! one record carries a redirect. Rows without a redirect stop after `title`.

use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use subrefine_common::models::{ProbeRecord, StatusCodes};
use subrefine_common::{RefineError, Result};
use tracing::warn;

pub const URL_COLUMN: &str = "url";
pub const STATUS_COLUMN: &str = "status_codes";
pub const TITLE_COLUMN: &str = "title";
pub const REDIRECT_COLUMN: &str = "redirect_url";

/// Header row for `records`.
pub fn header_for(records: &[ProbeRecord]) -> Vec<&'static str> {
    let mut header = vec![URL_COLUMN, STATUS_COLUMN, TITLE_COLUMN];
    if records.iter().any(ProbeRecord::has_redirect) {
        header.push(REDIRECT_COLUMN);
    }
    header
}

fn row_for(record: &ProbeRecord, with_redirect: bool) -> Vec<String> {
    let mut row = vec![
        record.url.clone(),
        record.status_codes.to_string(),
        record.title.clone(),
    ];
    if with_redirect && let Some(redirect) = record.redirect() {
        row.push(redirect.to_string());
    }
    row
}

/// Writes `records` to `path`, creating parent directories. Returns the row count.
pub fn write_records(path: &Path, records: &[ProbeRecord]) -> Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| RefineError::io(parent, e))?;
    }

    let mut writer = WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| RefineError::table(path, e))?;

    let header = header_for(records);
    let with_redirect = header.len() > 3;
    writer
        .write_record(&header)
        .map_err(|e| RefineError::table(path, e))?;
    for record in records {
        writer
            .write_record(row_for(record, with_redirect))
            .map_err(|e| RefineError::table(path, e))?;
    }
    writer.flush().map_err(|e| RefineError::io(path, e))?;
    Ok(records.len())
}

/// Column positions, found by name with positional fallbacks.
struct Columns {
    url: usize,
    status: usize,
    title: usize,
    redirect: Option<usize>,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Self {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        Self {
            url: find(URL_COLUMN).unwrap_or(0),
            status: find(STATUS_COLUMN).unwrap_or(1),
            title: find(TITLE_COLUMN).unwrap_or(2),
            redirect: find(REDIRECT_COLUMN),
        }
    }
}

/// Reads a table written by [`write_records`]. Rows too short to hold a title
/// are logged and skipped.
pub fn read_records(path: &Path) -> Result<Vec<ProbeRecord>> {
    if !path.is_file() {
        return Err(RefineError::missing("probe table", path));
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| RefineError::table(path, e))?;
    let columns = Columns::locate(reader.headers().map_err(|e| RefineError::table(path, e))?);

    let mut records = Vec::new();
    for (idx, row) in reader.records().enumerate() {
        let row = row.map_err(|e| RefineError::table(path, e))?;
        let field = |i: usize| row.get(i);

        let (Some(url), Some(status), Some(title)) =
            (field(columns.url), field(columns.status), field(columns.title))
        else {
            warn!("Incomplete row {} in {}, skipping", idx + 2, path.display());
            continue;
        };
        if url.is_empty() {
            continue;
        }

        let redirect = columns.redirect.and_then(field).map(String::from);
        records.push(ProbeRecord::new(url, StatusCodes::from_joined(status), title, redirect));
    }
    Ok(records)
}
