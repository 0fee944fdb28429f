//! Host extraction from CSV asset exports.
//!
//! Columns are chosen by header name (case-insensitive):
//!
//! | category | header names      |
//! |----------|-------------------|
//! | domain   | `域名`, `domain`  |
//! | url      | `url`, `link`     |
//! | host     | `host`            |
//!
//! When none of these exist, an `ip` column paired with a `端口` / `port`
//! column is combined into `ip:port`.

use std::path::Path;

use csv::{ByteRecord, ReaderBuilder};
use subrefine_common::models::HostSet;
use subrefine_common::{RefineError, Result};
use tracing::warn;

use super::url_host;
use crate::lines::decode_lossy;

const DOMAIN_HEADERS: &[&str] = &["域名", "domain"];
const URL_HEADERS: &[&str] = &["url", "link"];
const HOST_HEADERS: &[&str] = &["host"];
const IP_HEADERS: &[&str] = &["ip"];
const PORT_HEADERS: &[&str] = &["端口", "port"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Domain,
    Url,
    Host,
}

/// Which cells of each row produce hosts.
#[derive(Debug, Default, PartialEq, Eq)]
struct ColumnPlan {
    columns: Vec<(usize, Column)>,
    ip_port: Option<(usize, usize)>,
}

impl ColumnPlan {
    fn from_headers(headers: &[String]) -> Self {
        let mut plan = ColumnPlan::default();
        for (idx, name) in headers.iter().enumerate() {
            let name = name.as_str();
            if DOMAIN_HEADERS.contains(&name) {
                plan.columns.push((idx, Column::Domain));
            } else if URL_HEADERS.contains(&name) {
                plan.columns.push((idx, Column::Url));
            } else if HOST_HEADERS.contains(&name) {
                plan.columns.push((idx, Column::Host));
            }
        }

        if plan.columns.is_empty() {
            let find = |names: &[&str]| headers.iter().position(|h| names.contains(&h.as_str()));
            if let (Some(ip), Some(port)) = (find(IP_HEADERS), find(PORT_HEADERS)) {
                plan.ip_port = Some((ip, port));
            }
        }
        plan
    }

    fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.ip_port.is_none()
    }

    fn hosts_in(&self, row: &[String], strip_443: bool, out: &mut HostSet) {
        for &(idx, column) in &self.columns {
            let Some(value) = cell(row, idx) else {
                continue;
            };
            let host = match column {
                Column::Url => url_host::to_host(value, strip_443),
                Column::Domain | Column::Host => host_from_cell(value, strip_443),
            };
            if let Some(host) = host {
                out.insert(host);
            }
        }

        if let Some((ip_idx, port_idx)) = self.ip_port
            && let (Some(ip), Some(port)) = (cell(row, ip_idx), cell(row, port_idx))
        {
            out.insert(format!("{ip}:{port}"));
        }
    }
}

/// Reads a CSV export with a header row. Rows may have any number of fields.
pub fn read_hosts(path: &Path, strip_443: bool) -> Result<HostSet> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| RefineError::table(path, e))?;

    let headers: Vec<String> = reader
        .byte_headers()
        .map_err(|e| RefineError::table(path, e))?
        .iter()
        .map(normalize_header)
        .collect();

    let plan = ColumnPlan::from_headers(&headers);
    let mut hosts = HostSet::new();
    if plan.is_empty() {
        warn!("No host-bearing columns in {}", path.display());
        return Ok(hosts);
    }

    let mut record = ByteRecord::new();
    while reader
        .read_byte_record(&mut record)
        .map_err(|e| RefineError::table(path, e))?
    {
        let row: Vec<String> = record.iter().map(|f| decode_lossy(f).into_owned()).collect();
        plan.hosts_in(&row, strip_443, &mut hosts);
    }
    Ok(hosts)
}

fn normalize_header(raw: &[u8]) -> String {
    decode_lossy(raw)
        .trim_start_matches('\u{feff}')
        .trim()
        .to_lowercase()
}

fn cell(row: &[String], idx: usize) -> Option<&str> {
    row.get(idx).map(|value| value.trim()).filter(|value| !value.is_empty())
}

/// Domain and host cells are used as-is unless they carry URL parts
/// (scheme, port or path).
fn host_from_cell(value: &str, strip_443: bool) -> Option<String> {
    if looks_like_url(value) {
        url_host::to_host(value, strip_443)
    } else {
        Some(value.to_string())
    }
}

fn looks_like_url(value: &str) -> bool {
    url_host::has_http_scheme(value) || value.contains([':', '/'])
}
