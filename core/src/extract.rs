//! # Host Extractor
//!
//! Collects bare `host` / `host:port` entries from every regular file directly
//! inside a source directory:
//!
//! * `*.csv` files are read through [`csv_source`], picking domain, URL and
//!   host columns by header name.
//! * anything else is treated as one entry per line by [`text_source`].
//!
//! Results from all files are merged into one [`HostSet`]. A file that cannot
//! be read contributes nothing; the failure is logged and the run goes on.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use subrefine_common::models::HostSet;
use subrefine_common::{RefineError, Result};
use tracing::{debug, error, info};

pub mod csv_source;
pub mod text_source;
pub mod url_host;

pub use url_host::to_host;

/// How a source file is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Csv,
    Text,
}

impl SourceKind {
    pub fn of(path: &Path) -> Self {
        let is_csv = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(".csv"));
        if is_csv { Self::Csv } else { Self::Text }
    }
}

/// Extracts the unique hosts of every file directly under `dir` (no recursion).
pub fn extract(dir: &Path, strip_443: bool) -> Result<HostSet> {
    extract_with(dir, strip_443, read_source)
}

fn read_source(kind: SourceKind, path: &Path, strip_443: bool) -> Result<HostSet> {
    match kind {
        SourceKind::Csv => csv_source::read_hosts(path, strip_443),
        SourceKind::Text => text_source::read_hosts(path, strip_443),
    }
}

fn extract_with<F>(dir: &Path, strip_443: bool, read: F) -> Result<HostSet>
where
    F: Fn(SourceKind, &Path, bool) -> Result<HostSet>,
{
    if !dir.is_dir() {
        return Err(RefineError::missing("source directory", dir));
    }

    let mut hosts = HostSet::new();
    for path in source_files(dir)? {
        let kind = SourceKind::of(&path);
        info!("Processing {}", path.display());

        match read(kind, &path, strip_443) {
            Ok(found) => {
                debug!("{} hosts found in {}", found.len(), path.display());
                hosts.absorb(found);
            }
            Err(e) => error!("Skipping {}: {e}", path.display()),
        }
    }
    Ok(hosts)
}

/// Writes one host per line in ascending order, creating parent directories.
pub fn write_hosts(hosts: &HostSet, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| RefineError::io(parent, e))?;
    }

    let file = File::create(path).map_err(|e| RefineError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    for host in hosts.iter() {
        writeln!(writer, "{host}").map_err(|e| RefineError::io(path, e))?;
    }
    writer.flush().map_err(|e| RefineError::io(path, e))
}

/// Regular files directly inside `dir`, sorted by name for stable logs.
fn source_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| RefineError::io(dir, e))?;

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in entries {
        match entry {
            Ok(entry) if entry.path().is_file() => files.push(entry.path()),
            Ok(_) => {}
            Err(e) => error!("Cannot read entry in {}: {e}", dir.display()),
        }
    }
    files.sort();
    Ok(files)
}
