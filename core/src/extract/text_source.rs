use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use subrefine_common::models::HostSet;
use subrefine_common::{RefineError, Result};

use super::url_host;
use crate::lines;

/// Header line some subdomain exports carry; never a host.
pub const HEADER_SENTINEL: &str = "子域名";

/// Reads one entry per line. Lines that do not reduce to a host through
/// [`url_host::to_host`] are kept verbatim.
pub fn read_hosts(path: &Path, strip_443: bool) -> Result<HostSet> {
    let file = File::open(path).map_err(|e| RefineError::io(path, e))?;

    let mut hosts = HostSet::new();
    for line in lines::lossy_lines(BufReader::new(file)) {
        let line = line.map_err(|e| RefineError::io(path, e))?;
        if let Some(host) = host_from_line(&line, strip_443) {
            hosts.insert(host);
        }
    }
    Ok(hosts)
}

fn host_from_line(line: &str, strip_443: bool) -> Option<String> {
    let line = line.trim();
    if line.is_empty() || line == HEADER_SENTINEL {
        return None;
    }
    Some(url_host::to_host(line, strip_443).unwrap_or_else(|| line.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_header_lines_are_skipped() {
        assert_eq!(host_from_line("   ", true), None);
        assert_eq!(host_from_line("子域名", true), None);
    }

    #[test]
    fn urls_are_reduced_and_junk_kept_verbatim() {
        assert_eq!(host_from_line("https://a.com:443/x", true).as_deref(), Some("a.com"));
        assert_eq!(host_from_line("odd entry here", true).as_deref(), Some("odd entry here"));
    }

    #[test]
    fn duplicate_lines_collapse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subs.txt");
        std::fs::write(&path, "a.com\nhttp://a.com\nhttps://a.com:443\n").unwrap();

        let hosts = read_hosts(&path, true).unwrap();
        assert_eq!(hosts.iter().collect::<Vec<_>>(), vec!["a.com"]);
    }
}
