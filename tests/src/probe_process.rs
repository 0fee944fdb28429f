use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use subrefine_common::config::Config;
use subrefine_core::pipeline::{SkipReason, Stage, StageFlags, StageStatus};
use subrefine_core::probe::ProcessProber;
use subrefine_core::table;

use crate::util::Workspace;

/// Writes one result line to the `-o` file, prints to the console and exits 3.
const PARTIAL_PROBE: &str = r#"#!/bin/sh
out=""
while [ $# -gt 0 ]; do
    if [ "$1" = "-o" ]; then
        out="$2"
        shift
    fi
    shift
done
echo "probing hosts"
printf 'https://admin.example.com [200] [Admin Panel]\n' > "$out"
exit 3
"#;

fn install_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn workspace_with_tool(tool: &str) -> Workspace {
    let mut cfg = Config::default();
    cfg.probe.path = tool.to_string();
    let ws = Workspace::with_config(cfg);
    ws.source("subs.txt", "admin.example.com\n");
    ws
}

#[test]
fn external_tool_runs_and_partial_output_is_kept() {
    let tools = tempfile::tempdir().unwrap();
    let script = install_script(tools.path(), "fake-httpx", PARTIAL_PROBE);

    let ws = workspace_with_tool(&script.display().to_string());
    let prober = ProcessProber::new(ws.cfg.probe.clone());
    let report = ws.run(prober, StageFlags::default());

    assert!(!report.aborted(), "{report:?}");
    assert!(report.completed(Stage::Probe));
    assert!(ws.read(&ws.layout.probe_log).contains("probing hosts"));

    let filtered = table::read_records(&ws.layout.filtered_table).unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].title, "Admin Panel");
}

#[test]
fn unknown_tool_is_a_reported_skip() {
    let ws = workspace_with_tool("subrefine-no-such-probe-tool");
    let prober = ProcessProber::new(ws.cfg.probe.clone());

    let report = ws.run(prober, StageFlags::default());

    assert!(report.aborted());
    match report.status(Stage::Probe) {
        Some(StageStatus::Skipped(SkipReason::ProbeFailed { detail })) => {
            assert!(detail.contains("subrefine-no-such-probe-tool"), "{detail}")
        }
        other => panic!("unexpected probe status {other:?}"),
    }
}
