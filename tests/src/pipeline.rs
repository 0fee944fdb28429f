use std::fs;

use subrefine_common::config::{Config, ListSetting};
use subrefine_common::models::{ProbeRecord, StatusCodes};
use subrefine_core::pipeline::{SkipReason, Stage, StageFlags, StageStatus};
use subrefine_core::table;

use crate::util::{FakeProber, Workspace};

const PROBE_OUTPUT: &str = "\
https://admin.example.com [200] [Admin Login] [https://admin.example.com/login]
https://www.example.com [301] [Moved]
\x1b[1mhttps://api.example.com:8080\x1b[0m [\x1b[32m200\x1b[0m] [Dashboard]
garbage line
https://cdn.example.com
";

fn skipped(reason: SkipReason) -> Option<StageStatus> {
    Some(StageStatus::Skipped(reason))
}

fn seeded() -> Workspace {
    let ws = Workspace::new();
    ws.source("subs.csv", "domain,ip\nadmin.example.com,1.1.1.1\nwww.example.com,1.1.1.2\n");
    ws.source("links.txt", "子域名\nhttp://api.example.com:8080/x\nhttps://cdn.example.com:443\n");
    ws
}

#[test]
fn full_run_keeps_login_pages() {
    let ws = seeded();
    let prober = FakeProber::writing(PROBE_OUTPUT);

    let report = ws.run(&prober, StageFlags::default());

    assert!(!report.aborted(), "{report:?}");
    for stage in Stage::ALL {
        assert!(report.completed(stage), "{stage} did not complete: {report:?}");
    }
    assert_eq!(
        ws.read(&ws.layout.host_file),
        "admin.example.com\napi.example.com:8080\ncdn.example.com\nwww.example.com\n"
    );

    let processed = table::read_records(&ws.layout.processed_table).unwrap();
    assert_eq!(processed.len(), 4);
    assert_eq!(processed[2].url, "https://api.example.com:8080");
    assert_eq!(processed[2].status_codes.to_string(), "200");
    assert!(processed[3].status_codes.is_unknown());

    assert_eq!(
        ws.read(&ws.layout.filtered_table),
        "url,status_codes,title,redirect_url\n\
         https://admin.example.com,200,Admin Login,https://admin.example.com/login\n"
    );
}

#[test]
fn probe_job_uses_layout_paths() {
    let ws = seeded();
    let prober = FakeProber::writing(PROBE_OUTPUT);

    ws.run(&prober, StageFlags::default());

    let jobs = prober.jobs.borrow();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].input, ws.layout.host_file);
    assert_eq!(jobs[0].output, ws.layout.artifact);
    assert_eq!(jobs[0].log_file.as_ref(), Some(&ws.layout.probe_log));
}

#[test]
fn console_output_when_capture_is_off() {
    let mut cfg = Config::default();
    cfg.probe.capture_output = false;
    let ws = Workspace::with_config(cfg);
    ws.source("subs.txt", "a.example.com\n");
    let prober = FakeProber::writing(PROBE_OUTPUT);

    ws.run(&prober, StageFlags::default());
    assert_eq!(prober.jobs.borrow()[0].log_file, None);
}

#[test]
fn missing_sources_abort_before_probing() {
    let ws = Workspace::new();
    fs::remove_dir_all(&ws.layout.domain_dir).unwrap();
    let prober = FakeProber::writing(PROBE_OUTPUT);

    let report = ws.run(&prober, StageFlags::default());

    assert!(report.aborted());
    assert_eq!(prober.calls(), 0);
    assert_eq!(
        report.status(Stage::Extract).cloned(),
        skipped(SkipReason::MissingInput {
            path: ws.layout.domain_dir.clone()
        })
    );
    assert_eq!(
        report.status(Stage::Probe).cloned(),
        skipped(SkipReason::Cascaded { from: Stage::Extract })
    );
    assert_eq!(
        report.status(Stage::Filter).cloned(),
        skipped(SkipReason::Cascaded { from: Stage::Process })
    );
}

#[test]
fn empty_host_list_is_not_probed() {
    let ws = Workspace::new();
    ws.source("subs.txt", "子域名\n\n");
    let prober = FakeProber::writing(PROBE_OUTPUT);

    let report = ws.run(&prober, StageFlags::default());

    assert!(report.completed(Stage::Extract));
    assert_eq!(prober.calls(), 0);
    assert_eq!(
        report.status(Stage::Probe).cloned(),
        skipped(SkipReason::MissingInput {
            path: ws.layout.host_file.clone()
        })
    );
}

#[test]
fn skip_probe_stops_after_extraction() {
    let ws = seeded();
    let prober = FakeProber::writing(PROBE_OUTPUT);
    let flags = StageFlags {
        skip_probe: true,
        ..StageFlags::default()
    };

    let report = ws.run(&prober, flags);

    assert!(!report.aborted());
    assert_eq!(prober.calls(), 0);
    assert!(ws.layout.host_file.is_file());
    assert_eq!(report.status(Stage::Probe).cloned(), skipped(SkipReason::Requested));
    assert_eq!(
        report.status(Stage::Process).cloned(),
        skipped(SkipReason::Cascaded { from: Stage::Probe })
    );
    assert!(!ws.layout.processed_table.exists());
}

#[test]
fn partial_output_beats_failing_exit_code() {
    let ws = seeded();
    let prober = FakeProber::writing(PROBE_OUTPUT).exiting(Some(3));

    let report = ws.run(&prober, StageFlags::default());

    assert!(!report.aborted());
    assert!(report.completed(Stage::Probe));
    assert!(ws.layout.processed_table.is_file());
}

#[test]
fn failing_probe_without_output_skips_processing() {
    let ws = seeded();
    let prober = FakeProber::silent(Some(1));

    let report = ws.run(&prober, StageFlags::default());

    assert!(report.aborted());
    match report.status(Stage::Probe) {
        Some(StageStatus::Skipped(SkipReason::ProbeFailed { detail })) => {
            assert!(detail.contains("status 1"), "{detail}")
        }
        other => panic!("unexpected probe status {other:?}"),
    }
    assert!(!ws.layout.processed_table.exists());
}

#[test]
fn stale_artifact_is_not_reused() {
    let ws = seeded();
    fs::write(&ws.layout.artifact, PROBE_OUTPUT).unwrap();
    let prober = FakeProber::silent(Some(0));

    let report = ws.run(&prober, StageFlags::default());

    assert_eq!(
        report.status(Stage::Probe).cloned(),
        skipped(SkipReason::MissingInput {
            path: ws.layout.artifact.clone()
        })
    );
    assert!(!ws.layout.artifact.exists());
}

#[test]
fn disabled_filter_is_a_requested_skip() {
    let mut cfg = Config::default();
    cfg.filter.enabled = false;
    let ws = Workspace::with_config(cfg);
    ws.source("subs.txt", "admin.example.com\n");
    let prober = FakeProber::writing(PROBE_OUTPUT);

    let report = ws.run(&prober, StageFlags::default());

    assert!(!report.aborted());
    assert!(report.completed(Stage::Process));
    assert_eq!(report.status(Stage::Filter).cloned(), skipped(SkipReason::Requested));
    assert!(!ws.layout.filtered_table.exists());
}

#[test]
fn refilter_reads_the_processed_table() {
    let mut cfg = Config::default();
    cfg.filter.logic_and = false;
    cfg.filter.include_redirect = false;
    cfg.filter.title_keywords = ListSetting::parse("dashboard");
    let ws = Workspace::with_config(cfg);
    let records = vec![
        ProbeRecord::new("https://a.example.com", StatusCodes::from_joined("200"), "Home", Some("https://a.example.com/x".into())),
        ProbeRecord::new("https://b.example.com", StatusCodes::from_joined("404"), "Dashboard", None),
        ProbeRecord::new("https://c.example.com", StatusCodes::from_joined("500"), "Oops", None),
    ];
    table::write_records(&ws.layout.processed_table, &records).unwrap();
    let prober = FakeProber::silent(Some(0));
    let flags = StageFlags {
        refilter: true,
        ..StageFlags::default()
    };

    let report = ws.run(&prober, flags);

    assert!(report.completed(Stage::Filter));
    assert_eq!(prober.calls(), 0);
    assert_eq!(
        ws.read(&ws.layout.filtered_table),
        "url,status_codes,title\nhttps://a.example.com,200,Home\nhttps://b.example.com,404,Dashboard\n"
    );
}

#[test]
fn refilter_without_processed_table_aborts() {
    let ws = Workspace::new();
    let flags = StageFlags {
        refilter: true,
        ..StageFlags::default()
    };

    let report = ws.run(FakeProber::silent(Some(0)), flags);

    assert!(report.aborted());
    assert_eq!(
        report.status(Stage::Filter).cloned(),
        skipped(SkipReason::MissingInput {
            path: ws.layout.processed_table.clone()
        })
    );
}

#[test]
fn refilter_honours_disabled_filter() {
    let mut cfg = Config::default();
    cfg.filter.enabled = false;
    let ws = Workspace::with_config(cfg);
    let records = vec![ProbeRecord::new("https://a.example.com", StatusCodes::from_joined("200"), "Admin", None)];
    table::write_records(&ws.layout.processed_table, &records).unwrap();
    let flags = StageFlags {
        refilter: true,
        ..StageFlags::default()
    };

    let report = ws.run(FakeProber::silent(Some(0)), flags);

    assert!(!report.aborted());
    assert_eq!(report.status(Stage::Filter).cloned(), skipped(SkipReason::Requested));
    assert!(!ws.layout.filtered_table.exists());
}
