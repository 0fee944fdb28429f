//! # Pipeline Orchestrator
//!
//! Runs the stages in order: extract, probe, process, filter. A stage that
//! does not complete makes every later stage skip ([`SkipReason::Cascaded`]);
//! nothing is ever re-run backwards. Conditions the run can survive (missing
//! inputs, a failing probe tool) become [`SkipReason`]s in the returned
//! [`PipelineReport`], only fatal I/O problems surface as errors.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use subrefine_common::config::Config;
use subrefine_common::models::{FilterPredicate, ProbeRecord};
use subrefine_common::{RefineError, Result, success};
use tracing::{info, warn};

use crate::layout::Layout;
use crate::probe::{ProbeJob, Prober, Verdict};
use crate::{extract, filter, parser, table};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extract,
    Probe,
    Process,
    Filter,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Extract, Stage::Probe, Stage::Process, Stage::Filter];

    pub fn label(&self) -> &'static str {
        match self {
            Stage::Extract => "extract hosts",
            Stage::Probe => "probe hosts",
            Stage::Process => "process results",
            Stage::Filter => "filter results",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Turned off by a flag or the configuration.
    Requested,
    /// An earlier stage did not complete.
    Cascaded { from: Stage },
    /// A required input file or directory is absent or empty.
    MissingInput { path: PathBuf },
    /// The probe tool could not be run or failed without output.
    ProbeFailed { detail: String },
}

impl SkipReason {
    /// Whether the skip means the run could not do what was asked.
    pub fn is_abort(&self) -> bool {
        matches!(self, Self::MissingInput { .. } | Self::ProbeFailed { .. })
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Requested => f.write_str("skipped on request"),
            Self::Cascaded { from } => write!(f, "'{from}' did not complete"),
            Self::MissingInput { path } => write!(f, "missing or empty input {}", path.display()),
            Self::ProbeFailed { detail } => f.write_str(detail),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageStatus {
    Completed { summary: String },
    Skipped(SkipReason),
}

impl StageStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub stage: Stage,
    pub status: StageStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub stages: Vec<StageReport>,
}

impl PipelineReport {
    fn push(&mut self, stage: Stage, status: StageStatus) {
        self.stages.push(StageReport { stage, status });
    }

    pub fn status(&self, stage: Stage) -> Option<&StageStatus> {
        self.stages.iter().find(|r| r.stage == stage).map(|r| &r.status)
    }

    pub fn completed(&self, stage: Stage) -> bool {
        self.status(stage).is_some_and(StageStatus::is_completed)
    }

    /// `true` when a stage was skipped for a missing prerequisite or a failed probe.
    pub fn aborted(&self) -> bool {
        self.stages
            .iter()
            .any(|r| matches!(&r.status, StageStatus::Skipped(reason) if reason.is_abort()))
    }
}

/// Stage switches from the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageFlags {
    pub skip_probe: bool,
    pub skip_filter: bool,
    /// Only re-run the filter over an existing processed table.
    pub refilter: bool,
}

pub struct Pipeline<'a, P: Prober> {
    cfg: &'a Config,
    layout: &'a Layout,
    prober: P,
    flags: StageFlags,
}

impl<'a, P: Prober> Pipeline<'a, P> {
    pub fn new(cfg: &'a Config, layout: &'a Layout, prober: P) -> Self {
        Self {
            cfg,
            layout,
            prober,
            flags: StageFlags::default(),
        }
    }

    pub fn with_flags(mut self, flags: StageFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn run(&self) -> Result<PipelineReport> {
        let mut report = PipelineReport::default();

        if self.flags.refilter {
            for stage in [Stage::Extract, Stage::Probe, Stage::Process] {
                report.push(stage, StageStatus::Skipped(SkipReason::Requested));
            }
            report.push(Stage::Filter, self.refilter()?);
            return Ok(report);
        }

        let extracted = self.extract()?;
        let probed = match extracted.is_completed() {
            true => self.probe()?,
            false => cascaded(Stage::Extract),
        };
        let (processed, records) = match probed.is_completed() {
            true => self.process()?,
            false => (cascaded(Stage::Probe), Vec::new()),
        };
        let filtered = if self.filter_requested() {
            match processed.is_completed() {
                true => self.filter(&records)?,
                false => cascaded(Stage::Process),
            }
        } else {
            StageStatus::Skipped(SkipReason::Requested)
        };

        report.push(Stage::Extract, extracted);
        report.push(Stage::Probe, probed);
        report.push(Stage::Process, processed);
        report.push(Stage::Filter, filtered);
        Ok(report)
    }

    fn filter_requested(&self) -> bool {
        !self.flags.skip_filter && self.cfg.filter.enabled
    }

    fn extract(&self) -> Result<StageStatus> {
        let dir = &self.layout.domain_dir;
        info!("[1/4] Extracting hosts from {}", dir.display());

        let hosts = match extract::extract(dir, self.cfg.extract.strip_443) {
            Ok(hosts) => hosts,
            Err(RefineError::MissingInput { path, .. }) => return Ok(missing(path)),
            Err(e) => return Err(e),
        };

        let host_file = &self.layout.host_file;
        extract::write_hosts(&hosts, host_file)?;
        success!("{} unique hosts saved to {}", hosts.len(), host_file.display());
        Ok(StageStatus::Completed {
            summary: format!("{} unique hosts -> {}", hosts.len(), host_file.display()),
        })
    }

    fn probe(&self) -> Result<StageStatus> {
        if self.flags.skip_probe {
            info!("[2/4] Skipping probe on request");
            return Ok(StageStatus::Skipped(SkipReason::Requested));
        }
        info!("[2/4] Probing hosts, this may take a while");

        let input = &self.layout.host_file;
        if !is_non_empty(input) {
            return Ok(missing(input.clone()));
        }

        let temp_dir = &self.layout.temp_dir;
        fs::create_dir_all(temp_dir).map_err(|e| RefineError::io(temp_dir, e))?;
        let artifact = &self.layout.artifact;
        if artifact.exists() {
            fs::remove_file(artifact).map_err(|e| RefineError::io(artifact, e))?;
        }

        let job = ProbeJob {
            input: input.clone(),
            output: artifact.clone(),
            log_file: self.cfg.probe.capture_output.then(|| self.layout.probe_log.clone()),
        };

        let exit = match self.prober.run(&job) {
            Ok(exit) => exit,
            Err(e) if !e.is_fatal() => {
                warn!("{e}");
                return Ok(StageStatus::Skipped(SkipReason::ProbeFailed {
                    detail: e.to_string(),
                }));
            }
            Err(e) => return Err(e),
        };

        match Verdict::judge(artifact, exit) {
            Verdict::Produced { exit } => {
                if !exit.success() {
                    warn!("Probe tool reported failure ({:?}) but produced results, keeping them", exit.code);
                }
                success!("Probe finished, raw results in {}", artifact.display());
                Ok(StageStatus::Completed {
                    summary: format!("raw results -> {}", artifact.display()),
                })
            }
            Verdict::Empty => {
                warn!("Probe tool succeeded but wrote no results, nothing answered");
                Ok(missing(artifact.clone()))
            }
            Verdict::Failed { exit } => {
                let err = RefineError::ExternalTool {
                    program: self.cfg.probe.path.clone(),
                    code: exit.code,
                };
                warn!("{err}, skipping result processing");
                Ok(StageStatus::Skipped(SkipReason::ProbeFailed {
                    detail: err.to_string(),
                }))
            }
        }
    }

    fn process(&self) -> Result<(StageStatus, Vec<ProbeRecord>)> {
        info!("[3/4] Processing probe results");

        let summary = parser::parse_file(&self.layout.artifact)?;
        let table_path = &self.layout.processed_table;
        let written = table::write_records(table_path, &summary.records)?;
        if summary.dropped > 0 {
            warn!("{} of {} lines could not be parsed", summary.dropped, summary.lines);
        }
        success!("{written} records saved to {}", table_path.display());

        let status = StageStatus::Completed {
            summary: format!(
                "{written} records, {} unparseable lines -> {}",
                summary.dropped,
                table_path.display()
            ),
        };
        Ok((status, summary.records))
    }

    fn filter(&self, records: &[ProbeRecord]) -> Result<StageStatus> {
        info!("[4/4] Filtering results");

        let predicate = FilterPredicate::from(&self.cfg.filter);
        let kept = filter::filter(records, &predicate);
        let table_path = &self.layout.filtered_table;
        table::write_records(table_path, &kept)?;
        success!("{} filtered records saved to {}", kept.len(), table_path.display());

        Ok(StageStatus::Completed {
            summary: format!("{} of {} records -> {}", kept.len(), records.len(), table_path.display()),
        })
    }

    fn refilter(&self) -> Result<StageStatus> {
        if !self.filter_requested() {
            info!("Filter is disabled, nothing to re-run");
            return Ok(StageStatus::Skipped(SkipReason::Requested));
        }
        match table::read_records(&self.layout.processed_table) {
            Ok(records) => self.filter(&records),
            Err(RefineError::MissingInput { path, .. }) => Ok(missing(path)),
            Err(e) => Err(e),
        }
    }
}

fn missing(path: PathBuf) -> StageStatus {
    warn!("{}", RefineError::missing("input", &path));
    StageStatus::Skipped(SkipReason::MissingInput { path })
}

fn cascaded(from: Stage) -> StageStatus {
    StageStatus::Skipped(SkipReason::Cascaded { from })
}

fn is_non_empty(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|meta| meta.is_file() && meta.len() > 0)
}
