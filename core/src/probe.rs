//! # External Probe Invocation
//!
//! The HTTP probing itself is done by an external tool. This module builds its
//! command line, runs it as one blocking child process and judges the result.
//!
//! The artifact file is the ground truth: a non-empty artifact counts as
//! success whatever the exit status, because the tool can report failure
//! after writing a usable partial result.

use std::fmt;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use subrefine_common::config::ProbeConfig;
use subrefine_common::{RefineError, Result};
use tracing::{debug, info};

/// Files handed to one probe run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeJob {
    /// Host list, one entry per line.
    pub input: PathBuf,
    /// Raw artifact the tool writes.
    pub output: PathBuf,
    /// Where the tool's console output goes; `None` keeps it on the terminal.
    pub log_file: Option<PathBuf>,
}

/// How the child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    /// `None` when the process was ended by a signal.
    pub code: Option<i32>,
}

impl Completion {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<ExitStatus> for Completion {
    fn from(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

/// Runs the probe tool for a job and reports how it ended.
///
/// Implementations block until the tool exits.
pub trait Prober {
    fn run(&self, job: &ProbeJob) -> Result<Completion>;
}

impl<P: Prober + ?Sized> Prober for &P {
    fn run(&self, job: &ProbeJob) -> Result<Completion> {
        (**self).run(job)
    }
}

/// Result of a probe run as judged from the artifact and the exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// A non-empty artifact exists. `exit` keeps the status for reporting.
    Produced { exit: Completion },
    /// The tool succeeded but wrote nothing.
    Empty,
    /// No artifact and a failing exit status.
    Failed { exit: Completion },
}

impl Verdict {
    pub fn judge(artifact: &Path, exit: Completion) -> Self {
        let produced = fs::metadata(artifact).is_ok_and(|meta| meta.is_file() && meta.len() > 0);
        match (produced, exit.success()) {
            (true, _) => Self::Produced { exit },
            (false, true) => Self::Empty,
            (false, false) => Self::Failed { exit },
        }
    }
}

/// Program plus argv, built from [`ProbeConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl ProbeCommand {
    pub fn build(cfg: &ProbeConfig, program: PathBuf, input: &Path, output: &Path) -> Self {
        let mut args: Vec<String> = vec![
            "-l".into(),
            input.display().to_string(),
            "-o".into(),
            output.display().to_string(),
            "-t".into(),
            cfg.threads.to_string(),
            "-timeout".into(),
            cfg.timeout.to_string(),
        ];

        let switches = [
            (cfg.follow_redirects, "-fr"),
            (cfg.status_code, "-sc"),
            (cfg.title, "-title"),
        ];
        args.extend(
            switches
                .into_iter()
                .filter(|(enabled, _)| *enabled)
                .map(|(_, flag)| flag.to_string()),
        );

        // "-rl 60" is one configured entry but two argv items.
        for extra in cfg.additional_args.items() {
            args.extend(extra.split_whitespace().map(String::from));
        }

        Self { program, args }
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }
}

impl fmt::Display for ProbeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Runs the configured executable as a child process.
#[derive(Debug, Clone)]
pub struct ProcessProber {
    cfg: ProbeConfig,
}

impl ProcessProber {
    pub fn new(cfg: ProbeConfig) -> Self {
        Self { cfg }
    }

    /// Resolves the configured tool through `PATH` (or as a path).
    pub fn locate(&self) -> Result<PathBuf> {
        which::which(&self.cfg.path).map_err(|_| RefineError::ToolNotFound {
            program: self.cfg.path.clone(),
        })
    }
}

impl Prober for ProcessProber {
    fn run(&self, job: &ProbeJob) -> Result<Completion> {
        let program = self.locate()?;
        let probe = ProbeCommand::build(&self.cfg, program, &job.input, &job.output);
        info!("Running {probe}");

        let mut command = probe.command();
        command.stdin(Stdio::null());
        if let Some(log_file) = &job.log_file {
            let log = File::create(log_file).map_err(|e| RefineError::io(log_file, e))?;
            let log_err = log.try_clone().map_err(|e| RefineError::io(log_file, e))?;
            command.stdout(log).stderr(log_err);
            info!("Capturing probe output in {}", log_file.display());
        }

        let status = command.status().map_err(|e| match e.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => RefineError::ToolNotFound {
                program: self.cfg.path.clone(),
            },
            _ => RefineError::io(&probe.program, e),
        })?;

        let completion = Completion::from(status);
        debug!("Probe tool exited with {:?}", completion.code);
        Ok(completion)
    }
}
