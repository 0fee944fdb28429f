use std::process::ExitCode;
use std::time::{Duration, Instant};

use colored::*;
use subrefine_common::Result;
use subrefine_common::config::Config;
use subrefine_core::layout::Layout;
use subrefine_core::pipeline::{Pipeline, PipelineReport, StageFlags};
use subrefine_core::probe::{Completion, ProbeJob, Prober, ProcessProber};

use crate::mprint;
use crate::terminal::{colors, format, print, spinner::Spinner};

/// Exit code when a stage was skipped for a missing input or a failed probe.
const ABORTED: u8 = 2;

pub fn run(cfg: &Config, layout: &Layout, flags: StageFlags) -> anyhow::Result<ExitCode> {
    layout.ensure_dirs()?;
    print_settings(cfg, layout, flags);

    let prober = SpinnerProber {
        inner: ProcessProber::new(cfg.probe.clone()),
    };

    let start_time = Instant::now();
    let report = Pipeline::new(cfg, layout, prober).with_flags(flags).run()?;
    print_report(&report, start_time.elapsed());

    match report.aborted() {
        true => Ok(ExitCode::from(ABORTED)),
        false => Ok(ExitCode::SUCCESS),
    }
}

/// Shows a spinner while a captured probe run is in progress.
struct SpinnerProber<P> {
    inner: P,
}

impl<P: Prober> Prober for SpinnerProber<P> {
    fn run(&self, job: &ProbeJob) -> Result<Completion> {
        let _spinner = job.log_file.as_ref().map(|log| {
            Spinner::start(format!(
                "Probing hosts, tool output goes to {}",
                log.display().to_string().italic()
            ))
        });
        self.inner.run(job)
    }
}

fn print_settings(cfg: &Config, layout: &Layout, flags: StageFlags) {
    print::aligned_line("Sources", layout.domain_dir.display().to_string());
    print::aligned_line("Host list", layout.host_file.display().to_string());
    match flags.skip_probe || flags.refilter {
        true => print::aligned_line("Probe", "disabled".color(colors::SKIPPED)),
        false => print::aligned_line("Probe", format!("{} ({} threads)", cfg.probe.path, cfg.probe.threads)),
    }
    print::aligned_line("Results", layout.result_dir.display().to_string());
    if !cfg.filter.enabled || flags.skip_filter {
        print::aligned_line("Filter", "disabled".color(colors::SKIPPED));
    }
    mprint!();
}

fn print_report(report: &PipelineReport, total_time: Duration) {
    print::header("pipeline report");
    for (idx, stage) in report.stages.iter().enumerate() {
        print::tree_head(idx + 1, stage.stage.label());
        print::as_tree_one_level(format::stage_details(&stage.status));
        if idx + 1 != report.stages.len() {
            mprint!();
        }
    }

    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let outcome: ColoredString = match report.aborted() {
        true => "Pipeline stopped early".red().bold(),
        false => "Pipeline complete".green().bold(),
    };
    print::fat_separator();
    print::centerln(&format!("{outcome} in {total_time}"));
    print::end_of_program();
}
