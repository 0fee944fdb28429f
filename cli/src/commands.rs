pub mod init;
pub mod run;

use std::path::PathBuf;

use clap::Parser;
use subrefine_common::config::{DEFAULT_CONFIG_PATH, Overrides};
use subrefine_core::pipeline::StageFlags;

#[derive(Parser)]
#[command(name = "subrefine")]
#[command(version, about = "Extract, probe and filter discovered subdomains.")]
pub struct CommandLine {
    /// Configuration file, relative to the working directory
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Host list file written by extraction and read by the probe
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Extract hosts only, do not run the probe tool
    #[arg(short, long)]
    pub skip_probe: bool,

    /// Do not filter the processed results
    #[arg(long)]
    pub skip_filter: bool,

    /// Re-run only the filter over the existing processed table
    #[arg(long, conflicts_with_all = ["skip_probe", "skip_filter"])]
    pub refilter: bool,

    /// Create the directory layout and a default config, then exit
    #[arg(short, long)]
    pub init: bool,

    /// Let the probe tool write to the console instead of a log file
    #[arg(long)]
    pub no_capture: bool,

    /// Show debug output
    #[arg(short, long)]
    pub verbose: bool,

    #[arg(long)]
    pub no_banner: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl From<&CommandLine> for Overrides {
    fn from(commands: &CommandLine) -> Self {
        Self {
            host_file: commands.output.clone(),
            capture_output: commands.no_capture.then_some(false),
        }
    }
}

impl From<&CommandLine> for StageFlags {
    fn from(commands: &CommandLine) -> Self {
        Self {
            skip_probe: commands.skip_probe,
            skip_filter: commands.skip_filter,
            refilter: commands.refilter,
        }
    }
}
