mod commands;
mod terminal;

use std::process::ExitCode;

use anyhow::Context;
use commands::{CommandLine, init, run};
use subrefine_common::config::{Config, Overrides};
use subrefine_core::layout::Layout;
use subrefine_core::pipeline::StageFlags;
use terminal::{logging, print};

fn main() -> anyhow::Result<ExitCode> {
    let commands = CommandLine::parse_args();

    logging::init(commands.verbose);
    print::banner(commands.no_banner);

    let root = std::env::current_dir().context("cannot determine the working directory")?;
    if commands.init {
        print::header("initializing workspace");
        init::init(&root, &commands.config)?;
        return Ok(ExitCode::SUCCESS);
    }

    let config_file = root.join(&commands.config);
    let cfg = Config::resolve(&config_file, &Overrides::from(&commands))
        .with_context(|| format!("failed to load configuration from {}", config_file.display()))?;
    let layout = Layout::new(&root, &cfg, &commands.config);

    print::header("refining subdomains");
    run::run(&cfg, &layout, StageFlags::from(&commands))
}
