use std::path::Path;

use subrefine_common::config::Config;
use subrefine_common::{RefineError, success};
use subrefine_core::layout::Layout;
use tracing::{info, warn};

pub fn init(root: &Path, config_path: &Path) -> anyhow::Result<()> {
    let layout = init_layout(root, config_path);
    let report = layout.initialize(&Config::default())?;

    if report.wrote_config {
        success!("Default configuration saved to {}", layout.config_file.display());
    } else {
        info!("Keeping existing configuration {}", layout.config_file.display());
    }
    match report.created_dirs.len() {
        0 if !report.wrote_config => info!("Workspace is already initialized"),
        0 => {}
        n => success!("Created {n} directories"),
    }

    info!("Put subdomain exports into {} and run again", layout.domain_dir.display());
    Ok(())
}

/// Layout of an existing valid config, otherwise of the defaults.
/// A broken config file is reported but never blocks initialization.
fn init_layout(root: &Path, config_path: &Path) -> Layout {
    let config_file = root.join(config_path);
    let cfg = match Config::from_file(&config_file).and_then(|cfg| cfg.validate().map(|()| cfg)) {
        Ok(cfg) => cfg,
        Err(RefineError::ConfigMissing { .. }) => Config::default(),
        Err(e) => {
            warn!("{e}, using the default layout");
            Config::default()
        }
    };
    Layout::new(root, &cfg, config_path)
}
