//! Resolved on-disk locations of one run.
//!
//! All configured paths are taken relative to the project root unless they
//! are absolute.

use std::fs;
use std::path::{Path, PathBuf};

use subrefine_common::config::Config;
use subrefine_common::{RefineError, Result};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub config_file: PathBuf,
    pub domain_dir: PathBuf,
    pub result_dir: PathBuf,
    pub temp_dir: PathBuf,
    /// Unique host list produced by extraction.
    pub host_file: PathBuf,
    /// Raw probe tool output.
    pub artifact: PathBuf,
    pub probe_log: PathBuf,
    pub processed_table: PathBuf,
    pub filtered_table: PathBuf,
}

/// What [`Layout::initialize`] changed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub created_dirs: Vec<PathBuf>,
    pub wrote_config: bool,
}

impl Layout {
    pub fn new(root: &Path, cfg: &Config, config_file: &Path) -> Self {
        let temp_dir = root.join(&cfg.paths.temp_dir);
        let result_dir = root.join(&cfg.paths.result_dir);
        Self {
            config_file: root.join(config_file),
            domain_dir: root.join(&cfg.paths.domain_dir),
            host_file: root.join(&cfg.extract.output_file),
            artifact: temp_dir.join(&cfg.probe.output_file),
            probe_log: temp_dir.join(&cfg.probe.output_log_file),
            processed_table: result_dir.join(&cfg.process.output_file),
            filtered_table: result_dir.join(&cfg.filter.output_file),
            result_dir,
            temp_dir,
        }
    }

    /// Directories every run expects to exist.
    pub fn directories(&self) -> Vec<&Path> {
        let mut dirs: Vec<&Path> = vec![
            self.domain_dir.as_path(),
            self.result_dir.as_path(),
            self.temp_dir.as_path(),
        ];
        if let Some(config_dir) = self.config_file.parent() {
            dirs.insert(0, config_dir);
        }
        dirs
    }

    /// Creates missing directories, returning the ones created.
    pub fn ensure_dirs(&self) -> Result<Vec<PathBuf>> {
        let mut created = Vec::new();
        for dir in self.directories() {
            if dir.is_dir() {
                continue;
            }
            fs::create_dir_all(dir).map_err(|e| RefineError::io(dir, e))?;
            info!("Created directory {}", dir.display());
            created.push(dir.to_path_buf());
        }
        Ok(created)
    }

    /// Creates the directory layout and writes `cfg` as the config file if none exists.
    pub fn initialize(&self, cfg: &Config) -> Result<InitReport> {
        let created_dirs = self.ensure_dirs()?;

        let wrote_config = !self.config_file.exists();
        if wrote_config {
            let text = cfg.to_toml()?;
            fs::write(&self.config_file, text).map_err(|e| RefineError::io(&self.config_file, e))?;
            info!("Wrote default configuration to {}", self.config_file.display());
        }

        Ok(InitReport {
            created_dirs,
            wrote_config,
        })
    }
}
