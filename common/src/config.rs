//! # Configuration
//!
//! Typed settings for every stage, built once per run from three layers:
//!
//! 1. built-in defaults ([`Config::default`]),
//! 2. an optional TOML file (a missing file is reported and skipped),
//! 3. command line [`Overrides`].
//!
//! The result is validated before any stage runs, so stages never re-check
//! their settings.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, warn};

use crate::error::RefineError;

pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub extract: ExtractConfig,
    pub paths: PathsConfig,
    pub probe: ProbeConfig,
    pub process: ProcessConfig,
    pub filter: FilterConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Drop an explicit `:443` from extracted hosts.
    pub strip_443: bool,
    /// Unique host list handed to the probe tool, relative to the project root.
    pub output_file: PathBuf,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            strip_443: true,
            output_file: PathBuf::from("domains.txt"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding the raw asset inventories.
    pub domain_dir: PathBuf,
    pub result_dir: PathBuf,
    /// Scratch space for the probe artifact and its captured console output.
    pub temp_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            domain_dir: PathBuf::from("domain"),
            result_dir: PathBuf::from("result"),
            temp_dir: PathBuf::from("temp"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Executable name (looked up on `PATH`) or path of the probe tool.
    pub path: String,
    pub threads: u32,
    /// Per-request timeout in seconds, passed through to the tool.
    pub timeout: u64,
    pub follow_redirects: bool,
    pub status_code: bool,
    pub title: bool,
    /// Raw artifact name inside the temp directory.
    pub output_file: PathBuf,
    /// Extra arguments appended verbatim.
    pub additional_args: ListSetting,
    /// Redirect the tool's console output into `output_log_file`.
    pub capture_output: bool,
    pub output_log_file: PathBuf,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            path: "httpx".to_string(),
            threads: 20,
            timeout: 5,
            follow_redirects: true,
            status_code: true,
            title: true,
            output_file: PathBuf::from("result.txt"),
            additional_args: ListSetting::parse("-rl 60,-rlm 3000"),
            capture_output: true,
            output_log_file: PathBuf::from("httpx_output.log"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessConfig {
    /// Parsed probe table inside the result directory.
    pub output_file: PathBuf,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            output_file: PathBuf::from("result_processed.csv"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub enabled: bool,
    /// Filtered table inside the result directory.
    pub output_file: PathBuf,
    pub status_codes: ListSetting,
    pub title_keywords: ListSetting,
    /// `true` requires both predicates, `false` either one.
    pub logic_and: bool,
    pub include_redirect: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            output_file: PathBuf::from("filtered_results.csv"),
            status_codes: ListSetting::parse("200"),
            title_keywords: ListSetting::parse("登录,注册,系统,后台,admin,login,system"),
            logic_and: true,
            include_redirect: true,
        }
    }
}

/// A list of strings written either as `"a,b,c"` or as a TOML array.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListSetting(Vec<String>);

impl ListSetting {
    /// Splits on commas, trimming items and dropping empty ones.
    pub fn parse(joined: &str) -> Self {
        Self::from_items(joined.split(','))
    }

    pub fn from_items<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            items
                .into_iter()
                .map(|item| item.as_ref().trim().to_string())
                .filter(|item| !item.is_empty())
                .collect(),
        )
    }

    pub fn items(&self) -> &[String] {
        &self.0
    }
}

impl Serialize for ListSetting {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.join(","))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListRepr {
    Joined(String),
    Items(Vec<String>),
}

impl<'de> Deserialize<'de> for ListSetting {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(match ListRepr::deserialize(deserializer)? {
            ListRepr::Joined(joined) => Self::parse(&joined),
            ListRepr::Items(items) => Self::from_items(items),
        })
    }
}

/// Command line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host_file: Option<PathBuf>,
    pub capture_output: Option<bool>,
}

impl Config {
    /// Layers defaults, the file at `path` (if present) and `overrides`, then validates.
    pub fn resolve(path: &Path, overrides: &Overrides) -> crate::Result<Self> {
        let mut cfg = match Self::from_file(path) {
            Ok(cfg) => cfg,
            Err(err @ RefineError::ConfigMissing { .. }) => {
                warn!("{err}, using built-in defaults");
                Self::default()
            }
            Err(err) => return Err(err),
        };
        cfg.apply(overrides);
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> crate::Result<Self> {
        if !path.is_file() {
            return Err(RefineError::ConfigMissing {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path).map_err(|e| RefineError::io(path, e))?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_toml(&content, path)
    }

    pub fn from_toml(content: &str, origin: &Path) -> crate::Result<Self> {
        toml::from_str(content).map_err(|source| RefineError::ConfigInvalid {
            path: origin.to_path_buf(),
            source,
        })
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| RefineError::InvalidValue {
            field: "config",
            reason: e.to_string(),
        })
    }

    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(host_file) = &overrides.host_file {
            self.extract.output_file = host_file.clone();
        }
        if let Some(capture) = overrides.capture_output {
            self.probe.capture_output = capture;
        }
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.probe.path.trim().is_empty() {
            return Err(invalid("probe.path", "must name an executable"));
        }
        if self.probe.threads == 0 {
            return Err(invalid("probe.threads", "must be at least 1"));
        }
        if self.probe.timeout == 0 {
            return Err(invalid("probe.timeout", "must be at least 1 second"));
        }

        let files: [(&'static str, &Path); 8] = [
            ("extract.output_file", self.extract.output_file.as_path()),
            ("paths.domain_dir", self.paths.domain_dir.as_path()),
            ("paths.result_dir", self.paths.result_dir.as_path()),
            ("paths.temp_dir", self.paths.temp_dir.as_path()),
            ("probe.output_file", self.probe.output_file.as_path()),
            ("probe.output_log_file", self.probe.output_log_file.as_path()),
            ("process.output_file", self.process.output_file.as_path()),
            ("filter.output_file", self.filter.output_file.as_path()),
        ];
        for (field, path) in files {
            if path.as_os_str().is_empty() {
                return Err(invalid(field, "must not be empty"));
            }
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> RefineError {
    RefineError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
}
