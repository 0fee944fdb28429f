//! Error type shared by every pipeline stage.
//!
//! Most variants describe conditions the pipeline survives: the affected line,
//! file or stage is skipped and reported. [`RefineError::is_fatal`] tells the
//! two groups apart.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RefineError>;

#[derive(Error, Debug)]
pub enum RefineError {
    #[error("{what} is missing or empty: {}", path.display())]
    MissingInput { what: &'static str, path: PathBuf },

    #[error("line {line}: {reason}")]
    ParseFailure { line: usize, reason: String },

    #[error("probe tool '{program}' exited with {}", exit_description(code))]
    ExternalTool { program: String, code: Option<i32> },

    #[error("probe tool '{program}' could not be found or is not executable")]
    ToolNotFound { program: String },

    #[error("configuration file not found: {}", path.display())]
    ConfigMissing { path: PathBuf },

    #[error("invalid configuration in {}: {source}", path.display())]
    ConfigInvalid {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("table error on {}: {source}", path.display())]
    Table {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

impl RefineError {
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn table(path: impl AsRef<Path>, source: csv::Error) -> Self {
        Self::Table {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn missing(what: &'static str, path: impl AsRef<Path>) -> Self {
        Self::MissingInput {
            what,
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Fatal errors abort the whole run; everything else only skips work.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Io { .. } | Self::Table { .. } | Self::ConfigInvalid { .. } | Self::InvalidValue { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_conditions_are_not_fatal() {
        assert!(!RefineError::missing("host list", "domains.txt").is_fatal());
        assert!(!RefineError::ConfigMissing { path: "c.toml".into() }.is_fatal());
        assert!(
            !RefineError::ExternalTool { program: "httpx".into(), code: Some(1) }.is_fatal()
        );
    }

    #[test]
    fn io_is_fatal() {
        let err = RefineError::io("result", io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(err.is_fatal());
        assert!(err.to_string().contains("result"));
    }

    #[test]
    fn tool_exit_message_names_status() {
        let err = RefineError::ExternalTool { program: "httpx".into(), code: Some(2) };
        assert_eq!(err.to_string(), "probe tool 'httpx' exited with status 2");
        let err = RefineError::ExternalTool { program: "httpx".into(), code: None };
        assert_eq!(err.to_string(), "probe tool 'httpx' exited with a signal");
    }
}
