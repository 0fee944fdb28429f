use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use subrefine_common::Result;
use subrefine_common::config::{Config, DEFAULT_CONFIG_PATH};
use subrefine_core::layout::Layout;
use subrefine_core::pipeline::{Pipeline, PipelineReport, StageFlags};
use subrefine_core::probe::{Completion, ProbeJob, Prober};
use tempfile::TempDir;

/// A project directory in a temp dir with the default layout created.
pub struct Workspace {
    _dir: TempDir,
    pub cfg: Config,
    pub layout: Layout,
}

impl Workspace {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(cfg: Config) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::new(dir.path(), &cfg, Path::new(DEFAULT_CONFIG_PATH));
        layout.ensure_dirs().unwrap();
        Self {
            _dir: dir,
            cfg,
            layout,
        }
    }

    /// Writes a source file into the domain directory.
    pub fn source(&self, name: &str, content: impl AsRef<[u8]>) -> PathBuf {
        let path = self.layout.domain_dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    pub fn run<P: Prober>(&self, prober: P, flags: StageFlags) -> PipelineReport {
        Pipeline::new(&self.cfg, &self.layout, prober)
            .with_flags(flags)
            .run()
            .unwrap()
    }

    pub fn read(&self, path: &Path) -> String {
        fs::read_to_string(path).unwrap()
    }
}

/// Stands in for the probe tool: optionally writes an artifact and reports an exit code.
pub struct FakeProber {
    pub artifact: Option<String>,
    pub code: Option<i32>,
    pub jobs: RefCell<Vec<ProbeJob>>,
}

impl FakeProber {
    pub fn writing(artifact: &str) -> Self {
        Self {
            artifact: Some(artifact.to_string()),
            code: Some(0),
            jobs: RefCell::new(Vec::new()),
        }
    }

    pub fn silent(code: Option<i32>) -> Self {
        Self {
            artifact: None,
            code,
            jobs: RefCell::new(Vec::new()),
        }
    }

    pub fn exiting(mut self, code: Option<i32>) -> Self {
        self.code = code;
        self
    }

    pub fn calls(&self) -> usize {
        self.jobs.borrow().len()
    }
}

impl Prober for FakeProber {
    fn run(&self, job: &ProbeJob) -> Result<Completion> {
        self.jobs.borrow_mut().push(job.clone());
        if let Some(artifact) = &self.artifact {
            fs::write(&job.output, artifact).unwrap();
        }
        Ok(Completion { code: self.code })
    }
}
