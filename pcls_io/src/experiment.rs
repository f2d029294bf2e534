//! Per-experiment output directory.
//!
//! ```text
//! <output_root>/<exp_name>/
//! ├── run.log            console mirror
//! ├── config.json        run configuration
//! ├── <file>.backup      provenance copies
//! └── models/
//!     └── model.t7       best checkpoint
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// File name of the run log.
pub const RUN_LOG_FILE: &str = "run.log";

/// File name of the saved configuration.
pub const CONFIG_FILE: &str = "config.json";

/// Checkpoint path relative to the experiment directory.
pub const CHECKPOINT_FILE: &str = "models/model.t7";

/// Output directory tree of one experiment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Experiment {
    root: PathBuf,
}

impl Experiment {
    /// Experiment rooted at `<output_root>/<exp_name>` without touching disk.
    pub fn new(output_root: &Path, exp_name: &str) -> Self {
        Self {
            root: output_root.join(exp_name),
        }
    }

    /// Create the directory tree. Idempotent.
    pub fn create(output_root: &Path, exp_name: &str) -> Result<Self> {
        let experiment = Self::new(output_root, exp_name);
        fs::create_dir_all(experiment.models_dir())?;
        Ok(experiment)
    }

    /// Create the directory tree and copy `backups` into it.
    ///
    /// Backup copies overwrite earlier ones. A backup source that does not
    /// exist is skipped with a warning.
    pub fn init(output_root: &Path, exp_name: &str, backups: &[PathBuf]) -> Result<Self> {
        let experiment = Self::create(output_root, exp_name)?;
        experiment.backup_sources(backups)?;
        Ok(experiment)
    }

    /// Copy each of `sources` to `<name>.backup` in the experiment directory.
    pub fn backup_sources(&self, sources: &[PathBuf]) -> Result<()> {
        for source in sources {
            self.backup(source)?;
        }
        Ok(())
    }

    fn backup(&self, source: &Path) -> Result<()> {
        let Some(file_name) = source.file_name() else {
            log::warn!("Skipping backup of {}: not a file path", source.display());
            return Ok(());
        };
        if !source.is_file() {
            log::warn!("Skipping backup of {}: file not found", source.display());
            return Ok(());
        }

        let mut target = file_name.to_os_string();
        target.push(".backup");
        fs::copy(source, self.root.join(target))?;
        Ok(())
    }

    /// Experiment directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding checkpoints.
    pub fn models_dir(&self) -> PathBuf {
        self.root.join("models")
    }

    /// Path of the run log.
    pub fn run_log_path(&self) -> PathBuf {
        self.root.join(RUN_LOG_FILE)
    }

    /// Path of the saved configuration.
    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    /// Fixed checkpoint path, overwritten on every new best.
    pub fn checkpoint_path(&self) -> PathBuf {
        self.root.join(CHECKPOINT_FILE)
    }
}
