//! Per-trial scratch directories and their retention policy.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use tg_types::SweepResult;

/// Naming scheme for per-trial scratch directories under the sweep root.
pub fn trial_dir_name(trial_index: usize) -> String {
    format!("gridsearch_tmp_{trial_index}")
}

/// A per-trial scratch directory.
///
/// The engine writes all of a trial's artifacts here; `release` decides
/// whether the directory survives the trial.
#[derive(Debug, PartialEq)]
pub struct TrialWorkspace {
    pub path: PathBuf,
    pub trial_index: usize,
}

impl TrialWorkspace {
    /// Create the scratch directory for a trial, fresh.
    ///
    /// A directory of the same name left behind by an earlier run is
    /// removed first so no artifacts bleed between runs.
    pub fn acquire<P: AsRef<Path>>(sweep_root: P, trial_index: usize) -> SweepResult<Self> {
        let path = sweep_root.as_ref().join(trial_dir_name(trial_index));
        if path.exists() {
            debug!("Removing stale trial directory {}", path.display());
            fs::remove_dir_all(&path)?;
        }
        fs::create_dir_all(&path)?;
        Ok(Self { path, trial_index })
    }

    /// Apply the retention decision: keep the directory when the trial won
    /// a best for some pipeline, delete it otherwise.
    pub fn release(self, keep: bool) -> SweepResult<Option<PathBuf>> {
        if keep {
            debug!("Keeping trial directory {}", self.path.display());
            Ok(Some(self.path))
        } else {
            debug!("Removing trial directory {}", self.path.display());
            fs::remove_dir_all(&self.path)?;
            Ok(None)
        }
    }
}
