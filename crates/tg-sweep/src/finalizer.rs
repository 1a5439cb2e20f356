//! Publishes best trial workspaces into stable per-pipeline directories.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use tg_types::{internal_error, SweepError, SweepResult};

use crate::report::PipelineBest;

/// Copies each pipeline's best workspace to `<results_root>/<Pipeline_Dir>`,
/// replacing whatever a previous run left there.
pub struct Finalizer;

impl Finalizer {
    /// Publish every pipeline in `bests`, in input order. Returns the
    /// published destination directories.
    ///
    /// A pipeline with no recorded best workspace (nothing ever improved
    /// on it, e.g. every trial scored NaN) fails the whole finalization.
    pub fn publish<P: AsRef<Path>>(
        results_root: P,
        bests: &[PipelineBest],
    ) -> SweepResult<Vec<PathBuf>> {
        let results_root = results_root.as_ref();
        let mut published = Vec::new();

        for best in bests {
            let (rmse, source) = match (best.rmse, best.workspace.as_deref()) {
                (Some(rmse), Some(source)) => (rmse, source),
                _ => {
                    return Err(internal_error!(
                        "no best workspace recorded for {}; nothing to publish",
                        best.pipeline
                    ))
                }
            };

            let destination = results_root.join(best.pipeline.dir_name());
            if destination.exists() {
                debug!("Replacing stale results at {}", destination.display());
                fs::remove_dir_all(&destination)?;
            }
            copy_tree(source, &destination)?;
            info!(
                "Published {} best (RMSE {:.4}) to {}",
                best.pipeline,
                rmse,
                destination.display()
            );
            published.push(destination);
        }

        Ok(published)
    }
}

/// Recursive directory copy preserving relative layout.
fn copy_tree(source: &Path, destination: &Path) -> SweepResult<()> {
    for entry in WalkDir::new(source) {
        let entry = entry.map_err(std::io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| SweepError::Internal(e.to_string()))?;
        let target = destination.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
