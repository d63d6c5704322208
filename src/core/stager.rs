//! Input staging.
//!
//! The pipeline only ever reads its inputs from the canonical paths, so any
//! caller-supplied dataset is copied there first. Staging is split in two:
//! `resolve` checks every source without writing anything, and
//! `stage` performs the copies once the run lock is held.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info};

use crate::config::paths::DataLayout;
use crate::domain::{DatasetRole, InputOverrides, StagedInput};

use super::error::OrchestrationError;

/// Copies input datasets onto their canonical paths
pub struct InputStager {
    layout: DataLayout,
}

/// Inputs whose sources have been verified but not yet copied
#[derive(Debug, Clone)]
pub struct ResolvedInputs {
    inputs: Vec<StagedInput>,
}

impl ResolvedInputs {
    pub fn inputs(&self) -> &[StagedInput] {
        &self.inputs
    }
}

impl InputStager {
    pub fn new(layout: DataLayout) -> Self {
        Self { layout }
    }

    /// Verify that every effective source exists
    ///
    /// All roles are checked before anything is copied, so a missing second
    /// input never leaves the first one half-staged.
    pub async fn resolve(
        &self,
        overrides: &InputOverrides,
    ) -> Result<ResolvedInputs, OrchestrationError> {
        let mut inputs = Vec::with_capacity(DatasetRole::ALL.len());

        for role in DatasetRole::ALL {
            let canonical = self.layout.dataset(role).path;
            let source: PathBuf = overrides
                .get(role)
                .cloned()
                .unwrap_or_else(|| canonical.clone());

            if !fs::try_exists(&source).await.unwrap_or(false) {
                return Err(OrchestrationError::MissingInputFile { role, path: source });
            }

            // An override may name the canonical file under another spelling;
            // copying a file onto itself truncates it.
            let copied = !same_file(&source, &canonical).await;
            inputs.push(StagedInput {
                role,
                source,
                canonical,
                copied,
            });
        }

        Ok(ResolvedInputs { inputs })
    }

    /// Copy overrides onto the canonical paths, overwriting prior content
    pub async fn stage(
        &self,
        resolved: ResolvedInputs,
    ) -> Result<Vec<StagedInput>, OrchestrationError> {
        for input in &resolved.inputs {
            if !input.copied {
                debug!(role = %input.role, "Using canonical input in place");
                continue;
            }

            fs::copy(&input.source, &input.canonical)
                .await
                .map_err(|source| OrchestrationError::CopyFailure {
                    role: input.role,
                    from: input.source.clone(),
                    to: input.canonical.clone(),
                    source,
                })?;

            info!(
                role = %input.role,
                from = %input.source.display(),
                to = %input.canonical.display(),
                "Staged input override"
            );
        }

        Ok(resolved.inputs)
    }
}

/// Whether both paths resolve to the same file on disk
async fn same_file(a: &Path, b: &Path) -> bool {
    let (Ok(a_meta), Ok(b_meta)) = (fs::metadata(a).await, fs::metadata(b).await) else {
        return false;
    };

    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        a_meta.dev() == b_meta.dev() && a_meta.ino() == b_meta.ino()
    }

    #[cfg(not(unix))]
    {
        let _ = (a_meta, b_meta);
        matches!(
            (fs::canonicalize(a).await, fs::canonicalize(b).await),
            (Ok(a), Ok(b)) if a == b
        )
    }
}
