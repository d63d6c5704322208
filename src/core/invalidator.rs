//! Removal of stale pipeline artifacts.
//!
//! Runs before every invocation so that a leftover file from an earlier run
//! can never be read as success by the inspector.

use std::io::ErrorKind;

use tokio::fs;
use tracing::{debug, warn};

use crate::config::paths::DataLayout;

/// Deletes every known artifact before a run
pub struct OutputInvalidator {
    layout: DataLayout,
}

impl OutputInvalidator {
    pub fn new(layout: DataLayout) -> Self {
        Self { layout }
    }

    /// Remove all artifacts, returning a warning per file that could not be
    /// deleted
    ///
    /// Deletion failures never stop the run; the affected stage may then be
    /// reported as completed from the stale file.
    pub async fn invalidate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        for artifact in self.layout.artifacts() {
            match fs::remove_file(&artifact.path).await {
                Ok(()) => {
                    debug!(stage = %artifact.stage, path = %artifact.path.display(), "Removed stale artifact");
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    warn!(
                        stage = %artifact.stage,
                        path = %artifact.path.display(),
                        error = %e,
                        "Could not remove stale artifact"
                    );
                    warnings.push(format!(
                        "Could not remove stale output {}: {}",
                        artifact.path.display(),
                        e
                    ));
                }
            }
        }

        warnings
    }
}
