//! Post-run stage inspection.
//!
//! Stage status comes from the filesystem alone. The exit code is not
//! consulted: a failing pipeline may still have finished early stages, and a
//! succeeding one may have skipped a write.

use tokio::fs;

use crate::config::paths::DataLayout;
use crate::domain::{Stage, StageState, StageStatus};

/// Derives per-stage status after a run
pub struct ResultInspector {
    layout: DataLayout,
}

impl ResultInspector {
    pub fn new(layout: DataLayout) -> Self {
        Self { layout }
    }

    /// Status of every stage, in pipeline order
    ///
    /// `process_completed` is false when the pipeline was killed at its
    /// deadline; stages without an artifact are then reported as not
    /// executed.
    pub async fn inspect(&self, process_completed: bool) -> Vec<StageStatus> {
        let mut statuses = Vec::with_capacity(Stage::ALL.len());

        for stage in Stage::ALL {
            let status = match self.layout.artifact(stage) {
                Some(artifact) => {
                    let exists = fs::try_exists(&artifact.path).await.unwrap_or(false);
                    StageStatus {
                        stage,
                        state: if exists {
                            StageState::Completed
                        } else {
                            StageState::NotProduced
                        },
                        artifact: Some(artifact.path),
                    }
                }
                None => StageStatus {
                    stage,
                    state: if process_completed {
                        StageState::Executed
                    } else {
                        StageState::NotExecuted
                    },
                    artifact: None,
                },
            };
            statuses.push(status);
        }

        statuses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_status_follows_artifact_presence() {
        let temp = TempDir::new().unwrap();
        let layout = DataLayout::new(temp.path());
        std::fs::write(
            layout.artifact(Stage::PhaseClassification).unwrap().path,
            b"x",
        )
        .unwrap();

        let statuses = ResultInspector::new(layout).inspect(true).await;

        assert_eq!(statuses.len(), 3);
        assert_eq!(statuses[0].state, StageState::Completed);
        assert_eq!(statuses[1].state, StageState::NotProduced);
        assert_eq!(statuses[2].state, StageState::Executed);
        assert!(statuses[2].artifact.is_none());
    }

    #[tokio::test]
    async fn test_opaque_stage_not_executed_after_timeout() {
        let temp = TempDir::new().unwrap();
        let layout = DataLayout::new(temp.path());

        let statuses = ResultInspector::new(layout).inspect(false).await;

        assert_eq!(statuses[0].state, StageState::NotProduced);
        assert_eq!(statuses[2].state, StageState::NotExecuted);
    }
}
