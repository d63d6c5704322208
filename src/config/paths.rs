//! Canonical file layout of the assessment project.
//!
//! Single source of truth - import this instead of hardcoding file names.
//!
//! ## Layout
//!
//! | Path (under `<workspace>/<project>/`) | Owner | Purpose |
//! |---------------------------------------|-------|---------|
//! | `data/ac_dc_real_case.xlsx` | stager | power system input |
//! | `data/mc_simulation_results_k100_clusters.xlsx` | stager | scenario input |
//! | `data/scenario_phase_classification.xlsx` | pipeline | stage 1 output |
//! | `data/topology_reconfiguration_results.xlsx` | pipeline | stage 2 output |
//! | `data/.resilience-run.lock` | orchestrator | single-run lock |

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::{ArtifactFile, DatasetFile, DatasetRole, Stage};

/// Default name of the pipeline project inside the workspace
pub const DEFAULT_PROJECT_DIR: &str = "DN-ResilienceAssessment";

/// Data directory name inside the project root
pub const DATA_DIR: &str = "data";

pub const POWER_SYSTEM_FILE: &str = "ac_dc_real_case.xlsx";
pub const SCENARIO_FILE: &str = "mc_simulation_results_k100_clusters.xlsx";
pub const PHASE_CLASSIFICATION_FILE: &str = "scenario_phase_classification.xlsx";
pub const TOPOLOGY_FILE: &str = "topology_reconfiguration_results.xlsx";

/// Lock file guarding the canonical paths during a run
pub const RUN_LOCK_FILE: &str = ".resilience-run.lock";

/// Which kind of canonical file an entry is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum CanonicalKind {
    Dataset(DatasetRole),
    Artifact(Stage),
}

impl CanonicalKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Dataset(role) => role.label(),
            Self::Artifact(Stage::PhaseClassification) => "Phase classification results",
            Self::Artifact(Stage::TopologyReconfiguration) => "Topology reconfiguration results",
            Self::Artifact(stage) => stage.label(),
        }
    }
}

/// Resolves canonical paths inside a data directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    data_dir: PathBuf,
}

impl DataLayout {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Layout for a pipeline project root
    pub fn for_project(project_dir: &Path) -> Self {
        Self::new(project_dir.join(DATA_DIR))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn dataset(&self, role: DatasetRole) -> DatasetFile {
        DatasetFile {
            role,
            path: self.data_dir.join(role.file_name()),
        }
    }

    pub fn datasets(&self) -> Vec<DatasetFile> {
        DatasetRole::ALL.iter().map(|r| self.dataset(*r)).collect()
    }

    /// Artifact for a stage, if the stage writes one
    pub fn artifact(&self, stage: Stage) -> Option<ArtifactFile> {
        stage.artifact_file_name().map(|name| ArtifactFile {
            stage,
            path: self.data_dir.join(name),
        })
    }

    /// Every known artifact, in pipeline order
    pub fn artifacts(&self) -> Vec<ArtifactFile> {
        Stage::ALL.iter().filter_map(|s| self.artifact(*s)).collect()
    }

    /// The four canonical files: datasets first, then artifacts
    pub fn canonical_files(&self) -> Vec<(CanonicalKind, PathBuf)> {
        let datasets = self
            .datasets()
            .into_iter()
            .map(|d| (CanonicalKind::Dataset(d.role), d.path));
        let artifacts = self
            .artifacts()
            .into_iter()
            .map(|a| (CanonicalKind::Artifact(a.stage), a.path));
        datasets.chain(artifacts).collect()
    }

    pub fn lock_file(&self) -> PathBuf {
        self.data_dir.join(RUN_LOCK_FILE)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_for_project() {
        let layout = DataLayout::for_project(Path::new("/ws/DN-ResilienceAssessment"));
        assert_eq!(
            layout.data_dir(),
            Path::new("/ws/DN-ResilienceAssessment/data")
        );
        assert_eq!(
            layout.dataset(DatasetRole::PowerSystem).path,
            PathBuf::from("/ws/DN-ResilienceAssessment/data/ac_dc_real_case.xlsx")
        );
    }

    #[test]
    fn test_artifacts_skip_opaque_stage() {
        let layout = DataLayout::new("/data");
        let artifacts = layout.artifacts();
        assert_eq!(artifacts.len(), 2);
        assert_eq!(artifacts[0].stage, Stage::PhaseClassification);
        assert_eq!(artifacts[1].stage, Stage::TopologyReconfiguration);
        assert!(layout.artifact(Stage::MobileStorageDispatch).is_none());
    }

    #[test]
    fn test_canonical_files_order() {
        let layout = DataLayout::new("/data");
        let names: Vec<String> = layout
            .canonical_files()
            .iter()
            .map(|(_, p)| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(
            names,
            vec![
                POWER_SYSTEM_FILE,
                SCENARIO_FILE,
                PHASE_CLASSIFICATION_FILE,
                TOPOLOGY_FILE
            ]
        );
    }

    #[test]
    fn test_lock_file_inside_data_dir() {
        let layout = DataLayout::new("/data");
        assert_eq!(layout.lock_file(), PathBuf::from("/data/.resilience-run.lock"));
    }
}
