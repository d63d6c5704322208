//! Pipeline stages and the artifacts they leave behind.
//!
//! An artifact's presence in the data directory is the only success signal
//! a stage gives. Its content is never read here.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A phase of the external resilience assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Split Monte Carlo fault trajectories into four phases
    PhaseClassification,

    /// Rolling three-stage topology reconfiguration
    TopologyReconfiguration,

    /// Co-dispatch with mobile energy storage; writes no dedicated artifact
    MobileStorageDispatch,
}

impl Stage {
    /// All stages in pipeline order
    pub const ALL: [Stage; 3] = [
        Stage::PhaseClassification,
        Stage::TopologyReconfiguration,
        Stage::MobileStorageDispatch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PhaseClassification => "phase_classification",
            Self::TopologyReconfiguration => "topology_reconfiguration",
            Self::MobileStorageDispatch => "mobile_storage_dispatch",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::PhaseClassification => "Scenario phase classification",
            Self::TopologyReconfiguration => "Rolling topology reconfiguration",
            Self::MobileStorageDispatch => "Mobile storage co-dispatch",
        }
    }

    /// 1-based position in the pipeline
    pub fn number(&self) -> usize {
        match self {
            Self::PhaseClassification => 1,
            Self::TopologyReconfiguration => 2,
            Self::MobileStorageDispatch => 3,
        }
    }

    /// File name of the stage's artifact, if it has one
    pub fn artifact_file_name(&self) -> Option<&'static str> {
        match self {
            Self::PhaseClassification => Some(crate::config::paths::PHASE_CLASSIFICATION_FILE),
            Self::TopologyReconfiguration => Some(crate::config::paths::TOPOLOGY_FILE),
            Self::MobileStorageDispatch => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An artifact at its canonical location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactFile {
    pub stage: Stage,
    pub path: PathBuf,
}

/// Observed state of a stage after a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageState {
    /// Artifact present
    Completed,

    /// Artifact absent
    NotProduced,

    /// No artifact to check; the process ran to completion
    Executed,

    /// No artifact to check; the process never completed
    NotExecuted,
}

impl StageState {
    /// Whether the stage counts as done
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Completed | Self::Executed)
    }
}

/// Status of one stage, computed fresh from the filesystem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageStatus {
    pub stage: Stage,
    pub state: StageState,

    /// Canonical artifact path (artifact-backed stages only)
    pub artifact: Option<PathBuf>,
}
