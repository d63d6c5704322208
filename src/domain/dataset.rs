//! Input datasets consumed by the assessment pipeline.
//!
//! The pipeline reads its inputs from fixed locations inside its data
//! directory. Callers may supply alternates, which are copied onto those
//! canonical paths before a run.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Semantic role of an input dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetRole {
    /// AC/DC distribution network description
    PowerSystem,

    /// Clustered Monte Carlo fault scenarios
    Scenario,
}

impl DatasetRole {
    /// All roles, in the order they are staged and reported
    pub const ALL: [DatasetRole; 2] = [DatasetRole::PowerSystem, DatasetRole::Scenario];

    /// Stable identifier used in error messages and JSON output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PowerSystem => "power_system",
            Self::Scenario => "scenario",
        }
    }

    /// Human-readable label for reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::PowerSystem => "Power system data",
            Self::Scenario => "Scenario data",
        }
    }

    /// File name the pipeline expects inside its data directory
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::PowerSystem => crate::config::paths::POWER_SYSTEM_FILE,
            Self::Scenario => crate::config::paths::SCENARIO_FILE,
        }
    }
}

impl fmt::Display for DatasetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dataset at its canonical location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetFile {
    pub role: DatasetRole,
    pub path: PathBuf,
}

/// Caller-supplied alternates for the input datasets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputOverrides {
    pub power_system: Option<PathBuf>,
    pub scenario: Option<PathBuf>,
}

impl InputOverrides {
    /// No overrides; the pipeline uses whatever is already in place
    pub fn none() -> Self {
        Self::default()
    }

    /// Override for a given role, if any
    pub fn get(&self, role: DatasetRole) -> Option<&PathBuf> {
        match role {
            DatasetRole::PowerSystem => self.power_system.as_ref(),
            DatasetRole::Scenario => self.scenario.as_ref(),
        }
    }
}

/// An input dataset after staging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedInput {
    pub role: DatasetRole,

    /// Where the content came from (override or canonical default)
    pub source: PathBuf,

    /// Where the pipeline reads it
    pub canonical: PathBuf,

    /// Whether the source was copied onto the canonical path
    pub copied: bool,
}
