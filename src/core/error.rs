//! Errors that stop a run before it can be reported normally.
//!
//! A non-zero pipeline exit is deliberately absent: it is a normal outcome
//! that still gets inspected and reported.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::domain::DatasetRole;

#[derive(Debug, Error)]
pub enum OrchestrationError {
    #[error("Input file not found for {role}: {}", path.display())]
    MissingInputFile { role: DatasetRole, path: PathBuf },

    #[error("Failed to copy {role} data from {} to {}: {source}", from.display(), to.display())]
    CopyFailure {
        role: DatasetRole,
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to launch pipeline executable {}: {source}", program.display())]
    LaunchFailure {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Pipeline exceeded the {}s time limit and was terminated", limit.as_secs())]
    ExecutionTimeout { limit: Duration },

    #[error("Another run is already in progress for {}", data_dir.display())]
    RunInProgress { data_dir: PathBuf },

    #[error("Failed to open run lock {}: {source}", path.display())]
    Lock {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl OrchestrationError {
    /// Stable name of the error kind, as shown in reports
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingInputFile { .. } => "MissingInputFile",
            Self::CopyFailure { .. } => "CopyFailure",
            Self::LaunchFailure { .. } => "LaunchFailure",
            Self::ExecutionTimeout { .. } => "ExecutionTimeout",
            Self::RunInProgress { .. } => "RunInProgress",
            Self::Lock { .. } => "LockFailure",
        }
    }

    /// Whether the error happened before the pipeline was started
    pub fn before_launch(&self) -> bool {
        !matches!(self, Self::ExecutionTimeout { .. })
    }
}
