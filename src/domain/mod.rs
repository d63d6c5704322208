//! Domain types for the resilience orchestrator.
//!
//! This module contains the core data structures:
//! - Dataset: Input files and their canonical roles
//! - Artifact: Pipeline stages and their output files
//! - Run: Invocation results and the final status report

pub mod artifact;
pub mod dataset;
pub mod run;

// Re-export commonly used types
pub use artifact::{ArtifactFile, Stage, StageState, StageStatus};
pub use dataset::{DatasetFile, DatasetRole, InputOverrides, StagedInput};
pub use run::{Execution, RunResult, StatusReport};
