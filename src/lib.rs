//! resilience-orch - Orchestrator for the distribution-network resilience
//! assessment pipeline
//!
//! Drives an external numerical pipeline (a Julia project solved with
//! Gurobi) through one full assessment run and reports what it produced.
//! The numerical work itself happens entirely in the child process.
//!
//! # Architecture
//!
//! A run is a fixed sequence over the project's data directory:
//! - Stage the two input datasets onto their canonical paths
//! - Delete result files left over from earlier runs
//! - Launch the pipeline under a wall-clock ceiling
//! - Check which stages left their result file behind
//! - Render a deterministic text report
//!
//! # Modules
//!
//! - `adapters`: External pipeline launch (subprocess)
//! - `core`: Orchestration logic (staging, inspection, reports, locking)
//! - `domain`: Data structures (datasets, stages, run results)
//! - `config`: Layered configuration and canonical paths
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Run the full assessment with the data already in place
//! resilience-orch run
//!
//! # Run with a different scenario file
//! resilience-orch run --scenario ./scenarios.xlsx
//!
//! # Check which data files are present
//! resilience-orch status
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;

// Re-export main types at crate root for convenience
pub use crate::core::{DataStatus, OrchestrationError, Orchestrator, RunOutcome};
pub use crate::domain::{DatasetRole, InputOverrides, Stage, StageState, StatusReport};
