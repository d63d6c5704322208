//! Core orchestration logic.
//!
//! This module contains:
//! - Stager: Input dataset staging
//! - Invalidator: Stale artifact removal
//! - Inspector: Post-run stage status
//! - Report: Run report rendering
//! - DataStatus: Read-only file status
//! - Lock: Single-run exclusion per data directory
//! - Orchestrator: Main execution engine

pub mod data_status;
pub mod error;
pub mod inspector;
pub mod invalidator;
pub mod lock;
pub mod orchestrator;
pub mod report;
pub mod stager;

// Re-export commonly used types
pub use data_status::{format_size, DataStatus, DataStatusReporter, FileMetadata, FileStatus};
pub use error::OrchestrationError;
pub use inspector::ResultInspector;
pub use invalidator::OutputInvalidator;
pub use lock::RunLock;
pub use orchestrator::{Orchestrator, RunOutcome};
pub use report::ReportBuilder;
pub use stager::{InputStager, ResolvedInputs};
