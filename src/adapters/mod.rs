//! Adapter interfaces for the external pipeline.
//!
//! Adapters launch the numerical pipeline and hand back what it produced on
//! its standard streams. The orchestrator never sees a process handle.

pub mod julia;

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::ResolvedConfig;
use crate::core::OrchestrationError;
use crate::domain::RunResult;

// Re-export the subprocess adapter
pub use julia::JuliaAdapter;

/// Environment overlay applied on top of the inherited environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverEnvironment {
    /// Directories prepended to PATH, in order
    pub path_prepend: Vec<PathBuf>,

    /// Solver license file (GRB_LICENSE_FILE)
    pub license_file: PathBuf,

    /// Automatic dependency precompilation (JULIA_PKG_PRECOMPILE_AUTO)
    pub precompile_auto: bool,
}

impl SolverEnvironment {
    /// Variables to set on the child, given the inherited PATH
    pub fn vars(&self, inherited_path: Option<OsString>) -> Vec<(String, OsString)> {
        let mut vars = Vec::with_capacity(3);

        if !self.path_prepend.is_empty() {
            let inherited = inherited_path.unwrap_or_default();
            let entries = self
                .path_prepend
                .iter()
                .cloned()
                .chain(std::env::split_paths(&inherited));
            // join_paths only fails on entries containing the separator
            if let Ok(path) = std::env::join_paths(entries) {
                vars.push(("PATH".to_string(), path));
            }
        }

        vars.push((
            "GRB_LICENSE_FILE".to_string(),
            self.license_file.clone().into_os_string(),
        ));
        vars.push((
            "JULIA_PKG_PRECOMPILE_AUTO".to_string(),
            OsString::from(if self.precompile_auto { "1" } else { "0" }),
        ));

        vars
    }
}

/// Everything needed to launch the pipeline once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineInvocation {
    pub program: PathBuf,
    pub args: Vec<String>,

    /// Pipeline project root
    pub working_dir: PathBuf,

    pub env: SolverEnvironment,

    /// Hard wall-clock ceiling
    pub timeout: Duration,
}

impl PipelineInvocation {
    pub fn from_config(config: &ResolvedConfig) -> Self {
        let solver = &config.solver;
        Self {
            program: solver.executable.clone(),
            args: solver.args.clone(),
            working_dir: config.project_dir.clone(),
            env: SolverEnvironment {
                path_prepend: solver.bin_dir.iter().cloned().collect(),
                license_file: solver.license_file.clone(),
                precompile_auto: solver.precompile_auto,
            },
            timeout: solver.timeout,
        }
    }
}

/// Trait for pipeline executors
#[async_trait]
pub trait PipelineExecutor: Send + Sync {
    /// Human-readable executor name
    fn name(&self) -> &str;

    /// Run the pipeline to completion or until the invocation's timeout
    ///
    /// A non-zero exit is returned as `Ok`; only launch failures and
    /// timeouts are errors.
    async fn execute(
        &self,
        invocation: &PipelineInvocation,
    ) -> Result<RunResult, OrchestrationError>;
}
