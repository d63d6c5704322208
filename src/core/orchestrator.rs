//! Main orchestrator for assessment runs.
//!
//! Coordinates input staging, artifact invalidation, the external pipeline
//! invocation, stage inspection and report rendering, strictly in that
//! order.

use std::sync::Arc;

use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::adapters::{JuliaAdapter, PipelineExecutor, PipelineInvocation};
use crate::config::ResolvedConfig;
use crate::domain::{Execution, InputOverrides, StatusReport};

use super::data_status::{DataStatus, DataStatusReporter};
use super::error::OrchestrationError;
use super::inspector::ResultInspector;
use super::invalidator::OutputInvalidator;
use super::lock::RunLock;
use super::report::ReportBuilder;
use super::stager::InputStager;

/// Result of one run: the report and its rendering
#[derive(Debug)]
pub struct RunOutcome {
    pub report: StatusReport,
    pub text: String,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        self.report.is_success()
    }
}

/// Main assessment orchestrator
pub struct Orchestrator {
    config: ResolvedConfig,

    /// Executor for the external pipeline
    executor: Arc<dyn PipelineExecutor>,
}

impl Orchestrator {
    /// Create an orchestrator that launches the pipeline as a subprocess
    pub fn new(config: ResolvedConfig) -> Self {
        Self::with_executor(config, Arc::new(JuliaAdapter::new()))
    }

    /// Create an orchestrator with a custom executor
    pub fn with_executor(config: ResolvedConfig, executor: Arc<dyn PipelineExecutor>) -> Self {
        Self { config, executor }
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Execute a full assessment run
    ///
    /// Never fails: every error ends up in the returned report.
    #[instrument(skip(self, overrides), fields(run_id = %Uuid::new_v4()))]
    pub async fn run(&self, overrides: InputOverrides) -> RunOutcome {
        let report = self.execute(&overrides).await;
        let text = ReportBuilder::new(&self.config.report).render(&report);

        if report.is_success() {
            info!("Run completed successfully");
        } else if let Some(e) = report.error() {
            error!(kind = e.kind(), error = %e, "Run aborted");
        } else {
            warn!("Pipeline finished with a non-zero exit");
        }

        RunOutcome { report, text }
    }

    async fn execute(&self, overrides: &InputOverrides) -> StatusReport {
        let layout = self.config.layout();
        let stager = InputStager::new(layout.clone());

        // Verify sources before touching anything
        let resolved = match stager.resolve(overrides).await {
            Ok(resolved) => resolved,
            Err(e) => return StatusReport::aborted(e),
        };

        let _lock = match RunLock::acquire(&layout) {
            Ok(lock) => lock,
            Err(e) => {
                let mut report = StatusReport::aborted(e);
                report.inputs = resolved.inputs().to_vec();
                return report;
            }
        };

        let fallback_inputs = resolved.inputs().to_vec();
        let inputs = match stager.stage(resolved).await {
            Ok(inputs) => inputs,
            Err(e) => {
                let mut report = StatusReport::aborted(e);
                report.inputs = fallback_inputs;
                return report;
            }
        };

        let warnings = OutputInvalidator::new(layout.clone()).invalidate().await;

        let invocation = PipelineInvocation::from_config(&self.config);
        info!(
            executor = self.executor.name(),
            timeout_secs = invocation.timeout.as_secs(),
            "Invoking pipeline"
        );
        let execution = self.executor.execute(&invocation).await;

        let inspector = ResultInspector::new(layout);
        let (execution, stages) = match execution {
            Ok(result) => (Execution::Finished(result), inspector.inspect(true).await),
            Err(e @ OrchestrationError::ExecutionTimeout { .. }) => {
                (Execution::Aborted(e), inspector.inspect(false).await)
            }
            Err(e) => (Execution::Aborted(e), Vec::new()),
        };

        StatusReport {
            inputs,
            execution,
            stages,
            warnings,
        }
    }

    /// Report presence, size and age of the canonical files
    ///
    /// Read-only; safe to call while a run is in progress.
    #[instrument(skip(self))]
    pub async fn check_status(&self) -> DataStatus {
        DataStatusReporter::new(self.config.layout()).check().await
    }
}
