//! Outcome of a single pipeline invocation and the report built from it.

use std::time::Duration;

use serde::Serialize;

use super::artifact::StageStatus;
use super::dataset::StagedInput;
use crate::core::OrchestrationError;

/// What the external process returned
///
/// Lives for one run only; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunResult {
    /// Exit code; `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,

    /// Captured standard output
    pub stdout: String,

    /// Captured standard error
    pub stderr: String,

    /// Wall time spent in the external process
    #[serde(with = "duration_secs")]
    pub elapsed: Duration,
}

impl RunResult {
    /// Whether the pipeline signalled success
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// How the run ended
#[derive(Debug)]
pub enum Execution {
    /// The external process ran and exited (with any exit code)
    Finished(RunResult),

    /// The run stopped early
    Aborted(OrchestrationError),
}

/// Everything known about a run, assembled once the run is over
#[derive(Debug)]
pub struct StatusReport {
    /// Inputs as staged; empty when the run aborted before staging
    pub inputs: Vec<StagedInput>,

    pub execution: Execution,

    /// Per-stage status; empty when the pipeline was never started
    pub stages: Vec<StageStatus>,

    /// Non-fatal problems (e.g. stale artifacts that could not be removed)
    pub warnings: Vec<String>,
}

impl StatusReport {
    /// Report for a run that stopped before the pipeline could be inspected
    pub fn aborted(error: OrchestrationError) -> Self {
        Self {
            inputs: Vec::new(),
            execution: Execution::Aborted(error),
            stages: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Success means the pipeline ran and exited with 0
    pub fn is_success(&self) -> bool {
        matches!(&self.execution, Execution::Finished(result) if result.success())
    }

    /// The run result, if the pipeline ran to completion
    pub fn run_result(&self) -> Option<&RunResult> {
        match &self.execution {
            Execution::Finished(result) => Some(result),
            Execution::Aborted(_) => None,
        }
    }

    /// The aborting error, if any
    pub fn error(&self) -> Option<&OrchestrationError> {
        match &self.execution {
            Execution::Finished(_) => None,
            Execution::Aborted(e) => Some(e),
        }
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::Serializer;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(exit_code: Option<i32>) -> RunResult {
        RunResult {
            exit_code,
            stdout: String::new(),
            stderr: String::new(),
            elapsed: Duration::from_secs(1),
        }
    }

    #[test]
    fn test_success_requires_zero_exit() {
        assert!(result(Some(0)).success());
        assert!(!result(Some(1)).success());
        assert!(!result(None).success());
    }

    #[test]
    fn test_report_success_follows_exit_code() {
        let report = StatusReport {
            inputs: Vec::new(),
            execution: Execution::Finished(result(Some(0))),
            stages: Vec::new(),
            warnings: Vec::new(),
        };
        assert!(report.is_success());
        assert!(report.error().is_none());

        let aborted = StatusReport::aborted(OrchestrationError::ExecutionTimeout {
            limit: Duration::from_secs(5),
        });
        assert!(!aborted.is_success());
        assert!(aborted.run_result().is_none());
    }

    #[test]
    fn test_run_result_serializes_elapsed_as_seconds() {
        let json = serde_json::to_value(result(Some(0))).unwrap();
        assert_eq!(json["elapsed"], 1.0);
        assert_eq!(json["exit_code"], 0);
    }
}
