//! Rendering of run reports.
//!
//! Output is a pure function of the [`StatusReport`] and the builder's
//! settings: sections always appear in the same order, and optional sections
//! are either present in full or absent.

use crate::config::ReportSettings;
use crate::domain::{Execution, RunResult, StageState, StageStatus, StagedInput, StatusReport};

use super::error::OrchestrationError;

/// Formats a [`StatusReport`] as markdown-flavoured text
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    stdout_excerpt_limit: usize,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new(&ReportSettings::default())
    }
}

impl ReportBuilder {
    pub fn new(settings: &ReportSettings) -> Self {
        Self {
            stdout_excerpt_limit: settings.stdout_excerpt_limit,
        }
    }

    pub fn render(&self, report: &StatusReport) -> String {
        let mut lines = Vec::new();

        match &report.execution {
            Execution::Finished(result) => {
                lines.push(if result.success() {
                    "# Resilience assessment completed".to_string()
                } else {
                    "# Resilience assessment finished with errors".to_string()
                });
                lines.push(String::new());
                self.execution_section(&mut lines, result);
            }
            Execution::Aborted(error) => {
                lines.push("# Resilience assessment aborted".to_string());
                lines.push(String::new());
                abort_section(&mut lines, error);
            }
        }

        if !report.inputs.is_empty() {
            inputs_section(&mut lines, &report.inputs);
        }

        if !report.stages.is_empty() {
            stages_section(&mut lines, &report.stages);
        }

        if !report.warnings.is_empty() {
            lines.push(String::new());
            lines.push("## Warnings".to_string());
            for warning in &report.warnings {
                lines.push(format!("- {}", warning));
            }
        }

        if let Execution::Finished(result) = &report.execution {
            self.output_sections(&mut lines, result);
        }

        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    fn execution_section(&self, lines: &mut Vec<String>, result: &RunResult) {
        lines.push("## Execution status".to_string());
        match result.exit_code {
            Some(code) => lines.push(format!("- Exit code: {}", code)),
            None => lines.push("- Exit code: none (terminated by signal)".to_string()),
        }
        lines.push(format!("- Duration: {:.1}s", result.elapsed.as_secs_f64()));
    }

    fn output_sections(&self, lines: &mut Vec<String>, result: &RunResult) {
        if !result.stdout.is_empty() && result.stdout.len() < self.stdout_excerpt_limit {
            lines.push(String::new());
            lines.push("## Execution log".to_string());
            fenced(lines, &result.stdout);
        }

        if !result.success() {
            lines.push(String::new());
            lines.push("## Error output".to_string());
            fenced(lines, &result.stderr);
        }
    }
}

fn abort_section(lines: &mut Vec<String>, error: &OrchestrationError) {
    lines.push("## Execution status".to_string());
    lines.push(format!("- Error: {}", error.kind()));

    match error {
        OrchestrationError::ExecutionTimeout { .. } => {
            lines.push(format!("- Execution was aborted due to timeout: {}", error));
            lines.push(
                "- Suggestion: check the input data or reduce the computation parameters"
                    .to_string(),
            );
        }
        _ => {
            lines.push(format!("- Details: {}", error));
            if error.before_launch() {
                lines.push("- The pipeline was not started".to_string());
            }
        }
    }
}

fn inputs_section(lines: &mut Vec<String>, inputs: &[StagedInput]) {
    lines.push(String::new());
    lines.push("## Input data".to_string());
    for input in inputs {
        lines.push(format!("- {}: {}", input.role.label(), input.source.display()));
        if input.copied {
            lines.push(format!("  - Staged to: {}", input.canonical.display()));
        }
    }
}

fn stages_section(lines: &mut Vec<String>, stages: &[StageStatus]) {
    lines.push(String::new());
    lines.push("## Pipeline stages".to_string());
    for status in stages {
        let marker = if status.state.is_done() { "✓" } else { "✗" };
        let outcome = match status.state {
            StageState::Completed => "completed",
            StageState::NotProduced => "output file not produced",
            StageState::Executed => "executed",
            StageState::NotExecuted => "not executed",
        };
        lines.push(format!(
            "{} **Stage {} - {}**: {}",
            marker,
            status.stage.number(),
            status.stage.label(),
            outcome
        ));

        match (status.state, &status.artifact) {
            (StageState::Completed, Some(path)) => {
                lines.push(format!("  - Output file: {}", path.display()));
            }
            (StageState::Executed, None) => {
                lines.push("  - Results are written by the pipeline (no dedicated output file)".to_string());
            }
            _ => {}
        }
    }
}

fn fenced(lines: &mut Vec<String>, body: &str) {
    lines.push("```".to_string());
    lines.push(body.trim_end().to_string());
    lines.push("```".to_string());
}
