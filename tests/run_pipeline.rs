//! Run Integration Tests
//!
//! End-to-end runs against a scripted stand-in for the solver.

mod common;

use common::{Sandbox, TOUCH_PHASE, TOUCH_TOPOLOGY};
use resilience_orch::domain::Execution;
use resilience_orch::{DatasetRole, InputOverrides, Orchestrator, StageState};

#[tokio::test]
async fn test_fresh_run_all_stages_complete() {
    let sandbox = Sandbox::new();
    sandbox.pipeline(&format!("{}\n{}\necho 'assessment done'\nexit 0", TOUCH_PHASE, TOUCH_TOPOLOGY));

    let outcome = Orchestrator::new(sandbox.config.clone())
        .run(InputOverrides::none())
        .await;

    assert!(outcome.is_success());
    assert_eq!(outcome.report.run_result().unwrap().exit_code, Some(0));
    let states: Vec<StageState> = outcome.report.stages.iter().map(|s| s.state).collect();
    assert_eq!(
        states,
        vec![StageState::Completed, StageState::Completed, StageState::Executed]
    );

    assert!(outcome.text.contains("- Exit code: 0"));
    assert!(outcome.text.contains("✓ **Stage 1 - Scenario phase classification**: completed"));
    assert!(outcome.text.contains("✓ **Stage 2 - Rolling topology reconfiguration**: completed"));
    assert!(outcome.text.contains("assessment done"));
    assert!(!outcome.text.contains("## Error output"));
}

#[tokio::test]
async fn test_missing_power_system_never_invokes_pipeline() {
    let sandbox = Sandbox::new();
    std::fs::remove_file(sandbox.dataset_path(DatasetRole::PowerSystem)).unwrap();
    sandbox.pipeline(&sandbox.record_invocation());

    let outcome = Orchestrator::new(sandbox.config.clone())
        .run(InputOverrides::none())
        .await;

    assert!(!outcome.is_success());
    assert!(!sandbox.marker().exists());
    assert!(outcome.text.contains("MissingInputFile"));
    assert!(outcome.text.contains("power_system"));
    assert!(outcome.report.stages.is_empty());
}

#[tokio::test]
async fn test_stale_artifacts_do_not_count_as_success() {
    let sandbox = Sandbox::new();
    for artifact in sandbox.layout().artifacts() {
        std::fs::write(&artifact.path, b"from a previous run").unwrap();
    }
    sandbox.pipeline("exit 0");

    let outcome = Orchestrator::new(sandbox.config.clone())
        .run(InputOverrides::none())
        .await;

    assert!(outcome.is_success());
    assert_eq!(outcome.report.stages[0].state, StageState::NotProduced);
    assert_eq!(outcome.report.stages[1].state, StageState::NotProduced);
    assert!(sandbox.layout().artifacts().iter().all(|a| !a.path.exists()));
}

#[tokio::test]
async fn test_non_zero_exit_keeps_partial_results() {
    let sandbox = Sandbox::new();
    sandbox.pipeline(&format!(
        "{}\necho 'topology model infeasible' >&2\nexit 1",
        TOUCH_PHASE
    ));

    let outcome = Orchestrator::new(sandbox.config.clone())
        .run(InputOverrides::none())
        .await;

    assert!(!outcome.is_success());
    assert!(matches!(outcome.report.execution, Execution::Finished(_)));
    assert_eq!(outcome.report.stages[0].state, StageState::Completed);
    assert_eq!(outcome.report.stages[1].state, StageState::NotProduced);
    // The process completed, so the opaque stage counts as executed
    assert_eq!(outcome.report.stages[2].state, StageState::Executed);

    assert!(outcome.text.contains("- Exit code: 1"));
    assert!(outcome.text.contains("## Error output"));
    assert!(outcome.text.contains("topology model infeasible"));
}

#[tokio::test]
async fn test_override_is_staged_before_pipeline_reads_it() {
    let sandbox = Sandbox::new();
    let alt = sandbox.external_file("storm_scenarios.xlsx", b"storm scenario set");
    sandbox.pipeline("cat data/mc_simulation_results_k100_clusters.xlsx");

    let outcome = Orchestrator::new(sandbox.config.clone())
        .run(InputOverrides {
            power_system: None,
            scenario: Some(alt.clone()),
        })
        .await;

    assert!(outcome.is_success());
    assert_eq!(
        std::fs::read(sandbox.dataset_path(DatasetRole::Scenario)).unwrap(),
        b"storm scenario set"
    );
    assert_eq!(
        outcome.report.run_result().unwrap().stdout,
        "storm scenario set"
    );
    assert!(outcome
        .text
        .contains(&format!("- Scenario data: {}", alt.display())));
    assert!(outcome.text.contains("  - Staged to: "));

    // The default power system file is left as it was
    assert_eq!(
        std::fs::read(sandbox.dataset_path(DatasetRole::PowerSystem)).unwrap(),
        b"default power_system"
    );
}

#[tokio::test]
async fn test_environment_overlay_reaches_pipeline() {
    let sandbox = Sandbox::new();
    sandbox.pipeline(
        "echo \"license=$GRB_LICENSE_FILE\"\n\
         echo \"precompile=$JULIA_PKG_PRECOMPILE_AUTO\"\n\
         echo \"path=$PATH\"\n\
         echo \"args=$*\"",
    );

    let outcome = Orchestrator::new(sandbox.config.clone())
        .run(InputOverrides::none())
        .await;

    let stdout = &outcome.report.run_result().unwrap().stdout;
    let bin_dir = sandbox.temp.path().join("julia").join("bin");
    assert!(stdout.contains(&format!(
        "license={}",
        sandbox.temp.path().join("gurobi.lic").display()
    )));
    assert!(stdout.contains("precompile=0"));
    assert!(stdout.contains(&format!("path={}:", bin_dir.display())));
    assert!(stdout.contains("args=--full"));
}

#[tokio::test]
async fn test_missing_executable_is_launch_failure() {
    let mut sandbox = Sandbox::new();
    sandbox.config.solver.executable = sandbox.temp.path().join("no-julia-here");

    let outcome = Orchestrator::new(sandbox.config.clone())
        .run(InputOverrides::none())
        .await;

    assert_eq!(outcome.report.error().unwrap().kind(), "LaunchFailure");
    assert!(outcome.report.stages.is_empty());
    assert!(outcome.text.contains("- Error: LaunchFailure"));
}

#[tokio::test]
async fn test_repeated_runs_are_independent() {
    let sandbox = Sandbox::new();
    sandbox.pipeline(&format!("{}\n{}", TOUCH_PHASE, TOUCH_TOPOLOGY));
    let orchestrator = Orchestrator::new(sandbox.config.clone());

    let first = orchestrator.run(InputOverrides::none()).await;
    assert!(first.report.stages.iter().all(|s| s.state.is_done()));

    // Second run produces nothing; the first run's files must not leak in
    sandbox.pipeline("exit 0");
    let second = orchestrator.run(InputOverrides::none()).await;
    assert_eq!(second.report.stages[0].state, StageState::NotProduced);
    assert_eq!(second.report.stages[1].state, StageState::NotProduced);
}

#[tokio::test]
async fn test_aliased_override_keeps_canonical_dataset_intact() {
    let sandbox = Sandbox::new();
    sandbox.pipeline("exit 0");
    let canonical = sandbox.dataset_path(DatasetRole::PowerSystem);
    let before = std::fs::read(&canonical).unwrap();
    let data_dir = sandbox.layout().data_dir().to_path_buf();
    let aliased = data_dir
        .join("..")
        .join(data_dir.file_name().unwrap())
        .join(canonical.file_name().unwrap());

    let outcome = Orchestrator::new(sandbox.config.clone())
        .run(InputOverrides {
            power_system: Some(aliased),
            scenario: None,
        })
        .await;

    assert!(outcome.is_success());
    assert!(!outcome.report.inputs[0].copied);
    assert_eq!(std::fs::read(&canonical).unwrap(), before);
}

#[tokio::test]
async fn test_copy_failure_aborts_before_pipeline() {
    let sandbox = Sandbox::new();
    sandbox.pipeline(&sandbox.record_invocation());
    // A directory exists but cannot be copied as a dataset
    let bad_source = sandbox.temp.path().join("scenario_dir");
    std::fs::create_dir_all(&bad_source).unwrap();

    let outcome = Orchestrator::new(sandbox.config.clone())
        .run(InputOverrides {
            power_system: None,
            scenario: Some(bad_source),
        })
        .await;

    assert!(!outcome.is_success());
    assert!(!sandbox.marker().exists());
    assert_eq!(outcome.report.error().unwrap().kind(), "CopyFailure");
    assert!(outcome.text.contains("- Error: CopyFailure"));
    assert!(outcome.report.stages.is_empty());
    assert_eq!(
        std::fs::read(sandbox.dataset_path(DatasetRole::Scenario)).unwrap(),
        b"default scenario"
    );
}

#[tokio::test]
async fn test_invalidation_warning_appears_in_report() {
    let sandbox = Sandbox::new();
    sandbox.pipeline("exit 0");
    // A non-empty directory on an artifact path cannot be removed as a file
    let blocked = sandbox.layout().artifacts()[1].path.clone();
    std::fs::create_dir_all(blocked.join("nested")).unwrap();

    let outcome = Orchestrator::new(sandbox.config.clone())
        .run(InputOverrides::none())
        .await;

    assert!(outcome.is_success());
    assert_eq!(outcome.report.warnings.len(), 1);
    assert!(outcome.text.contains("## Warnings"));
    assert!(outcome.text.contains("Could not remove stale output"));
    assert!(outcome.text.contains(&blocked.display().to_string()));
}
