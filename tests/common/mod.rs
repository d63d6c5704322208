//! Shared sandbox for integration tests.
//!
//! Builds a throwaway workspace whose "solver" is `sh` running a script in
//! the project root, so each test controls exactly what the pipeline does.

#![allow(dead_code)]

use std::path::PathBuf;
use std::time::Duration;

use resilience_orch::config::paths::DataLayout;
use resilience_orch::config::{ReportSettings, ResolvedConfig, SolverSettings};
use resilience_orch::DatasetRole;
use tempfile::TempDir;

pub const SCRIPT: &str = "fake_pipeline.sh";

/// Script line that creates a stage artifact
pub const TOUCH_PHASE: &str = "touch data/scenario_phase_classification.xlsx";
pub const TOUCH_TOPOLOGY: &str = "touch data/topology_reconfiguration_results.xlsx";

pub struct Sandbox {
    pub temp: TempDir,
    pub config: ResolvedConfig,
}

impl Sandbox {
    /// Workspace with both default datasets in place
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let workspace = temp.path().join("workspace");
        let mut config = ResolvedConfig::for_workspace(&workspace);
        config.solver = SolverSettings {
            executable: PathBuf::from("sh"),
            args: vec![SCRIPT.to_string(), "--full".to_string()],
            bin_dir: Some(temp.path().join("julia").join("bin")),
            license_file: temp.path().join("gurobi.lic"),
            precompile_auto: false,
            timeout: Duration::from_secs(30),
        };
        config.report = ReportSettings::default();

        let layout = config.layout();
        std::fs::create_dir_all(layout.data_dir()).unwrap();
        for dataset in layout.datasets() {
            std::fs::write(&dataset.path, format!("default {}", dataset.role)).unwrap();
        }

        Self { temp, config }
    }

    pub fn layout(&self) -> DataLayout {
        self.config.layout()
    }

    pub fn dataset_path(&self, role: DatasetRole) -> PathBuf {
        self.layout().dataset(role).path
    }

    /// Install the fake pipeline body
    pub fn pipeline(&self, body: &str) {
        let script = format!("#!/bin/sh\n{}\n", body);
        std::fs::write(self.config.project_dir.join(SCRIPT), script).unwrap();
    }

    /// Write a file outside the project, e.g. an override dataset
    pub fn external_file(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.temp.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn marker(&self) -> PathBuf {
        self.temp.path().join("invoked")
    }

    /// Script line that records the pipeline was started
    pub fn record_invocation(&self) -> String {
        format!("touch '{}'", self.marker().display())
    }
}
