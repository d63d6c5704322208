//! Command-line interface for resilience-orch.
//!
//! Provides commands for running the assessment pipeline, checking the data
//! directory, and showing the resolved configuration.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::adapters::JuliaAdapter;
use crate::config::{self, ResolvedConfig};
use crate::core::Orchestrator;
use crate::domain::InputOverrides;

/// resilience-orch - Distribution-network resilience assessment orchestrator
#[derive(Parser, Debug)]
#[command(name = "resilience-orch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Workspace root containing the pipeline project
    #[arg(long, global = true, env = "RESILIENCE_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full assessment pipeline
    Run {
        /// Power system dataset to use instead of the one in place
        #[arg(long)]
        power_system: Option<PathBuf>,

        /// Scenario dataset to use instead of the one in place
        #[arg(long)]
        scenario: Option<PathBuf>,
    },

    /// Show presence, size and age of the data files
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        // Loaded per command, never cached
        let cfg = config::load_config(self.workspace)?;

        match self.command {
            Commands::Run {
                power_system,
                scenario,
            } => {
                run_assessment(
                    cfg,
                    InputOverrides {
                        power_system,
                        scenario,
                    },
                )
                .await
            }
            Commands::Status { json } => show_status(cfg, json).await,
            Commands::Config => show_config(&cfg).await,
        }
    }
}

/// Run the pipeline and print the report
async fn run_assessment(cfg: ResolvedConfig, overrides: InputOverrides) -> Result<()> {
    let orchestrator = Orchestrator::new(cfg);
    let outcome = orchestrator.run(overrides).await;

    print!("{}", outcome.text);

    if !outcome.is_success() {
        std::io::stdout().flush().context("Failed to flush report")?;
        std::process::exit(1);
    }

    Ok(())
}

/// Print the data file status
async fn show_status(cfg: ResolvedConfig, json: bool) -> Result<()> {
    let orchestrator = Orchestrator::new(cfg);
    let status = orchestrator.check_status().await;

    if json {
        let out = serde_json::to_string_pretty(&status).context("Failed to serialize status")?;
        println!("{}", out);
    } else {
        print!("{}", status.render());
    }

    Ok(())
}

/// Show resolved configuration
async fn show_config(cfg: &ResolvedConfig) -> Result<()> {
    let layout = cfg.layout();

    println!("Resilience orchestrator configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Paths:");
    println!("  Workspace:   {}", cfg.workspace.display());
    println!("  Project:     {}", cfg.project_dir.display());
    println!("  Data:        {}", layout.data_dir().display());
    println!();
    println!("Solver:");
    println!("  Executable:  {}", cfg.solver.executable.display());
    println!("  Arguments:   {}", cfg.solver.args.join(" "));
    println!(
        "  Bin dir:     {}",
        cfg.solver
            .bin_dir
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string())
    );
    println!("  License:     {}", cfg.solver.license_file.display());
    println!("  Precompile:  {}", if cfg.solver.precompile_auto { "auto" } else { "off" });
    println!("  Timeout:     {}s", cfg.solver.timeout.as_secs());
    match JuliaAdapter::probe(&cfg.solver.executable).await {
        Ok(version) => println!("  Version:     {}", version),
        Err(e) => println!("  Version:     unavailable ({})", e),
    }
    println!();
    println!("Report:");
    println!("  Stdout excerpt limit: {} bytes", cfg.report.stdout_excerpt_limit);

    Ok(())
}
