//! Configuration for the resilience orchestrator.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (RESILIENCE_WORKSPACE, RESILIENCE_SOLVER,
//!    RESILIENCE_LICENSE_FILE, RESILIENCE_TIMEOUT_SECS)
//! 2. Config file (.resilience/config.yaml)
//! 3. Defaults (/workspace/projects, ~/julia-1.11.7, ~/gurobi.lic)
//!
//! Config file discovery:
//! - Searches current directory and parents for .resilience/config.yaml
//! - Relative paths in the config file are relative to the directory that
//!   contains `.resilience/`
//!
//! Configuration is loaded at the start of every operation and never cached,
//! so edits take effect on the next call.

pub mod paths;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use self::paths::{DataLayout, DEFAULT_PROJECT_DIR};

/// Default workspace root when nothing else is configured
pub const DEFAULT_WORKSPACE: &str = "/workspace/projects";

/// Solver toolchain installed under the home directory
const DEFAULT_JULIA_HOME: &str = "julia-1.11.7";
const DEFAULT_LICENSE_FILE: &str = "gurobi.lic";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    pub workspace: Option<String>,
    pub project_dir: Option<String>,
    #[serde(default)]
    pub solver: Option<SolverConfig>,
    #[serde(default)]
    pub report: Option<ReportConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SolverConfig {
    pub executable: Option<String>,
    pub args: Option<Vec<String>>,
    pub bin_dir: Option<String>,
    pub license_file: Option<String>,
    pub precompile_auto: Option<bool>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportConfig {
    pub stdout_excerpt_limit: Option<usize>,
}

/// Environment variable overrides
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub workspace: Option<PathBuf>,
    pub solver: Option<PathBuf>,
    pub license_file: Option<PathBuf>,
    pub timeout_seconds: Option<u64>,
}

impl EnvOverrides {
    /// Read overrides from the process environment
    pub fn from_env() -> Result<Self> {
        let timeout_seconds = match std::env::var("RESILIENCE_TIMEOUT_SECS") {
            Ok(raw) => Some(
                raw.trim()
                    .parse::<u64>()
                    .with_context(|| format!("Invalid RESILIENCE_TIMEOUT_SECS: {}", raw))?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            workspace: std::env::var_os("RESILIENCE_WORKSPACE").map(PathBuf::from),
            solver: std::env::var_os("RESILIENCE_SOLVER").map(PathBuf::from),
            license_file: std::env::var_os("RESILIENCE_LICENSE_FILE").map(PathBuf::from),
            timeout_seconds,
        })
    }
}

/// Settings for launching the external pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct SolverSettings {
    /// Executable to launch (bare names are looked up on PATH)
    pub executable: PathBuf,

    /// Arguments; the default runs the full pipeline
    pub args: Vec<String>,

    /// Directory prepended to PATH for the child
    pub bin_dir: Option<PathBuf>,

    /// Solver license location (GRB_LICENSE_FILE)
    pub license_file: PathBuf,

    /// Let the solver precompile dependencies on every launch
    pub precompile_auto: bool,

    /// Hard wall-clock ceiling for one invocation
    pub timeout: Duration,
}

impl SolverSettings {
    pub fn default_args() -> Vec<String> {
        vec![
            "--project=.".to_string(),
            "main.jl".to_string(),
            "--full".to_string(),
        ]
    }

    /// Defaults relative to a home directory
    pub fn with_home(home: Option<&Path>) -> Self {
        let julia_bin = home.map(|h| h.join(DEFAULT_JULIA_HOME).join("bin"));

        // Prefer the bundled toolchain, fall back to PATH lookup
        let executable = match &julia_bin {
            Some(bin) if bin.join("julia").exists() => bin.join("julia"),
            _ => PathBuf::from("julia"),
        };

        let license_file = home
            .map(|h| h.join(DEFAULT_LICENSE_FILE))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LICENSE_FILE));

        Self {
            executable,
            args: Self::default_args(),
            bin_dir: julia_bin,
            license_file,
            precompile_auto: false,
            timeout: Duration::from_secs(3600),
        }
    }
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self::with_home(dirs::home_dir().as_deref())
    }
}

/// Settings for rendering run reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSettings {
    /// Stdout is embedded only when shorter than this many bytes
    pub stdout_excerpt_limit: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            stdout_excerpt_limit: 2000,
        }
    }
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Workspace root
    pub workspace: PathBuf,
    /// Pipeline project root (working directory of the child)
    pub project_dir: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    pub solver: SolverSettings,
    pub report: ReportSettings,
}

impl ResolvedConfig {
    /// Defaults for a workspace root
    pub fn for_workspace(workspace: impl Into<PathBuf>) -> Self {
        let workspace = workspace.into();
        Self {
            project_dir: workspace.join(DEFAULT_PROJECT_DIR),
            workspace,
            config_file: None,
            solver: SolverSettings::default(),
            report: ReportSettings::default(),
        }
    }

    /// Canonical file layout of the project
    pub fn layout(&self) -> DataLayout {
        DataLayout::for_project(&self.project_dir)
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".resilience").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Expand a leading `~/` and resolve relative paths against `base`
fn resolve_path(base: &Path, path_str: &str, home: Option<&Path>) -> PathBuf {
    if let (Some(rest), Some(home)) = (path_str.strip_prefix("~/"), home) {
        return home.join(rest);
    }

    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Merge a config file and env overrides over the defaults
fn resolve(
    file: Option<(&Path, &ConfigFile)>,
    env: &EnvOverrides,
    home: Option<&Path>,
) -> ResolvedConfig {
    let defaults = SolverSettings::with_home(home);

    // Base directory is the parent of .resilience/
    let base_dir = file
        .and_then(|(path, _)| path.parent())
        .and_then(|p| p.parent())
        .unwrap_or(Path::new("."))
        .to_path_buf();
    let config = file.map(|(_, c)| c);
    let solver = config.and_then(|c| c.solver.clone()).unwrap_or_default();
    let report = config.and_then(|c| c.report.clone()).unwrap_or_default();

    let workspace = env
        .workspace
        .clone()
        .or_else(|| {
            config
                .and_then(|c| c.workspace.as_deref())
                .map(|w| resolve_path(&base_dir, w, home))
        })
        .unwrap_or_else(|| PathBuf::from(DEFAULT_WORKSPACE));

    let project_dir = workspace.join(
        config
            .and_then(|c| c.project_dir.as_deref())
            .unwrap_or(DEFAULT_PROJECT_DIR),
    );

    let executable = env
        .solver
        .clone()
        .or_else(|| {
            solver.executable.as_deref().map(|e| {
                // Bare command names stay bare so they are looked up on PATH
                if e.contains('/') {
                    resolve_path(&base_dir, e, home)
                } else {
                    PathBuf::from(e)
                }
            })
        })
        .unwrap_or(defaults.executable);

    let license_file = env
        .license_file
        .clone()
        .or_else(|| {
            solver
                .license_file
                .as_deref()
                .map(|l| resolve_path(&base_dir, l, home))
        })
        .unwrap_or(defaults.license_file);

    let bin_dir = solver
        .bin_dir
        .as_deref()
        .map(|b| resolve_path(&base_dir, b, home))
        .or(defaults.bin_dir);

    let timeout = env
        .timeout_seconds
        .or(solver.timeout_seconds)
        .map(Duration::from_secs)
        .unwrap_or(defaults.timeout);

    ResolvedConfig {
        workspace,
        project_dir,
        config_file: file.map(|(p, _)| p.to_path_buf()),
        solver: SolverSettings {
            executable,
            args: solver.args.unwrap_or(defaults.args),
            bin_dir,
            license_file,
            precompile_auto: solver.precompile_auto.unwrap_or(defaults.precompile_auto),
            timeout,
        },
        report: ReportSettings {
            stdout_excerpt_limit: report
                .stdout_excerpt_limit
                .unwrap_or_else(|| ReportSettings::default().stdout_excerpt_limit),
        },
    }
}

/// Load configuration from all sources
///
/// `workspace` takes precedence over every other workspace source (it comes
/// from the command line).
pub fn load_config(workspace: Option<PathBuf>) -> Result<ResolvedConfig> {
    let mut env = EnvOverrides::from_env()?;
    if workspace.is_some() {
        env.workspace = workspace;
    }

    let home = dirs::home_dir();

    let config = match find_config_file() {
        Some(path) => {
            let file = load_config_file(&path)?;
            resolve(Some((&path, &file)), &env, home.as_deref())
        }
        None => resolve(None, &env, home.as_deref()),
    };

    Ok(config)
}
