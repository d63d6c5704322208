//! Subprocess adapter for the Julia assessment project.
//!
//! Spawns the solver in the project root, drains both output streams while
//! it runs, and kills it when the deadline passes.

use std::path::Path;
use std::process::Stdio;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

use super::{PipelineExecutor, PipelineInvocation};
use crate::core::OrchestrationError;
use crate::domain::RunResult;

/// Pipeline executor that launches the solver as a child process
#[derive(Debug, Default, Clone)]
pub struct JuliaAdapter;

impl JuliaAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Ask an executable for its version, to check it can be launched
    pub async fn probe(program: &Path) -> Result<String> {
        let output = Command::new(program)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .await
            .with_context(|| format!("Failed to run {}", program.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("{} --version failed: {}", program.display(), stderr.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Read a stream to the end, tolerating invalid UTF-8
fn drain<R>(stream: Option<R>) -> Option<JoinHandle<String>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    stream.map(|mut s| {
        tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Err(e) = s.read_to_end(&mut buf).await {
                debug!(error = %e, "Output stream closed with error");
            }
            String::from_utf8_lossy(&buf).into_owned()
        })
    })
}

async fn collect(handle: &mut Option<JoinHandle<String>>) -> String {
    match handle {
        Some(h) => h.await.unwrap_or_default(),
        None => String::new(),
    }
}

/// Kill the pipeline together with everything it started, then reap it
///
/// The child leads its own process group, so signalling the group also
/// reaches solver workers that outlived or detached from the shell.
async fn terminate(child: &mut Child, pgid: Option<u32>) {
    #[cfg(unix)]
    {
        if let Some(pgid) = pgid {
            // SAFETY: killpg only sends a signal; the group was created for this child
            let rc = unsafe { libc::killpg(pgid as libc::pid_t, libc::SIGKILL) };
            if rc != 0 {
                debug!(pgid, error = %std::io::Error::last_os_error(), "Process group already gone");
            }
        }
    }
    #[cfg(not(unix))]
    let _ = pgid;

    match child.try_wait() {
        Ok(Some(_)) => {}
        _ => {
            // kill() signals and then reaps the child
            if let Err(e) = child.kill().await {
                warn!(error = %e, "Failed to terminate pipeline process");
            }
        }
    }
}

#[async_trait]
impl PipelineExecutor for JuliaAdapter {
    fn name(&self) -> &str {
        "julia"
    }

    async fn execute(
        &self,
        invocation: &PipelineInvocation,
    ) -> Result<RunResult, OrchestrationError> {
        let launch_failure = |source: std::io::Error| OrchestrationError::LaunchFailure {
            program: invocation.program.clone(),
            source,
        };

        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .current_dir(&invocation.working_dir)
            .envs(invocation.env.vars(std::env::var_os("PATH")))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        command.process_group(0);

        let mut child = command.spawn().map_err(launch_failure)?;

        let started = Instant::now();
        let deadline = started + invocation.timeout;
        let pgid = child.id();
        info!(
            program = %invocation.program.display(),
            cwd = %invocation.working_dir.display(),
            pid = ?pgid,
            "Pipeline process started"
        );

        let mut stdout = drain(child.stdout.take());
        let mut stderr = drain(child.stderr.take());

        // The ceiling covers the output too: a background process can hold
        // the pipes open after the pipeline itself has exited.
        let finished = timeout_at(deadline, async {
            let status = child.wait().await?;
            let out = collect(&mut stdout).await;
            let err = collect(&mut stderr).await;
            Ok::<_, std::io::Error>((status, out, err))
        })
        .await;

        match finished {
            Ok(Ok((status, stdout, stderr))) => {
                let result = RunResult {
                    exit_code: status.code(),
                    stdout,
                    stderr,
                    elapsed: started.elapsed(),
                };
                info!(
                    exit_code = ?result.exit_code,
                    elapsed_ms = result.elapsed.as_millis() as u64,
                    "Pipeline process exited"
                );
                Ok(result)
            }
            // The process was started but could not be waited on
            Ok(Err(source)) => {
                terminate(&mut child, pgid).await;
                Err(launch_failure(source))
            }
            Err(_) => {
                warn!(
                    limit_secs = invocation.timeout.as_secs(),
                    "Pipeline exceeded time limit, terminating"
                );
                terminate(&mut child, pgid).await;
                for handle in [stdout, stderr].into_iter().flatten() {
                    handle.abort();
                }
                Err(OrchestrationError::ExecutionTimeout {
                    limit: invocation.timeout,
                })
            }
        }
    }
}
