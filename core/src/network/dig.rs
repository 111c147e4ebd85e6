//! Subprocess adapter for the external query tool.

use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use nsaudit_common::error::ProbeExecutionError;
use nsaudit_common::probe::{AttemptStatus, ProbeAttempt, QueryRunner};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tracing::{debug, warn};

/// Runs `dig` (or a compatible tool) once per attempt.
///
/// Children are spawned with `kill_on_drop`, so dropping an in-flight [`QueryRunner::run`]
/// future still terminates the process. On timeout the child is killed and reaped before the
/// attempt is returned.
#[derive(Debug, Clone)]
pub struct DigRunner {
    tool: PathBuf,
}

impl DigRunner {
    pub fn new(tool: impl Into<PathBuf>) -> Self {
        Self { tool: tool.into() }
    }

    async fn execute(
        &self,
        args: &[String],
        deadline: Duration,
    ) -> Result<(ExitStatus, Vec<u8>), ProbeExecutionError> {
        let mut child: Child = Command::new(&self.tool)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProbeExecutionError::Spawn {
                tool: self.tool.display().to_string(),
                source,
            })?;

        let mut stdout = child.stdout.take();
        let mut stderr = child.stderr.take();

        // Both pipes are drained while waiting so a chatty child cannot block on a full pipe.
        let collected = tokio::time::timeout(deadline, async {
            let (out, err, status) =
                tokio::join!(drain(&mut stdout), drain(&mut stderr), child.wait());
            status.map(|status| (status, out, err))
        })
        .await;

        match collected {
            Ok(Ok((status, mut output, err))) => {
                output.extend_from_slice(&err);
                Ok((status, output))
            }
            Ok(Err(e)) => Err(ProbeExecutionError::Io(e)),
            Err(_elapsed) => {
                child.kill().await?;
                Err(ProbeExecutionError::TimedOut(deadline))
            }
        }
    }
}

#[async_trait]
impl QueryRunner for DigRunner {
    async fn run(&self, args: &[String], timeout: Duration) -> ProbeAttempt {
        let started: Instant = Instant::now();
        let outcome = self.execute(args, timeout).await;
        let elapsed: Duration = started.elapsed();

        let (status, output): (AttemptStatus, Vec<u8>) = match outcome {
            Ok((exit, output)) => {
                debug!(
                    "{} {} exited with {exit} after {elapsed:?}",
                    self.tool.display(),
                    args.join(" ")
                );
                (AttemptStatus::Exited(exit.code()), output)
            }
            Err(ProbeExecutionError::TimedOut(after)) => {
                debug!("{} {} killed after {after:?}", self.tool.display(), args.join(" "));
                (AttemptStatus::TimedOut, Vec::new())
            }
            Err(e) => {
                warn!("{e}");
                (AttemptStatus::Failed(e.to_string()), Vec::new())
            }
        };

        ProbeAttempt {
            args: args.to_vec(),
            output,
            elapsed,
            status,
        }
    }
}

async fn drain<R: AsyncRead + Unpin>(pipe: &mut Option<R>) -> Vec<u8> {
    let mut buf: Vec<u8> = Vec::new();
    if let Some(pipe) = pipe.as_mut() {
        if let Err(e) = pipe.read_to_end(&mut buf).await {
            debug!("could not read query tool output: {e}");
        }
    }
    buf
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
