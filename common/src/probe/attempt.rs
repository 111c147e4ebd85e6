use std::time::Duration;

use async_trait::async_trait;

/// How a single query tool invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptStatus {
    /// The tool exited on its own. `None` when it was ended by a signal.
    Exited(Option<i32>),
    /// The tool outlived its deadline and was killed.
    TimedOut,
    /// The tool could not be started, or could not be waited on.
    Failed(String),
}

/// One invocation of the query tool.
///
/// Created fresh per attempt and consumed immediately by the probe that issued it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeAttempt {
    pub args: Vec<String>,
    /// Standard output followed by standard error.
    pub output: Vec<u8>,
    /// Wall-clock time from spawn to exit (or kill), recorded on every path.
    pub elapsed: Duration,
    pub status: AttemptStatus,
}

impl ProbeAttempt {
    pub fn output_lossy(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    /// `true` when the tool ran to completion, whatever its exit code.
    pub fn completed(&self) -> bool {
        matches!(self.status, AttemptStatus::Exited(_))
    }
}

/// Defines the contract for running the external DNS query tool.
///
/// Implementations never fail: spawn errors, timeouts and non-zero exits are all reported
/// through [`ProbeAttempt::status`] so a single broken invocation cannot abort the probe
/// sequence that issued it.
#[async_trait]
pub trait QueryRunner: Send + Sync {
    /// Runs the tool with `args`, killing it if it has not exited after `timeout`.
    async fn run(&self, args: &[String], timeout: Duration) -> ProbeAttempt;
}
