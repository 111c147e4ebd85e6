use std::time::Duration;

use nsaudit_common::dns::{Domain, Nameserver};
use nsaudit_common::probe::rate_limit::{ATTEMPT_INTERVAL, ATTEMPT_THRESHOLD, RateLimitProfile};
use nsaudit_common::probe::{ProbeResult, QueryRunner};
use nsaudit_protocols::dig::DigQuery;
use tokio::time::sleep;
use tracing::debug;

/// `+time` handed to the tool for each attempt, equal to [`ATTEMPT_THRESHOLD`].
const ATTEMPT_TIME_SECS: u64 = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitOutcome {
    /// How many attempts were actually issued.
    pub attempts: usize,
    pub result: ProbeResult,
}

/// Times repeated AXFR attempts against `ns`.
///
/// The first attempt whose elapsed time reaches [`ATTEMPT_THRESHOLD`] ends the probe and is
/// reported as possible throttling. This is a timing heuristic: a slow or overloaded server
/// looks the same.
pub async fn probe(
    runner: &dyn QueryRunner,
    domain: &Domain,
    ns: &Nameserver,
    profile: RateLimitProfile,
) -> RateLimitOutcome {
    let args: Vec<String> = DigQuery::axfr(domain)
        .time(ATTEMPT_TIME_SECS)
        .tries(1)
        .server(ns)
        .args();
    let limit: usize = profile.attempts();

    let mut attempt: usize = 0;
    let result: ProbeResult = loop {
        attempt += 1;
        let elapsed: Duration = runner.run(&args, ATTEMPT_THRESHOLD).await.elapsed;
        debug!("{ns}: rate limit attempt {attempt}/{limit} took {elapsed:?}");

        if elapsed >= ATTEMPT_THRESHOLD {
            break ProbeResult::RateLimited { attempt, elapsed };
        }
        if attempt == limit {
            break ProbeResult::NoRateLimitDetected { attempts: limit };
        }
        sleep(ATTEMPT_INTERVAL).await;
    };

    RateLimitOutcome {
        attempts: attempt,
        result,
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
