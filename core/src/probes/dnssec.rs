use std::time::Duration;

use nsaudit_common::dns::{Domain, Nameserver};
use nsaudit_common::probe::{ProbeAttempt, ProbeResult, QueryRunner};
use nsaudit_protocols::dig::DigQuery;
use nsaudit_protocols::transfer::{contains_failure_marker, has_content};
use tracing::debug;

pub const DNSSEC_TIMEOUT: Duration = Duration::from_secs(5);

/// Asks `ns` for the zone's DNSKEY set with the DO bit set.
///
/// Any answer counts as DNSSEC being present; dig's own error diagnostics do not.
pub async fn probe(runner: &dyn QueryRunner, domain: &Domain, ns: &Nameserver) -> ProbeResult {
    let args: Vec<String> = DigQuery::record(domain, "DNSKEY").dnssec().server(ns).args();
    let attempt: ProbeAttempt = runner.run(&args, DNSSEC_TIMEOUT).await;

    let answered: bool = attempt.completed()
        && has_content(&attempt.output)
        && !contains_failure_marker(&attempt.output_lossy());
    debug!("{ns}: DNSKEY answered: {answered}");

    if answered {
        ProbeResult::DnssecPresent
    } else {
        ProbeResult::DnssecAbsent
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
