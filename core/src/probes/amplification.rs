use std::time::Duration;

use nsaudit_common::dns::Domain;
use nsaudit_common::probe::{ProbeAttempt, ProbeResult, QueryRunner};
use nsaudit_protocols::dig::DigQuery;
use nsaudit_protocols::stats::{MessageSizes, parse_message_sizes};
use tracing::debug;

/// Record types with a large answer for a small question.
pub const QUERY_TYPES: &[&str] = &["ANY", "TXT", "RRSIG", "DNSKEY"];
pub const AMPLIFICATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Measures the response/query size ratio for each of [`QUERY_TYPES`] through the system
/// resolver.
///
/// A query whose output carries no usable statistics produces no result.
pub async fn probe(runner: &dyn QueryRunner, domain: &Domain) -> Vec<ProbeResult> {
    let mut results: Vec<ProbeResult> = Vec::new();
    for query_type in QUERY_TYPES {
        let args: Vec<String> = DigQuery::record(domain, query_type).stats().args();
        let attempt: ProbeAttempt = runner.run(&args, AMPLIFICATION_TIMEOUT).await;

        match parse_message_sizes(&attempt.output_lossy()) {
            Ok(sizes) => results.push(measured(query_type, sizes)),
            Err(e) => debug!("{query_type} amplification skipped for {domain}: {e}"),
        }
    }
    results
}

fn measured(query_type: &str, sizes: MessageSizes) -> ProbeResult {
    ProbeResult::AmplificationMeasured {
        query_type: query_type.to_string(),
        query_size: sizes.query,
        response_size: sizes.response,
        factor: sizes.amplification_factor(),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Scripted, ScriptedRunner};
    use nsaudit_common::probe::Severity;

    fn domain() -> Domain {
        "example.com".parse().unwrap()
    }

    #[tokio::test]
    async fn queries_each_type_with_stats() {
        let runner: ScriptedRunner = ScriptedRunner::default();
        probe(&runner, &domain()).await;

        let calls: Vec<Vec<String>> = runner.calls();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[0], ["+short", "+stats", "ANY", "example.com"]);
        assert_eq!(calls[3], ["+short", "+stats", "DNSKEY", "example.com"]);
    }

    #[tokio::test]
    async fn large_ratio_is_flagged() {
        let runner: ScriptedRunner = ScriptedRunner::default()
            .when(&["ANY"], Scripted::output("query: 1 msec; 28 bytes; ... ;512 bytes"))
            .when(&["TXT"], Scripted::output(";; QUERY SIZE: 40\n;; MSG SIZE  rcvd: 80\n"));
        let results: Vec<ProbeResult> = probe(&runner, &domain()).await;

        assert_eq!(results.len(), 2);
        match &results[0] {
            ProbeResult::AmplificationMeasured {
                query_type, factor, ..
            } => {
                assert_eq!(query_type, "ANY");
                assert!((factor - 512.0 / 28.0).abs() < 1e-9);
            }
            other => panic!("unexpected result {other:?}"),
        }
        assert_eq!(results[0].severity(), Severity::Warning);
        assert_eq!(results[1].severity(), Severity::Info);
        assert_eq!(
            results[1].to_string(),
            "TXT query: 40 bytes sent, 80 bytes received, amplification factor 2.00"
        );
    }

    #[tokio::test]
    async fn unparseable_statistics_are_skipped() {
        let runner: ScriptedRunner =
            ScriptedRunner::new(Scripted::output(";; connection timed out; no servers could be reached\n"));
        assert!(probe(&runner, &domain()).await.is_empty());
    }
}
