use std::time::Duration;

use nsaudit_common::dns::{Domain, Nameserver};
use nsaudit_common::probe::{
    AttemptStatus, DenialReason, ProbeAttempt, ProbeResult, QueryRunner, TransferKind,
};
use nsaudit_protocols::dig::DigQuery;
use nsaudit_protocols::transfer::{TransferVerdict, classify_transfer};
use nsaudit_protocols::zone::{ParsedZone, ZoneAnalysis, analyze, parse_zone};
use tracing::debug;

/// Hard deadline for one transfer attempt; matches the `+time` handed to the tool.
pub const TRANSFER_TIMEOUT: Duration = Duration::from_secs(5);
const TRANSFER_TIME_SECS: u64 = 5;
/// IXFR is requested relative to serial 1, so any real zone differs from it.
const IXFR_SERIAL: u32 = 1;

/// Attempts AXFR then IXFR against `ns`.
///
/// The results are, in order: the AXFR verdict, the analysis of a leaked AXFR zone (sensitive
/// record types, then anomalies), and the IXFR verdict.
pub async fn probe(runner: &dyn QueryRunner, domain: &Domain, ns: &Nameserver) -> Vec<ProbeResult> {
    let axfr: ProbeAttempt = runner
        .run(&transfer_query(DigQuery::axfr(domain), ns), TRANSFER_TIMEOUT)
        .await;
    let ixfr: ProbeAttempt = runner
        .run(
            &transfer_query(DigQuery::ixfr(domain, IXFR_SERIAL), ns),
            TRANSFER_TIMEOUT,
        )
        .await;

    let mut results: Vec<ProbeResult> = Vec::new();

    let (axfr_result, leaked) = classify(TransferKind::Axfr, &axfr);
    results.push(axfr_result);
    if let Some(zone) = leaked {
        results.extend(analysis_results(&analyze(&zone.distribution())));
    }

    let (ixfr_result, _) = classify(TransferKind::Ixfr, &ixfr);
    results.push(ixfr_result);

    results
}

fn transfer_query(query: DigQuery, ns: &Nameserver) -> Vec<String> {
    query.time(TRANSFER_TIME_SECS).tries(1).server(ns).args()
}

/// Classifies one transfer attempt, returning the parsed zone when the transfer went through.
pub fn classify(kind: TransferKind, attempt: &ProbeAttempt) -> (ProbeResult, Option<ParsedZone>) {
    let denied = |reason: DenialReason| -> (ProbeResult, Option<ParsedZone>) {
        debug!("{} denied: {reason}", kind.label());
        (ProbeResult::TransferDenied { kind, reason }, None)
    };

    match &attempt.status {
        AttemptStatus::TimedOut => return denied(DenialReason::TimedOut),
        AttemptStatus::Failed(reason) => {
            return denied(DenialReason::ExecutionFailed(reason.clone()));
        }
        AttemptStatus::Exited(_) => {}
    }

    match classify_transfer(&attempt.output) {
        TransferVerdict::Allowed => {
            let zone: ParsedZone = parse_zone(&attempt.output_lossy());
            let result: ProbeResult = ProbeResult::TransferAllowed {
                kind,
                record_count: zone.records.len(),
                distribution: zone.distribution(),
            };
            (result, Some(zone))
        }
        TransferVerdict::Refused => denied(DenialReason::Refused),
        TransferVerdict::Empty => denied(DenialReason::NoData),
    }
}

fn analysis_results(analysis: &ZoneAnalysis) -> Vec<ProbeResult> {
    let sensitive = analysis
        .sensitive
        .iter()
        .map(|(record_type, count)| ProbeResult::SensitiveRecords {
            record_type: record_type.clone(),
            count: *count,
        });
    let anomalies = analysis
        .anomalies
        .iter()
        .map(|anomaly| ProbeResult::ZoneAnomaly(*anomaly));
    sensitive.chain(anomalies).collect()
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
    use nsaudit_common::probe::ZoneAnomaly;

    const LEAKED_ZONE: &str = "\
example.com. 3600 IN SOA ns1.example.com. hostmaster.example.com. 7 7200 3600 1209600 3600
example.com. 3600 IN NS ns1.example.com.
example.com. 300 IN MX 10 mail.example.com.
vpn.example.com. 300 IN A 10.0.0.4
example.com. 3600 IN SOA ns1.example.com. hostmaster.example.com. 7 7200 3600 1209600 3600
";

    fn domain() -> Domain {
        "example.com".parse().unwrap()
    }

    fn ns() -> Nameserver {
        Nameserver::new("ns1.example.com")
    }

    #[tokio::test]
    async fn issues_bounded_axfr_then_ixfr() {
        let runner: ScriptedRunner = ScriptedRunner::default();
        probe(&runner, &domain(), &ns()).await;

        assert_eq!(
            runner.calls(),
            [
                ["+short", "+time=5", "+tries=1", "axfr", "example.com", "@ns1.example.com"],
                ["+short", "+time=5", "+tries=1", "ixfr=1", "example.com", "@ns1.example.com"],
            ]
        );
    }

    #[tokio::test]
    async fn refused_transfers_are_denied() {
        let runner: ScriptedRunner =
            ScriptedRunner::new(Scripted::output("; Transfer failed.\n"));
        let results: Vec<ProbeResult> = probe(&runner, &domain(), &ns()).await;

        assert_eq!(
            results,
            [
                ProbeResult::TransferDenied {
                    kind: TransferKind::Axfr,
                    reason: DenialReason::Refused
                },
                ProbeResult::TransferDenied {
                    kind: TransferKind::Ixfr,
                    reason: DenialReason::Refused
                },
            ]
        );
    }

    #[tokio::test]
    async fn leaked_axfr_is_analysed_before_ixfr_verdict() {
        let runner: ScriptedRunner = ScriptedRunner::default()
            .when(&["axfr"], Scripted::output(LEAKED_ZONE))
            .when(&["ixfr=1"], Scripted::timed_out(TRANSFER_TIMEOUT));
        let results: Vec<ProbeResult> = probe(&runner, &domain(), &ns()).await;

        assert_eq!(results.len(), 4);
        match &results[0] {
            ProbeResult::TransferAllowed {
                kind,
                record_count,
                distribution,
            } => {
                assert_eq!(*kind, TransferKind::Axfr);
                assert_eq!(*record_count, 5);
                assert_eq!(distribution.get("SOA"), Some(&2));
                assert_eq!(distribution.values().sum::<usize>(), 5);
            }
            other => panic!("unexpected result {other:?}"),
        }
        assert_eq!(
            results[1],
            ProbeResult::SensitiveRecords {
                record_type: String::from("MX"),
                count: 1
            }
        );
        assert_eq!(
            results[2],
            ProbeResult::ZoneAnomaly(ZoneAnomaly::TooFewNameservers(1))
        );
        assert_eq!(
            results[3],
            ProbeResult::TransferDenied {
                kind: TransferKind::Ixfr,
                reason: DenialReason::TimedOut
            }
        );
    }

    #[tokio::test]
    async fn execution_failure_is_a_denial_with_reason() {
        let runner: ScriptedRunner =
            ScriptedRunner::new(Scripted::failed("failed to spawn dig: not found"));
        let results: Vec<ProbeResult> = probe(&runner, &domain(), &ns()).await;

        assert!(results.iter().all(|result| matches!(
            result,
            ProbeResult::TransferDenied {
                reason: DenialReason::ExecutionFailed(_),
                ..
            }
        )));
        assert!(results[0].to_string().contains("failed to spawn dig"));
    }

    #[test]
    fn whitespace_only_output_is_no_data() {
        let attempt: ProbeAttempt = ProbeAttempt {
            args: Vec::new(),
            output: b" \n\t\n".to_vec(),
            elapsed: Duration::from_millis(3),
            status: AttemptStatus::Exited(Some(0)),
        };
        let (result, zone) = classify(TransferKind::Axfr, &attempt);
        assert_eq!(
            result,
            ProbeResult::TransferDenied {
                kind: TransferKind::Axfr,
                reason: DenialReason::NoData
            }
        );
        assert!(zone.is_none());
    }
}
