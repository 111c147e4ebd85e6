use std::sync::Arc;
use std::time::Duration;

use nsaudit_common::config::Config;
use nsaudit_common::dns::Domain;
use nsaudit_common::error::ResolutionError;
use nsaudit_common::probe::{CheckKind, ProbeResult, Subject};
use nsaudit_core::audit::AuditService;
use nsaudit_core::report::Report;
use nsaudit_core::testing::{FixedPorts, Scripted, ScriptedRunner, StaticResolver};

const NAMESERVERS: [&str; 2] = ["ns1.example.com", "ns2.example.com"];
const SMALL_RESPONSE: &str = ";; QUERY SIZE: 40\n;; MSG SIZE  rcvd: 80\n";

fn domain() -> Domain {
    "example.com".parse().unwrap()
}

/// Every transfer refused, statistics with a low amplification factor, instant answers.
fn locked_down_runner() -> ScriptedRunner {
    ScriptedRunner::new(Scripted::output("; Transfer failed.\n"))
        .when(&["+stats"], Scripted::output(SMALL_RESPONSE))
}

fn results_for<'a>(report: &'a Report, host: &str) -> Vec<&'a ProbeResult> {
    report
        .findings()
        .iter()
        .filter(|f| matches!(&f.subject, Subject::Nameserver(ns) if ns.host() == host))
        .map(|f| &f.result)
        .collect()
}

async fn run(runner: ScriptedRunner, resolver: StaticResolver, parallel: bool) -> Report {
    let cfg: Config = Config {
        parallel,
        ..Config::default()
    };
    AuditService::new(
        Arc::new(resolver),
        Arc::new(runner),
        Arc::new(FixedPorts::closed()),
        &cfg,
    )
    .perform_audit(&domain())
    .await
}

#[tokio::test]
async fn locked_down_zone_reports_no_warnings() {
    let report: Report = run(
        locked_down_runner(),
        StaticResolver::with_nameservers(&NAMESERVERS),
        false,
    )
    .await;
    let rendered: String = report.render_plain();

    for ns in NAMESERVERS {
        let section: &str = rendered
            .split("\n[")
            .find(|section| section.starts_with(&format!("Nameserver {ns}")))
            .unwrap_or_else(|| panic!("no section for {ns}:\n{rendered}"));
        assert!(section.contains("AXFR not allowed"), "{section}");
        assert!(section.contains("TCP port 53 is closed or filtered"), "{section}");
    }
    assert!(!rendered.contains("WARNING"), "{rendered}");
    assert_eq!(report.warning_count(), 0);
    assert!(rendered.ends_with("no warnings\n"));
}

#[tokio::test]
async fn parallel_and_sequential_reports_match() {
    let runner = || {
        ScriptedRunner::new(Scripted::output("; Transfer failed.\n"))
            .when(&["TXT", "+stats"], Scripted::output("28 bytes; 512 bytes"))
            .when(&["+stats"], Scripted::output(SMALL_RESPONSE))
            .when(
                &["axfr", "@ns2.example.com"],
                Scripted::output(
                    "example.com. 3600 IN SOA ns1 admin 1 2 3 4 5\n\
                     example.com. 3600 IN NS ns1.example.com.\n\
                     example.com. 3600 IN MX 10 mail.example.com.\n\
                     example.com. 3600 IN SOA ns1 admin 1 2 3 4 5\n",
                ),
            )
    };
    let sequential: Report = run(
        runner(),
        StaticResolver::with_nameservers(&NAMESERVERS),
        false,
    )
    .await;
    let parallel: Report = run(
        runner(),
        StaticResolver::with_nameservers(&NAMESERVERS),
        true,
    )
    .await;

    assert_eq!(sequential.render_plain(), parallel.render_plain());
    assert_eq!(sequential.findings(), parallel.findings());
    assert!(sequential.warning_count() >= 3);
}

#[tokio::test]
async fn failing_nameserver_does_not_block_others() {
    let runner: ScriptedRunner = locked_down_runner()
        .when(&["@ns1.example.com"], Scripted::failed("No such file or directory"));
    let report: Report = run(
        runner,
        StaticResolver::with_nameservers(&NAMESERVERS),
        true,
    )
    .await;

    let broken: Vec<&ProbeResult> = results_for(&report, "ns1.example.com");
    assert!(
        broken[0]
            .to_string()
            .contains("query tool failed: No such file or directory")
    );
    assert!(broken.contains(&&ProbeResult::DnssecAbsent));

    let healthy: Vec<&ProbeResult> = results_for(&report, "ns2.example.com");
    assert_eq!(healthy.len(), broken.len());
    assert!(healthy[0].to_string().contains("transfer refused"));
    assert!(
        healthy
            .iter()
            .any(|r| matches!(r, ProbeResult::NoRateLimitDetected { attempts: 3 }))
    );
}

#[tokio::test]
async fn slow_nameserver_is_reported_as_rate_limited() {
    let runner: ScriptedRunner = locked_down_runner().when(
        &["+time=2", "@ns2.example.com"],
        Scripted::timed_out(Duration::from_secs(2)),
    );
    let report: Report = run(
        runner,
        StaticResolver::with_nameservers(&NAMESERVERS),
        false,
    )
    .await;

    let rate_limit: Vec<&ProbeResult> = report
        .findings()
        .iter()
        .filter(|f| f.check == CheckKind::RateLimit)
        .map(|f| &f.result)
        .collect();
    assert_eq!(rate_limit.len(), 4);
    assert!(matches!(
        rate_limit[0],
        ProbeResult::NoRateLimitDetected { attempts: 3 }
    ));
    assert!(matches!(
        rate_limit[1],
        ProbeResult::NoRateLimitDetected { attempts: 5 }
    ));
    assert!(
        rate_limit[2..]
            .iter()
            .all(|r| matches!(r, ProbeResult::RateLimited { attempt: 1, .. }))
    );
}

#[tokio::test]
async fn every_nameserver_gets_both_rate_limit_sweeps() {
    let report: Report = run(
        locked_down_runner(),
        StaticResolver::with_nameservers(&NAMESERVERS),
        true,
    )
    .await;

    for ns in NAMESERVERS {
        let sweeps: Vec<&ProbeResult> = results_for(&report, ns)
            .into_iter()
            .filter(|r| {
                matches!(
                    r,
                    ProbeResult::NoRateLimitDetected { .. } | ProbeResult::RateLimited { .. }
                )
            })
            .collect();
        assert_eq!(
            sweeps,
            [
                &ProbeResult::NoRateLimitDetected { attempts: 3 },
                &ProbeResult::NoRateLimitDetected { attempts: 5 },
            ]
        );
    }
}

#[tokio::test]
async fn missing_nameservers_still_completes_the_report() {
    let resolver: StaticResolver =
        StaticResolver::failing_ns(ResolutionError::NoNameservers(String::from("example.com")));
    let report: Report = run(locked_down_runner(), resolver, false).await;
    let rendered: String = report.render_plain();

    assert!(report.nameservers().is_empty());
    assert!(rendered.contains("Skipped: no nameservers found for example.com"));
    assert_eq!(
        report
            .findings()
            .iter()
            .filter(|f| f.check == CheckKind::Amplification)
            .count(),
        4
    );
    assert!(rendered.contains("[Domain example.com]"));
    assert!(rendered.contains("5 checks completed, no warnings"));
}
