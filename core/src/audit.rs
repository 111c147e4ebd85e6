//! # Audit Service
//!
//! Implements the core "audit a domain" use case.
//!
//! The service enumerates the domain's nameservers, runs the per-server probe sequence
//! against each of them, measures amplification domain-wide, and appends every result to a
//! [`Report`] in enumeration order.
//!
//! **Concurrency:** sequential by default. In parallel mode each nameserver gets its own task;
//! tasks send `(index, findings)` to a single collector which slots them by enumeration index,
//! so both modes produce the same report.

use std::sync::Arc;

use nsaudit_common::config::Config;
use nsaudit_common::dns::resolver::Resolver;
use nsaudit_common::dns::{Domain, Nameserver};
use nsaudit_common::probe::port::PortProber;
use nsaudit_common::probe::rate_limit::RateLimitProfile;
use nsaudit_common::probe::{CheckKind, ProbeResult, QueryRunner, SecurityFinding, Subject};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::enumerator;
use crate::probes::{amplification, dnssec, port, rate_limit, transfer};
use crate::report::Report;

/// Milestones reported while an audit runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    Enumerating,
    Probing(Nameserver),
    Finished(Nameserver),
    Amplification,
}

pub type ProgressCallback = Arc<dyn Fn(Progress) + Send + Sync>;

/// The collaborators one nameserver's probe sequence needs. Cheap to clone into tasks.
#[derive(Clone)]
struct Probes {
    runner: Arc<dyn QueryRunner>,
    ports: Arc<dyn PortProber>,
    on_progress: Option<ProgressCallback>,
}

impl Probes {
    fn notify(&self, progress: Progress) {
        if let Some(callback) = &self.on_progress {
            callback(progress);
        }
    }
}

/// Application Service for the vulnerability audit.
pub struct AuditService {
    resolver: Arc<dyn Resolver>,
    probes: Probes,
    parallel: bool,
}

impl AuditService {
    pub fn new(
        resolver: Arc<dyn Resolver>,
        runner: Arc<dyn QueryRunner>,
        ports: Arc<dyn PortProber>,
        cfg: &Config,
    ) -> Self {
        Self {
            resolver,
            probes: Probes {
                runner,
                ports,
                on_progress: None,
            },
            parallel: cfg.parallel,
        }
    }

    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.probes.on_progress = Some(callback);
        self
    }

    /// Audits `domain`. Never fails: every problem becomes a line in the report.
    pub async fn perform_audit(&self, domain: &Domain) -> Report {
        let mut report: Report = Report::new(domain.clone());

        self.probes.notify(Progress::Enumerating);
        match enumerator::enumerate(self.resolver.as_ref(), domain).await {
            Ok(nameservers) => {
                let batches: Vec<Vec<SecurityFinding>> = if self.parallel {
                    self.probe_concurrently(domain, &nameservers).await
                } else {
                    self.probe_sequentially(domain, &nameservers).await
                };
                report.set_nameservers(nameservers);
                for batch in batches {
                    report.extend(batch);
                }
            }
            Err(e) => {
                warn!("{e}");
                report.push(SecurityFinding::new(
                    Subject::Domain(domain.clone()),
                    CheckKind::Enumeration,
                    ProbeResult::Skipped {
                        reason: format!("{e}; zone transfer, DNSSEC, port and rate limit checks not run"),
                    },
                ));
            }
        }

        self.probes.notify(Progress::Amplification);
        let subject: Subject = Subject::Domain(domain.clone());
        for result in amplification::probe(self.probes.runner.as_ref(), domain).await {
            report.push(SecurityFinding::new(
                subject.clone(),
                CheckKind::Amplification,
                result,
            ));
        }

        info!("audit of {domain} complete: {}", report.summary());
        report
    }

    async fn probe_sequentially(
        &self,
        domain: &Domain,
        nameservers: &[Nameserver],
    ) -> Vec<Vec<SecurityFinding>> {
        let mut batches: Vec<Vec<SecurityFinding>> = Vec::with_capacity(nameservers.len());
        for ns in nameservers {
            batches.push(probe_nameserver(&self.probes, domain, ns).await);
        }
        batches
    }

    async fn probe_concurrently(
        &self,
        domain: &Domain,
        nameservers: &[Nameserver],
    ) -> Vec<Vec<SecurityFinding>> {
        let (tx, mut rx) = mpsc::channel::<(usize, Vec<SecurityFinding>)>(nameservers.len().max(1));
        let mut tasks: JoinSet<()> = JoinSet::new();

        for (index, ns) in nameservers.iter().cloned().enumerate() {
            let probes: Probes = self.probes.clone();
            let domain: Domain = domain.clone();
            let tx = tx.clone();
            tasks.spawn(async move {
                let findings: Vec<SecurityFinding> = probe_nameserver(&probes, &domain, &ns).await;
                let _ = tx.send((index, findings)).await;
            });
        }
        drop(tx);

        let mut slots: Vec<Option<Vec<SecurityFinding>>> = vec![None; nameservers.len()];
        while let Some((index, findings)) = rx.recv().await {
            slots[index] = Some(findings);
        }
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                error!("nameserver probe task failed: {e}");
            }
        }

        slots
            .into_iter()
            .zip(nameservers)
            .map(|(slot, ns)| {
                slot.unwrap_or_else(|| {
                    vec![SecurityFinding::new(
                        Subject::Nameserver(ns.clone()),
                        CheckKind::ZoneTransfer,
                        ProbeResult::Skipped {
                            reason: String::from("probe task ended before reporting"),
                        },
                    )]
                })
            })
            .collect()
    }
}

/// Zone transfer, TCP reachability, DNSSEC and rate limiting against one nameserver, in
/// that order. Rate limiting runs once per [`RateLimitProfile`]. Each step runs regardless of
/// how the previous one went.
async fn probe_nameserver(probes: &Probes, domain: &Domain, ns: &Nameserver) -> Vec<SecurityFinding> {
    probes.notify(Progress::Probing(ns.clone()));
    let subject: Subject = Subject::Nameserver(ns.clone());
    let finding = |check: CheckKind, result: ProbeResult| {
        SecurityFinding::new(subject.clone(), check, result)
    };

    let mut findings: Vec<SecurityFinding> = transfer::probe(probes.runner.as_ref(), domain, ns)
        .await
        .into_iter()
        .map(|result| finding(CheckKind::ZoneTransfer, result))
        .collect();

    let reachability: ProbeResult = port::probe(probes.ports.as_ref(), ns).await;
    findings.push(finding(CheckKind::TcpPort, reachability));

    let signed: ProbeResult = dnssec::probe(probes.runner.as_ref(), domain, ns).await;
    findings.push(finding(CheckKind::Dnssec, signed));

    for profile in RateLimitProfile::ALL {
        let throttling: ProbeResult = rate_limit::probe(probes.runner.as_ref(), domain, ns, profile)
            .await
            .result;
        findings.push(finding(CheckKind::RateLimit, throttling));
    }

    probes.notify(Progress::Finished(ns.clone()));
    findings
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
