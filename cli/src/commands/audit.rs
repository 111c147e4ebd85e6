use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use nsaudit_common::config::Config;
use nsaudit_common::dns::Domain;
use nsaudit_common::dns::resolver::Resolver;
use nsaudit_core::audit::{AuditService, ProgressCallback};
use nsaudit_core::intel::{IntelService, IpInfoLocator};
use nsaudit_core::network::{DigRunner, SystemResolver, TcpPortProber};
use nsaudit_core::recon::{ReconReport, ReconService};
use nsaudit_core::report::Report;
use tracing::{info, warn};

use crate::terminal::{format, spinner};

pub async fn audit(domain: Domain, cfg: &Config) -> anyhow::Result<()> {
    let start: Instant = Instant::now();
    let resolver: Arc<dyn Resolver> =
        Arc::new(SystemResolver::or_defaults(SystemResolver::from_system_conf()));

    if !cfg.skip_recon {
        let intel: Option<IntelService> = build_intel(resolver.clone(), cfg);
        spinner::set_status(&format!("Looking up records of {domain}..."));
        let recon: ReconReport = ReconService::new(resolver.clone(), intel)
            .perform_recon(&domain)
            .await;
        format::print_recon(&recon, cfg);
    }

    info!("auditing {domain} with {}", cfg.query_tool.display());
    let on_progress: ProgressCallback = Arc::new(spinner::report_progress);
    let service: AuditService = AuditService::new(
        resolver,
        Arc::new(DigRunner::new(cfg.query_tool.clone())),
        Arc::new(TcpPortProber),
        cfg,
    )
    .with_progress(on_progress);

    let report: Report = service.perform_audit(&domain).await;
    spinner::finish();

    format::print_report(&report, cfg);
    format::print_summary(&report, start.elapsed().as_secs_f64(), cfg);
    Ok(())
}

fn build_intel(resolver: Arc<dyn Resolver>, cfg: &Config) -> Option<IntelService> {
    if cfg.no_intel {
        return None;
    }
    match IpInfoLocator::new().context("geolocation client unavailable") {
        Ok(locator) => Some(IntelService::new(resolver, Arc::new(locator))),
        Err(e) => {
            warn!("{e:#}");
            None
        }
    }
}
