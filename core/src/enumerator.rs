use std::collections::HashSet;

use nsaudit_common::dns::resolver::Resolver;
use nsaudit_common::dns::{Domain, Nameserver};
use nsaudit_common::error::ResolutionError;
use tracing::{debug, info};

/// Resolves the authoritative nameserver set for `domain`.
///
/// Duplicates are dropped while keeping the resolver's order; that order is the report order.
pub async fn enumerate(
    resolver: &dyn Resolver,
    domain: &Domain,
) -> Result<Vec<Nameserver>, ResolutionError> {
    let answer: Vec<Nameserver> = resolver.lookup_ns(domain).await?;

    let mut seen: HashSet<String> = HashSet::new();
    let nameservers: Vec<Nameserver> = answer
        .into_iter()
        .filter(|ns| seen.insert(ns.host().to_string()))
        .collect();

    if nameservers.is_empty() {
        return Err(ResolutionError::NoNameservers(domain.to_string()));
    }

    info!("{} nameservers found for {domain}", nameservers.len());
    for ns in &nameservers {
        debug!("nameserver: {ns}");
    }
    Ok(nameservers)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
