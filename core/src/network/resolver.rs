use std::net::IpAddr;

use anyhow::Context;
use async_trait::async_trait;
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::rr::{RData, RecordType};
use nsaudit_common::dns::record::{MxRecord, SrvRecord};
use nsaudit_common::dns::resolver::Resolver;
use nsaudit_common::dns::{Domain, Nameserver};
use nsaudit_common::error::ResolutionError;
use tracing::{debug, warn};

/// [`Resolver`] backed by hickory, configured from the host's resolver settings.
pub struct SystemResolver {
    inner: TokioAsyncResolver,
}

impl SystemResolver {
    pub fn from_system_conf() -> anyhow::Result<Self> {
        let inner: TokioAsyncResolver = TokioAsyncResolver::tokio_from_system_conf()
            .context("failed to read the system resolver configuration")?;
        Ok(Self { inner })
    }

    /// Resolver using hickory's built-in upstream servers.
    pub fn with_defaults() -> Self {
        Self {
            inner: TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default()),
        }
    }

    /// `system`, or [`Self::with_defaults`] when the host configuration could not be read.
    pub fn or_defaults(system: anyhow::Result<Self>) -> Self {
        system.unwrap_or_else(|e| {
            warn!("{e:#}; falling back to default upstream resolvers");
            Self::with_defaults()
        })
    }
}

#[async_trait]
impl Resolver for SystemResolver {
    async fn lookup_ns(&self, domain: &Domain) -> Result<Vec<Nameserver>, ResolutionError> {
        let name: String = fqdn(domain.as_str());
        let found: Vec<Nameserver> = match self.inner.ns_lookup(name.as_str()).await {
            Ok(lookup) => lookup
                .iter()
                .map(|ns| Nameserver::new(ns.to_string()))
                .collect(),
            Err(e) if is_empty_answer(&e) => Vec::new(),
            Err(e) => return Err(lookup_error(domain.as_str(), "NS", e)),
        };
        if found.is_empty() {
            return Err(ResolutionError::NoNameservers(domain.to_string()));
        }
        Ok(found)
    }

    async fn lookup_ip(&self, host: &str) -> Result<Vec<IpAddr>, ResolutionError> {
        let result = self.inner.lookup_ip(fqdn(host).as_str()).await;
        records_or_empty(host, "A/AAAA", result.map(|lookup| lookup.iter().collect()))
    }

    async fn lookup_cname(&self, host: &str) -> Result<Vec<String>, ResolutionError> {
        let result = self.inner.lookup(fqdn(host).as_str(), RecordType::CNAME).await;
        records_or_empty(
            host,
            "CNAME",
            result.map(|lookup| {
                lookup
                    .iter()
                    .filter_map(|rdata| match rdata {
                        RData::CNAME(target) => Some(trim_root(target.to_string())),
                        _ => None,
                    })
                    .collect()
            }),
        )
    }

    async fn lookup_mx(&self, host: &str) -> Result<Vec<MxRecord>, ResolutionError> {
        let result = self.inner.mx_lookup(fqdn(host).as_str()).await;
        records_or_empty(
            host,
            "MX",
            result.map(|lookup| {
                lookup
                    .iter()
                    .map(|mx| MxRecord {
                        host: trim_root(mx.exchange().to_string()),
                        preference: mx.preference(),
                    })
                    .collect()
            }),
        )
    }

    async fn lookup_txt(&self, host: &str) -> Result<Vec<String>, ResolutionError> {
        let result = self.inner.txt_lookup(fqdn(host).as_str()).await;
        records_or_empty(
            host,
            "TXT",
            result.map(|lookup| {
                lookup
                    .iter()
                    .map(|txt| {
                        txt.txt_data()
                            .iter()
                            .map(|part| String::from_utf8_lossy(part))
                            .collect::<String>()
                    })
                    .collect()
            }),
        )
    }

    async fn lookup_srv(&self, host: &str) -> Result<Vec<SrvRecord>, ResolutionError> {
        let result = self.inner.srv_lookup(fqdn(host).as_str()).await;
        records_or_empty(
            host,
            "SRV",
            result.map(|lookup| {
                lookup
                    .iter()
                    .map(|srv| SrvRecord {
                        target: trim_root(srv.target().to_string()),
                        port: srv.port(),
                        priority: srv.priority(),
                        weight: srv.weight(),
                    })
                    .collect()
            }),
        )
    }

    async fn reverse(&self, addr: IpAddr) -> Result<Vec<String>, ResolutionError> {
        let result = self.inner.reverse_lookup(addr).await;
        records_or_empty(
            &addr.to_string(),
            "PTR",
            result.map(|lookup| {
                lookup
                    .iter()
                    .map(|ptr| trim_root(ptr.to_string()))
                    .collect()
            }),
        )
    }
}

fn fqdn(name: &str) -> String {
    if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{name}.")
    }
}

fn trim_root(name: String) -> String {
    match name.strip_suffix('.') {
        Some(trimmed) => trimmed.to_string(),
        None => name,
    }
}

fn is_empty_answer(e: &ResolveError) -> bool {
    matches!(e.kind(), ResolveErrorKind::NoRecordsFound { .. })
}

fn records_or_empty<T>(
    name: &str,
    record_type: &'static str,
    result: Result<Vec<T>, ResolveError>,
) -> Result<Vec<T>, ResolutionError> {
    match result {
        Ok(records) => Ok(records),
        Err(e) if is_empty_answer(&e) => {
            debug!("no {record_type} records for {name}");
            Ok(Vec::new())
        }
        Err(e) => Err(lookup_error(name, record_type, e)),
    }
}

fn lookup_error(name: &str, record_type: &'static str, e: ResolveError) -> ResolutionError {
    ResolutionError::Lookup {
        name: name.to_string(),
        record_type,
        reason: e.to_string(),
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

    #[test]
    fn fqdn_appends_root_once() {
        assert_eq!(fqdn("example.com"), "example.com.");
        assert_eq!(fqdn("example.com."), "example.com.");
    }

    #[test]
    fn trim_root_strips_trailing_dot() {
        assert_eq!(trim_root(String::from("mail.example.com.")), "mail.example.com");
        assert_eq!(trim_root(String::from("mail.example.com")), "mail.example.com");
    }

    #[tokio::test]
    async fn unreadable_system_config_falls_back_to_defaults() {
        let missing: anyhow::Result<SystemResolver> =
            Err(anyhow::anyhow!("no such file: /etc/resolv.conf"));
        let _resolver: SystemResolver = SystemResolver::or_defaults(missing);
    }

    #[tokio::test]
    #[ignore]
    async fn default_upstreams_resolve_public_nameservers() {
        let resolver: SystemResolver = SystemResolver::with_defaults();
        let domain: Domain = "example.com".parse().unwrap();
        assert!(!resolver.lookup_ns(&domain).await.unwrap().is_empty());
    }

    #[tokio::test]
    #[ignore]
    async fn resolves_public_nameservers() {
        let resolver: SystemResolver = SystemResolver::from_system_conf().unwrap();
        let domain: Domain = "example.com".parse().unwrap();
        let nameservers: Vec<Nameserver> = resolver.lookup_ns(&domain).await.unwrap();
        assert!(!nameservers.is_empty());
    }
}
