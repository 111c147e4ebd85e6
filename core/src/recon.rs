//! # Record reconnaissance
//!
//! The plain lookups shown before the vulnerability audit: addresses (optionally enriched
//! by [`crate::intel`]), aliases, mail and name servers with their inferred providers,
//! reverse names, TXT-derived email policies and SRV records.
//!
//! Lookups are independent. A failed lookup is logged and leaves its section empty.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

use nsaudit_common::dns::record::{MxRecord, SrvRecord};
use nsaudit_common::dns::resolver::Resolver;
use nsaudit_common::dns::{Domain, Nameserver};
use nsaudit_common::error::ResolutionError;
use nsaudit_common::providers;
use nsaudit_protocols::records::{PolicyRecord, classify_policy, is_spf, spf_mechanisms};
use tracing::debug;

use crate::intel::{IntelService, IpIntelligence};

/// A hostname and the provider it is attributed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderHost {
    pub host: String,
    pub provider: &'static str,
}

impl ProviderHost {
    pub fn new(host: impl Into<String>) -> Self {
        let host: String = host.into();
        let provider: &'static str = providers::label(&host);
        Self { host, provider }
    }
}

#[derive(Debug)]
pub struct AddressRecord {
    pub addr: Ipv4Addr,
    /// `None` when intelligence lookups are disabled.
    pub intel: Option<IpIntelligence>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailExchanger {
    pub record: MxRecord,
    pub provider: &'static str,
}

#[derive(Debug, Default)]
pub struct ReconReport {
    pub ipv4: Vec<AddressRecord>,
    pub ipv6: Vec<Ipv6Addr>,
    pub cnames: Vec<ProviderHost>,
    pub mail: Vec<MailExchanger>,
    pub nameservers: Vec<ProviderHost>,
    /// Reverse names per address that has any.
    pub reverse: Vec<(IpAddr, Vec<String>)>,
    pub txt: Vec<String>,
    /// TXT records of the `_dmarc` subdomain.
    pub dmarc_txt: Vec<String>,
    pub srv: Vec<SrvRecord>,
}

impl ReconReport {
    pub fn spf_records(&self) -> Vec<&str> {
        self.txt
            .iter()
            .map(String::as_str)
            .filter(|txt| is_spf(txt))
            .collect()
    }

    /// SPF mechanisms of every SPF record, in record order.
    pub fn spf_mechanisms(&self) -> Vec<String> {
        self.spf_records()
            .into_iter()
            .flat_map(spf_mechanisms)
            .collect()
    }

    pub fn policies(&self) -> Vec<(PolicyRecord, &str)> {
        self.txt
            .iter()
            .chain(&self.dmarc_txt)
            .filter_map(|txt| classify_policy(txt).map(|policy| (policy, txt.as_str())))
            .collect()
    }

    /// Distinct mail providers, in MX order.
    pub fn mail_providers(&self) -> Vec<&'static str> {
        distinct(self.mail.iter().map(|mx| mx.provider))
    }

    /// Distinct DNS providers, in NS order.
    pub fn dns_providers(&self) -> Vec<&'static str> {
        distinct(self.nameservers.iter().map(|ns| ns.provider))
    }

    pub fn is_empty(&self) -> bool {
        self.ipv4.is_empty()
            && self.ipv6.is_empty()
            && self.cnames.is_empty()
            && self.mail.is_empty()
            && self.nameservers.is_empty()
            && self.reverse.is_empty()
            && self.txt.is_empty()
            && self.dmarc_txt.is_empty()
            && self.srv.is_empty()
    }
}

fn distinct(labels: impl Iterator<Item = &'static str>) -> Vec<&'static str> {
    let mut seen: Vec<&'static str> = Vec::new();
    for label in labels {
        if !seen.contains(&label) {
            seen.push(label);
        }
    }
    seen
}

pub struct ReconService {
    resolver: Arc<dyn Resolver>,
    intel: Option<IntelService>,
}

impl ReconService {
    /// `intel` is `None` to skip geolocation, ASN and blacklist lookups.
    pub fn new(resolver: Arc<dyn Resolver>, intel: Option<IntelService>) -> Self {
        Self { resolver, intel }
    }

    pub async fn perform_recon(&self, domain: &Domain) -> ReconReport {
        let name: &str = domain.as_str();
        let dmarc: String = format!("_dmarc.{name}");
        let resolver: &dyn Resolver = self.resolver.as_ref();

        let (ips, cnames, mx, ns, txt, dmarc_txt, srv) = tokio::join!(
            resolver.lookup_ip(name),
            resolver.lookup_cname(name),
            resolver.lookup_mx(name),
            resolver.lookup_ns(domain),
            resolver.lookup_txt(name),
            resolver.lookup_txt(&dmarc),
            resolver.lookup_srv(name),
        );

        let ips: Vec<IpAddr> = or_empty(ips, "A/AAAA");
        let mut report: ReconReport = ReconReport {
            cnames: or_empty(cnames, "CNAME")
                .into_iter()
                .map(ProviderHost::new)
                .collect(),
            mail: or_empty(mx, "MX")
                .into_iter()
                .map(|record| MailExchanger {
                    provider: providers::label(&record.host),
                    record,
                })
                .collect(),
            nameservers: match ns {
                Ok(found) => found.iter().map(Nameserver::host).map(ProviderHost::new).collect(),
                Err(e) => {
                    debug!("{e}");
                    Vec::new()
                }
            },
            txt: or_empty(txt, "TXT"),
            dmarc_txt: or_empty(dmarc_txt, "DMARC TXT"),
            srv: or_empty(srv, "SRV"),
            ..ReconReport::default()
        };

        for ip in &ips {
            match ip {
                IpAddr::V4(v4) => {
                    let intel: Option<IpIntelligence> = match &self.intel {
                        Some(service) => Some(service.investigate(*v4).await),
                        None => None,
                    };
                    report.ipv4.push(AddressRecord { addr: *v4, intel });
                }
                IpAddr::V6(v6) => report.ipv6.push(*v6),
            }
            match resolver.reverse(*ip).await {
                Ok(names) if !names.is_empty() => report.reverse.push((*ip, names)),
                Ok(_) => {}
                Err(e) => debug!("{e}"),
            }
        }

        report
    }
}

fn or_empty<T>(result: Result<Vec<T>, ResolutionError>, what: &str) -> Vec<T> {
    result.unwrap_or_else(|e| {
        debug!("{what} lookup failed: {e}");
        Vec::new()
    })
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
    use crate::testing::StaticResolver;

    fn domain() -> Domain {
        "example.com".parse().unwrap()
    }

    fn populated() -> StaticResolver {
        let mut resolver: StaticResolver =
            StaticResolver::with_nameservers(&["ns-12.awsdns-01.com", "ns1.example.com"]);
        let v4: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 0, 2, 10));
        let v6: IpAddr = "2001:db8::10".parse().unwrap();
        resolver.ips.insert(String::from("example.com"), vec![v4, v6]);
        resolver.ptr.insert(v4, vec![String::from("web.example.com")]);
        resolver.mx.insert(
            String::from("example.com"),
            vec![
                MxRecord {
                    host: String::from("aspmx.l.google.com"),
                    preference: 1,
                },
                MxRecord {
                    host: String::from("alt1.aspmx.l.google.com"),
                    preference: 5,
                },
            ],
        );
        resolver.txt.insert(
            String::from("example.com"),
            vec![
                String::from("v=spf1 ip4:192.0.2.0/24 include:_spf.google.com ~all"),
                String::from("google-site-verification=abc"),
            ],
        );
        resolver.txt.insert(
            String::from("_dmarc.example.com"),
            vec![String::from("v=DMARC1; p=reject")],
        );
        resolver
    }

    #[tokio::test]
    async fn collects_every_section() {
        let service: ReconService = ReconService::new(Arc::new(populated()), None);
        let report: ReconReport = service.perform_recon(&domain()).await;

        assert_eq!(report.ipv4.len(), 1);
        assert!(report.ipv4[0].intel.is_none());
        assert_eq!(report.ipv6, ["2001:db8::10".parse::<Ipv6Addr>().unwrap()]);
        assert_eq!(report.reverse.len(), 1);
        assert_eq!(report.reverse[0].1, ["web.example.com"]);

        assert_eq!(report.mail_providers(), ["Google Workspace"]);
        assert_eq!(report.nameservers[0].provider, "AWS Route 53");
        assert_eq!(report.nameservers[1].provider, "Other");

        assert_eq!(report.spf_records().len(), 1);
        assert_eq!(
            report.spf_mechanisms(),
            ["192.0.2.0/24", "include:_spf.google.com", "~all"]
        );
        assert_eq!(
            report.policies(),
            [(PolicyRecord::Dmarc, "v=DMARC1; p=reject")]
        );
    }

    #[tokio::test]
    async fn unknown_domain_yields_empty_report() {
        let service: ReconService = ReconService::new(Arc::new(StaticResolver::default()), None);
        assert!(service.perform_recon(&domain()).await.is_empty());
    }
}
