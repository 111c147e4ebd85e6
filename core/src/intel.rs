//! IP intelligence for resolved addresses: geolocation, origin ASN and DNS blacklist
//! listings.
//!
//! Each lookup is independent and best-effort. A failed lookup is kept in the result so the
//! caller can explain it; nothing here aborts the run.

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use nsaudit_common::dns::resolver::Resolver;
use nsaudit_common::error::ResolutionError;
use nsaudit_protocols::records::{AsnOrigin, parse_cymru_as_name, parse_cymru_origin, reverse_ipv4};
use serde::Deserialize;
use tracing::debug;

/// DNSBL zones consulted for every address.
pub const BLACKLIST_ZONES: &[&str] = &[
    "zen.spamhaus.org",
    "bl.score.senderscore.com",
    "psbl.surriel.com",
];

const CYMRU_ORIGIN_ZONE: &str = "origin.asn.cymru.com";
const CYMRU_ASN_ZONE: &str = "asn.cymru.com";
const IPINFO_URL: &str = "https://ipinfo.io";
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// The subset of an ipinfo.io answer that is displayed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Geolocation {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl Geolocation {
    /// `City, Region, Country`, skipping unknown parts.
    pub fn place(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.city, &self.region, &self.country]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// Defines the contract for geolocating an address.
#[async_trait]
pub trait GeoLocator: Send + Sync {
    async fn locate(&self, addr: Ipv4Addr) -> anyhow::Result<Geolocation>;
}

/// [`GeoLocator`] backed by the ipinfo.io JSON API.
pub struct IpInfoLocator {
    http: reqwest::Client,
    base_url: String,
}

impl IpInfoLocator {
    pub fn new() -> anyhow::Result<Self> {
        let http: reqwest::Client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent(concat!("nsaudit/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: IPINFO_URL.to_string(),
        })
    }
}

#[async_trait]
impl GeoLocator for IpInfoLocator {
    async fn locate(&self, addr: Ipv4Addr) -> anyhow::Result<Geolocation> {
        let url: String = format!("{}/{addr}/json", self.base_url);
        let geolocation: Geolocation = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?
            .error_for_status()?
            .json()
            .await
            .context("unexpected geolocation response")?;
        Ok(geolocation)
    }
}

/// Everything learned about one address.
#[derive(Debug)]
pub struct IpIntelligence {
    pub geolocation: anyhow::Result<Geolocation>,
    /// `Ok(None)` when Team Cymru has no origin for the address.
    pub asn: Result<Option<AsnOrigin>, ResolutionError>,
    /// Blacklist zones that list the address.
    pub listed_on: Vec<&'static str>,
}

impl IpIntelligence {
    /// `(label, value)` per lookup, failures included.
    pub fn details(&self) -> Vec<(&'static str, String)> {
        let location: String = match &self.geolocation {
            Ok(geo) => geo.place().unwrap_or_else(|| String::from("unknown")),
            Err(e) => format!("unavailable ({e:#})"),
        };

        let asn: String = match &self.asn {
            Ok(Some(origin)) => {
                let name: &str = origin.name.as_deref().unwrap_or("unknown");
                format!(
                    "AS{} ({name}), range {}, {} / {}, allocated {}",
                    origin.asn, origin.prefix, origin.country, origin.registry, origin.allocated
                )
            }
            Ok(None) => String::from("not found"),
            Err(e) => format!("lookup failed ({e})"),
        };

        let blacklists: String = if self.listed_on.is_empty() {
            String::from("not listed")
        } else {
            format!("listed on {}", self.listed_on.join(", "))
        };

        vec![("Location", location), ("ASN", asn), ("Blacklists", blacklists)]
    }
}

/// Runs the three intelligence lookups for an address.
pub struct IntelService {
    resolver: Arc<dyn Resolver>,
    locator: Arc<dyn GeoLocator>,
}

impl IntelService {
    pub fn new(resolver: Arc<dyn Resolver>, locator: Arc<dyn GeoLocator>) -> Self {
        Self { resolver, locator }
    }

    pub async fn investigate(&self, addr: Ipv4Addr) -> IpIntelligence {
        let (geolocation, asn, listed_on) = tokio::join!(
            self.locator.locate(addr),
            self.origin(addr),
            self.blacklistings(addr)
        );
        IpIntelligence {
            geolocation,
            asn,
            listed_on,
        }
    }

    async fn origin(&self, addr: Ipv4Addr) -> Result<Option<AsnOrigin>, ResolutionError> {
        let query: String = format!("{}.{CYMRU_ORIGIN_ZONE}", reverse_ipv4(addr));
        let answers: Vec<String> = self.resolver.lookup_txt(&query).await?;
        let Some(mut origin) = answers.iter().find_map(|txt| parse_cymru_origin(txt)) else {
            return Ok(None);
        };

        if origin.name.is_none() {
            // Origin answers may list several ASNs; the first one names the network.
            if let Some(asn) = origin.asn.split_whitespace().next() {
                let query: String = format!("AS{asn}.{CYMRU_ASN_ZONE}");
                match self.resolver.lookup_txt(&query).await {
                    Ok(answers) => {
                        origin.name = answers.iter().find_map(|txt| parse_cymru_as_name(txt));
                    }
                    Err(e) => debug!("AS name lookup for {addr} failed: {e}"),
                }
            }
        }
        Ok(Some(origin))
    }

    async fn blacklistings(&self, addr: Ipv4Addr) -> Vec<&'static str> {
        let reversed: String = reverse_ipv4(addr);
        let mut listed_on: Vec<&'static str> = Vec::new();
        for zone in BLACKLIST_ZONES {
            match self.resolver.lookup_ip(&format!("{reversed}.{zone}")).await {
                Ok(answers) if !answers.is_empty() => listed_on.push(*zone),
                Ok(_) => {}
                Err(e) => debug!("{zone} lookup for {addr} failed: {e}"),
            }
        }
        listed_on
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
    use crate::testing::StaticResolver;
    use std::net::IpAddr;

    struct FixedLocation(Option<Geolocation>);

    #[async_trait]
    impl GeoLocator for FixedLocation {
        async fn locate(&self, _addr: Ipv4Addr) -> anyhow::Result<Geolocation> {
            self.0.clone().context("geolocation service unreachable")
        }
    }

    const ADDR: Ipv4Addr = Ipv4Addr::new(192, 0, 2, 7);

    #[test]
    fn ipinfo_json_deserializes() {
        let body: &str = r#"{
            "ip": "1.1.1.1",
            "hostname": "one.one.one.one",
            "city": "Brisbane",
            "region": "Queensland",
            "country": "AU",
            "anycast": true
        }"#;
        let geo: Geolocation = serde_json::from_str(body).unwrap();
        assert_eq!(geo.place().as_deref(), Some("Brisbane, Queensland, AU"));

        let bogon: Geolocation = serde_json::from_str(r#"{"ip": "10.0.0.1", "bogon": true}"#).unwrap();
        assert_eq!(bogon.place(), None);
    }

    #[tokio::test]
    async fn origin_without_name_is_completed_from_as_record() {
        let mut resolver: StaticResolver = StaticResolver::default();
        resolver.txt.insert(
            String::from("7.2.0.192.origin.asn.cymru.com"),
            vec![String::from("64496 | 192.0.2.0/24 | ZZ | arin | 2010-01-01")],
        );
        resolver.txt.insert(
            String::from("AS64496.asn.cymru.com"),
            vec![String::from("64496 | ZZ | arin | 2010-01-01 | EXAMPLE-NET, ZZ")],
        );
        resolver.ips.insert(
            String::from("7.2.0.192.psbl.surriel.com"),
            vec![IpAddr::V4(Ipv4Addr::new(127, 0, 0, 2))],
        );

        let service: IntelService = IntelService::new(
            Arc::new(resolver),
            Arc::new(FixedLocation(Some(Geolocation {
                city: Some(String::from("Springfield")),
                region: None,
                country: Some(String::from("US")),
            }))),
        );
        let intel: IpIntelligence = service.investigate(ADDR).await;

        let origin: AsnOrigin = intel.asn.as_ref().unwrap().clone().unwrap();
        assert_eq!(origin.name.as_deref(), Some("EXAMPLE-NET, ZZ"));
        assert_eq!(intel.listed_on, ["psbl.surriel.com"]);
        let details: Vec<(&str, String)> = intel.details();
        assert_eq!(details[0], ("Location", String::from("Springfield, US")));
        assert_eq!(
            details[1].1,
            "AS64496 (EXAMPLE-NET, ZZ), range 192.0.2.0/24, ZZ / arin, allocated 2010-01-01"
        );
        assert_eq!(details[2].1, "listed on psbl.surriel.com");
    }

    #[tokio::test]
    async fn failures_become_explanations() {
        let service: IntelService =
            IntelService::new(Arc::new(StaticResolver::default()), Arc::new(FixedLocation(None)));
        let intel: IpIntelligence = service.investigate(ADDR).await;

        let values: Vec<String> = intel.details().into_iter().map(|(_, value)| value).collect();
        assert_eq!(
            values,
            [
                "unavailable (geolocation service unreachable)",
                "not found",
                "not listed",
            ]
        );
    }
}
