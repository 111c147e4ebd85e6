//! Interpretation of free-form TXT answers: SPF policies, DKIM/DMARC records and Team Cymru
//! IP-to-ASN responses.

use std::net::Ipv4Addr;

const SPF_PREFIX: &str = "v=spf1";
const DKIM_PREFIX: &str = "v=DKIM1";
const DMARC_PREFIX: &str = "v=DMARC1";
const CYMRU_ORIGIN_FIELDS: usize = 5;
const CYMRU_AS_NAME_FIELDS: usize = 5;

/// Email authentication policy published in a TXT record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyRecord {
    Dkim,
    Dmarc,
}

impl PolicyRecord {
    pub fn label(self) -> &'static str {
        match self {
            Self::Dkim => "DKIM",
            Self::Dmarc => "DMARC",
        }
    }
}

pub fn is_spf(txt: &str) -> bool {
    txt.starts_with(SPF_PREFIX)
}

/// The mechanisms of an SPF record, with `ip4:` qualifiers reduced to the bare network.
pub fn spf_mechanisms(spf: &str) -> Vec<String> {
    if !is_spf(spf) {
        return Vec::new();
    }
    spf.split_whitespace()
        .skip(1)
        .map(|mechanism| mechanism.strip_prefix("ip4:").unwrap_or(mechanism).to_string())
        .collect()
}

pub fn classify_policy(txt: &str) -> Option<PolicyRecord> {
    if txt.starts_with(DKIM_PREFIX) {
        Some(PolicyRecord::Dkim)
    } else if txt.starts_with(DMARC_PREFIX) {
        Some(PolicyRecord::Dmarc)
    } else {
        None
    }
}

/// `192.0.2.1` → `1.2.0.192`, the label order DNSBLs and Team Cymru expect.
pub fn reverse_ipv4(addr: Ipv4Addr) -> String {
    let [a, b, c, d] = addr.octets();
    format!("{d}.{c}.{b}.{a}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsnOrigin {
    pub asn: String,
    pub prefix: String,
    pub country: String,
    pub registry: String,
    pub allocated: String,
    /// Present only when the origin answer carried a sixth field.
    pub name: Option<String>,
}

/// Parses an `origin.asn.cymru.com` answer,
/// `ASN | prefix | country | registry | allocated [| name]`.
pub fn parse_cymru_origin(txt: &str) -> Option<AsnOrigin> {
    let fields: Vec<&str> = txt.split('|').map(str::trim).collect();
    if fields.len() < CYMRU_ORIGIN_FIELDS {
        return None;
    }
    Some(AsnOrigin {
        asn: fields[0].to_string(),
        prefix: fields[1].to_string(),
        country: fields[2].to_string(),
        registry: fields[3].to_string(),
        allocated: fields[4].to_string(),
        name: fields.get(5).map(|name| name.to_string()),
    })
}

/// Parses an `AS<n>.asn.cymru.com` answer, `ASN | country | registry | allocated | name`,
/// returning the AS name.
pub fn parse_cymru_as_name(txt: &str) -> Option<String> {
    let fields: Vec<&str> = txt.split('|').map(str::trim).collect();
    if fields.len() < CYMRU_AS_NAME_FIELDS {
        return None;
    }
    fields.last().map(|name| name.to_string())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
