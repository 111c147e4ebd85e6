//! `dig` command line construction.
//!
//! Every query is issued in `+short` mode and laid out as
//! `+short [+time=T] [+tries=N] [+stats] [+dnssec] <TYPE|axfr|ixfr=N> <domain> [@nameserver]`.

use std::fmt;

use nsaudit_common::dns::{Domain, Nameserver};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryType {
    Axfr,
    /// Incremental transfer starting after `serial`.
    Ixfr { serial: u32 },
    /// Any ordinary record type mnemonic (`ANY`, `TXT`, `DNSKEY`, ...).
    Record(String),
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Axfr => f.write_str("axfr"),
            Self::Ixfr { serial } => write!(f, "ixfr={serial}"),
            Self::Record(rtype) => f.write_str(rtype),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigQuery {
    domain: String,
    query_type: QueryType,
    server: Option<String>,
    time_secs: Option<u64>,
    tries: Option<u8>,
    stats: bool,
    dnssec: bool,
}

impl DigQuery {
    pub fn new(domain: &Domain, query_type: QueryType) -> Self {
        Self {
            domain: domain.to_string(),
            query_type,
            server: None,
            time_secs: None,
            tries: None,
            stats: false,
            dnssec: false,
        }
    }

    pub fn axfr(domain: &Domain) -> Self {
        Self::new(domain, QueryType::Axfr)
    }

    pub fn ixfr(domain: &Domain, serial: u32) -> Self {
        Self::new(domain, QueryType::Ixfr { serial })
    }

    pub fn record(domain: &Domain, rtype: &str) -> Self {
        Self::new(domain, QueryType::Record(rtype.to_string()))
    }

    /// Sends the query to `nameserver` instead of the system resolver.
    pub fn server(mut self, nameserver: &Nameserver) -> Self {
        self.server = Some(nameserver.host().to_string());
        self
    }

    /// Per-try timeout handed to the tool (`+time=`).
    pub fn time(mut self, secs: u64) -> Self {
        self.time_secs = Some(secs);
        self
    }

    pub fn tries(mut self, tries: u8) -> Self {
        self.tries = Some(tries);
        self
    }

    /// Asks the tool to print its size statistics (`+stats`).
    pub fn stats(mut self) -> Self {
        self.stats = true;
        self
    }

    /// Sets the DO bit (`+dnssec`).
    pub fn dnssec(mut self) -> Self {
        self.dnssec = true;
        self
    }

    pub fn query_type(&self) -> &QueryType {
        &self.query_type
    }

    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = vec![String::from("+short")];
        if let Some(secs) = self.time_secs {
            args.push(format!("+time={secs}"));
        }
        if let Some(tries) = self.tries {
            args.push(format!("+tries={tries}"));
        }
        if self.stats {
            args.push(String::from("+stats"));
        }
        if self.dnssec {
            args.push(String::from("+dnssec"));
        }
        args.push(self.query_type.to_string());
        args.push(self.domain.clone());
        if let Some(server) = &self.server {
            args.push(format!("@{server}"));
        }
        args
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
    use std::str::FromStr;

    fn domain() -> Domain {
        Domain::from_str("example.com").unwrap()
    }

    #[test]
    fn args_for_bounded_axfr() {
        let ns: Nameserver = Nameserver::new("ns1.example.com.");
        let args: Vec<String> = DigQuery::axfr(&domain()).time(5).tries(1).server(&ns).args();
        assert_eq!(
            args,
            ["+short", "+time=5", "+tries=1", "axfr", "example.com", "@ns1.example.com"]
        );
    }

    #[test]
    fn args_for_ixfr_and_flags() {
        let args: Vec<String> = DigQuery::ixfr(&domain(), 1).args();
        assert_eq!(args, ["+short", "ixfr=1", "example.com"]);

        let args: Vec<String> = DigQuery::record(&domain(), "DNSKEY")
            .dnssec()
            .stats()
            .args();
        assert_eq!(args, ["+short", "+stats", "+dnssec", "DNSKEY", "example.com"]);
    }
}
