use std::fmt;

use crate::dns::{Domain, Nameserver};
use crate::probe::result::ProbeResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    /// Disclosure-relevant. Rendered with a `WARNING:` prefix.
    Warning,
}

/// What a finding is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    Nameserver(Nameserver),
    /// Domain-wide checks that are not tied to one server (amplification).
    Domain(Domain),
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nameserver(ns) => write!(f, "{ns}"),
            Self::Domain(domain) => write!(f, "{domain}"),
        }
    }
}

/// The probe family a finding came from. Declaration order is report order within a
/// nameserver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CheckKind {
    Enumeration,
    ZoneTransfer,
    TcpPort,
    Dnssec,
    RateLimit,
    Amplification,
}

impl CheckKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Enumeration => "Nameserver Enumeration",
            Self::ZoneTransfer => "Zone Transfer",
            Self::TcpPort => "TCP Reachability",
            Self::Dnssec => "DNSSEC",
            Self::RateLimit => "Rate Limiting",
            Self::Amplification => "DNS Amplification",
        }
    }
}

/// The unit appended to a report. Never mutated after it is produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SecurityFinding {
    pub subject: Subject,
    pub check: CheckKind,
    pub result: ProbeResult,
    pub severity: Severity,
}

impl SecurityFinding {
    pub fn new(subject: Subject, check: CheckKind, result: ProbeResult) -> Self {
        let severity: Severity = result.severity();
        Self {
            subject,
            check,
            result,
            severity,
        }
    }

    /// The single report line for this finding.
    pub fn line(&self) -> String {
        match self.severity {
            Severity::Warning => format!("WARNING: {}", self.result),
            Severity::Info => self.result.to_string(),
        }
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
    use crate::probe::result::{DenialReason, TransferKind};

    #[test]
    fn line_prefixes_warnings_only() {
        let ns: Subject = Subject::Nameserver(Nameserver::new("ns1.example.com"));
        let denied: SecurityFinding = SecurityFinding::new(
            ns.clone(),
            CheckKind::ZoneTransfer,
            ProbeResult::TransferDenied {
                kind: TransferKind::Axfr,
                reason: DenialReason::NoData,
            },
        );
        assert!(!denied.line().contains("WARNING"));

        let leak: SecurityFinding = SecurityFinding::new(
            ns,
            CheckKind::ZoneTransfer,
            ProbeResult::SensitiveRecords {
                record_type: String::from("TXT"),
                count: 3,
            },
        );
        assert_eq!(leak.severity, Severity::Warning);
        assert!(leak.line().starts_with("WARNING: 3 TXT records found"));
    }
}
