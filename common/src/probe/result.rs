use std::fmt;
use std::time::Duration;

use crate::dns::record::RecordTypeDistribution;
use crate::probe::finding::Severity;

/// Amplification factors strictly above this are reported as warnings.
pub const HIGH_AMPLIFICATION_FACTOR: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferKind {
    /// Full zone transfer.
    Axfr,
    /// Incremental zone transfer.
    Ixfr,
}

impl TransferKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Axfr => "AXFR",
            Self::Ixfr => "IXFR",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::Axfr => "full zone transfer",
            Self::Ixfr => "incremental zone transfer",
        }
    }
}

/// Why a transfer attempt was classified as denied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenialReason {
    /// The tool reported a transfer failure marker.
    Refused,
    /// The tool produced no output.
    NoData,
    /// The tool was killed at its deadline.
    TimedOut,
    /// The tool could not be run.
    ExecutionFailed(String),
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Refused => f.write_str("transfer refused"),
            Self::NoData => f.write_str("no data received"),
            Self::TimedOut => f.write_str("query timed out"),
            Self::ExecutionFailed(reason) => write!(f, "query tool failed: {reason}"),
        }
    }
}

/// Structural oddities in a transferred zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneAnomaly {
    /// A valid transfer is bracketed by exactly two SOA records.
    SoaCount(usize),
    /// Fewer than two NS records.
    TooFewNameservers(usize),
}

/// The classification of one probe step. Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeResult {
    TransferAllowed {
        kind: TransferKind,
        record_count: usize,
        distribution: RecordTypeDistribution,
    },
    TransferDenied {
        kind: TransferKind,
        reason: DenialReason,
    },
    /// A record type in an allowed AXFR whose contents tend to leak internal topology.
    SensitiveRecords {
        record_type: String,
        count: usize,
    },
    ZoneAnomaly(ZoneAnomaly),
    /// `attempt` is 1-based.
    RateLimited {
        attempt: usize,
        elapsed: Duration,
    },
    NoRateLimitDetected {
        attempts: usize,
    },
    AmplificationMeasured {
        query_type: String,
        query_size: usize,
        response_size: usize,
        factor: f64,
    },
    DnssecPresent,
    DnssecAbsent,
    PortOpen {
        port: u16,
    },
    PortClosed {
        port: u16,
    },
    /// A check that could not run, with the reason shown to the user.
    Skipped {
        reason: String,
    },
}

impl ProbeResult {
    /// Disclosure-relevant results are warnings; everything else is informational.
    pub fn severity(&self) -> Severity {
        match self {
            Self::TransferAllowed { .. } | Self::SensitiveRecords { .. } | Self::ZoneAnomaly(_) => {
                Severity::Warning
            }
            Self::AmplificationMeasured { factor, .. } if *factor > HIGH_AMPLIFICATION_FACTOR => {
                Severity::Warning
            }
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for ProbeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransferAllowed {
                kind, record_count, ..
            } => write!(
                f,
                "{} ({}) is allowed! Received {record_count} records in {} response",
                kind.label(),
                kind.description(),
                kind.label()
            ),
            Self::TransferDenied { kind, reason } => {
                write!(f, "{} not allowed ({reason})", kind.label())
            }
            Self::SensitiveRecords { record_type, count } => write!(
                f,
                "{count} {record_type} records found. These may contain sensitive information"
            ),
            Self::ZoneAnomaly(ZoneAnomaly::SoaCount(count)) => write!(
                f,
                "Unusual number of SOA records ({count}). Expected 2 (start and end of transfer)"
            ),
            Self::ZoneAnomaly(ZoneAnomaly::TooFewNameservers(count)) => write!(
                f,
                "Less than 2 NS records found ({count}). This is unusual for a valid zone"
            ),
            Self::RateLimited { attempt, elapsed } => write!(
                f,
                "Attempt {attempt} took {:.2}s. Possible rate limiting detected (timing heuristic)",
                elapsed.as_secs_f64()
            ),
            Self::NoRateLimitDetected { attempts } => write!(
                f,
                "No obvious rate limiting detected after {attempts} attempts (timing heuristic)"
            ),
            Self::AmplificationMeasured {
                query_type,
                query_size,
                response_size,
                factor,
            } => {
                write!(
                    f,
                    "{query_type} query: {query_size} bytes sent, {response_size} bytes received, amplification factor {factor:.2}"
                )?;
                if *factor > HIGH_AMPLIFICATION_FACTOR {
                    write!(f, " - high amplification factor for {query_type} query")?;
                }
                Ok(())
            }
            Self::DnssecPresent => {
                f.write_str("DNSSEC is enabled, which may provide additional security")
            }
            Self::DnssecAbsent => f.write_str("DNSSEC does not appear to be enabled"),
            Self::PortOpen { port } => {
                write!(f, "TCP port {port} is open (required for zone transfers)")
            }
            Self::PortClosed { port } => write!(f, "TCP port {port} is closed or filtered"),
            Self::Skipped { reason } => write!(f, "Skipped: {reason}"),
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
