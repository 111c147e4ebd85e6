//! Zone dump parsing and analysis.
//!
//! A line qualifies as a record if it has at least four whitespace-separated fields; the fourth
//! is the record type. Comment lines (`;`) and shorter lines are counted but not parsed.

use nsaudit_common::dns::record::{RecordTypeDistribution, ZoneRecord};
use nsaudit_common::probe::ZoneAnomaly;
use tracing::trace;

/// Record types whose presence in a leaked zone exposes internal hosts, mail routing or
/// service layout.
pub const SENSITIVE_TYPES: &[&str] = &["AAAA", "MX", "TXT", "SRV"];

const MIN_FIELDS: usize = 4;
const EXPECTED_SOA: usize = 2;
const MIN_NS: usize = 2;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedZone {
    pub records: Vec<ZoneRecord>,
    /// Non-blank lines that did not qualify as records.
    pub unparsed_lines: usize,
}

impl ParsedZone {
    pub fn distribution(&self) -> RecordTypeDistribution {
        let mut distribution: RecordTypeDistribution = RecordTypeDistribution::new();
        for record in &self.records {
            *distribution.entry(record.record_type.clone()).or_default() += 1;
        }
        distribution
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneAnalysis {
    /// `(record type, count)` for each sensitive type present, in [`SENSITIVE_TYPES`] order.
    pub sensitive: Vec<(String, usize)>,
    pub anomalies: Vec<ZoneAnomaly>,
}

pub fn parse_zone(output: &str) -> ParsedZone {
    let mut zone: ParsedZone = ParsedZone::default();
    for line in output.lines().map(str::trim).filter(|line| !line.is_empty()) {
        match parse_record(line) {
            Some(record) => zone.records.push(record),
            None => {
                trace!("skipping zone line: {line}");
                zone.unparsed_lines += 1;
            }
        }
    }
    zone
}

fn parse_record(line: &str) -> Option<ZoneRecord> {
    if line.starts_with(';') {
        return None;
    }
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < MIN_FIELDS {
        return None;
    }
    Some(ZoneRecord {
        name: fields[0].to_string(),
        ttl: fields[1].parse().ok(),
        class: fields[2].to_string(),
        record_type: fields[3].to_ascii_uppercase(),
        data: fields[MIN_FIELDS..].iter().map(|f| f.to_string()).collect(),
    })
}

pub fn analyze(distribution: &RecordTypeDistribution) -> ZoneAnalysis {
    let sensitive: Vec<(String, usize)> = SENSITIVE_TYPES
        .iter()
        .filter_map(|rtype| {
            distribution
                .get(*rtype)
                .map(|count| (rtype.to_string(), *count))
        })
        .collect();

    let mut anomalies: Vec<ZoneAnomaly> = Vec::new();
    let soa: usize = distribution.get("SOA").copied().unwrap_or(0);
    if soa != EXPECTED_SOA {
        anomalies.push(ZoneAnomaly::SoaCount(soa));
    }
    let ns: usize = distribution.get("NS").copied().unwrap_or(0);
    if ns < MIN_NS {
        anomalies.push(ZoneAnomaly::TooFewNameservers(ns));
    }

    ZoneAnalysis {
        sensitive,
        anomalies,
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

    const HEALTHY_ZONE: &str = "\
example.com.\t3600\tIN\tSOA\tns1.example.com. hostmaster.example.com. 2024010101 7200 3600 1209600 3600
example.com.\t3600\tIN\tNS\tns1.example.com.
example.com.\t3600\tIN\tNS\tns2.example.com.
example.com.\t300\tIN\tA\t192.0.2.10
www.example.com.\t300\tIN\tCNAME\texample.com.
example.com.\t3600\tIN\tSOA\tns1.example.com. hostmaster.example.com. 2024010101 7200 3600 1209600 3600
";

    #[test]
    fn parse_zone_tokenizes_records() {
        let zone: ParsedZone = parse_zone(HEALTHY_ZONE);
        assert_eq!(zone.records.len(), 6);
        assert_eq!(zone.unparsed_lines, 0);

        let a: &ZoneRecord = &zone.records[3];
        assert_eq!(a.name, "example.com.");
        assert_eq!(a.ttl, Some(300));
        assert_eq!(a.class, "IN");
        assert_eq!(a.record_type, "A");
        assert_eq!(a.data, ["192.0.2.10"]);
    }

    #[test]
    fn distribution_sums_to_record_count() {
        let noisy: String = format!("{HEALTHY_ZONE}\n; a comment line here\nshort line\n\n");
        let zone: ParsedZone = parse_zone(&noisy);
        let distribution: RecordTypeDistribution = zone.distribution();

        assert_eq!(distribution.values().sum::<usize>(), zone.records.len());
        assert_eq!(zone.unparsed_lines, 2);
        assert_eq!(distribution.get("SOA"), Some(&2));
        assert_eq!(distribution.get("NS"), Some(&2));
    }

    #[test]
    fn missing_ttl_is_none() {
        let zone: ParsedZone = parse_zone("host.example.com. - IN TXT \"v=spf1 -all\"");
        assert_eq!(zone.records[0].ttl, None);
        assert_eq!(zone.records[0].record_type, "TXT");
    }

    #[test]
    fn analyze_healthy_zone_has_no_anomalies() {
        let analysis: ZoneAnalysis = analyze(&parse_zone(HEALTHY_ZONE).distribution());
        assert!(analysis.anomalies.is_empty());
        assert!(analysis.sensitive.is_empty());
    }

    #[test]
    fn analyze_flags_single_soa() {
        let one_soa: String = HEALTHY_ZONE.lines().take(5).collect::<Vec<_>>().join("\n");
        let analysis: ZoneAnalysis = analyze(&parse_zone(&one_soa).distribution());
        assert_eq!(analysis.anomalies, [ZoneAnomaly::SoaCount(1)]);
    }

    #[test]
    fn analyze_flags_single_ns() {
        let one_ns: String = HEALTHY_ZONE
            .lines()
            .filter(|line| !line.contains("ns2.example.com."))
            .collect::<Vec<_>>()
            .join("\n");
        let analysis: ZoneAnalysis = analyze(&parse_zone(&one_ns).distribution());
        assert_eq!(analysis.anomalies, [ZoneAnomaly::TooFewNameservers(1)]);
    }

    #[test]
    fn analyze_reports_sensitive_types_in_fixed_order() {
        let leaky: String = format!(
            "{HEALTHY_ZONE}\
_sip._tcp.example.com. 300 IN SRV 10 5 5060 sip.example.com.
example.com. 300 IN TXT \"internal-note\"
example.com. 300 IN MX 10 mail.example.com.
example.com. 300 IN MX 20 backup.example.com.
"
        );
        let analysis: ZoneAnalysis = analyze(&parse_zone(&leaky).distribution());
        assert_eq!(
            analysis.sensitive,
            [
                (String::from("MX"), 2),
                (String::from("TXT"), 1),
                (String::from("SRV"), 1)
            ]
        );
    }
}
