//! Zone transfer verdicts.
//!
//! A transfer is **allowed** iff the tool's combined output has content AND none of its
//! diagnostic lines carries one of the failure markers below. The two conditions are
//! independent: a failure marker next to other diagnostic text is still a denial.
//!
//! Markers are only looked for on diagnostic lines (`;` comments and `dig:` errors). Record
//! data is free text and a leaked TXT record may quote any of these phrases.

/// Substrings `dig` prints when a transfer did not happen.
pub const FAILURE_MARKERS: &[&str] = &[
    "Transfer failed",
    "connection refused",
    "timed out",
    "communications error",
    "couldn't get address",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferVerdict {
    Allowed,
    /// The output carried a failure marker.
    Refused,
    /// The output was blank.
    Empty,
}

impl TransferVerdict {
    pub fn is_allowed(self) -> bool {
        self == Self::Allowed
    }
}

/// `true` if `output` contains anything other than whitespace.
pub fn has_content(output: &[u8]) -> bool {
    output.iter().any(|b| !b.is_ascii_whitespace())
}

/// `true` for lines `dig` prints about the query rather than as answer data.
fn is_diagnostic(line: &str) -> bool {
    let line: &str = line.trim_start();
    line.starts_with(';') || line.starts_with("dig:")
}

pub fn contains_failure_marker(output: &str) -> bool {
    output
        .lines()
        .filter(|line| is_diagnostic(line))
        .any(|line| FAILURE_MARKERS.iter().any(|marker| line.contains(marker)))
}

pub fn classify_transfer(output: &[u8]) -> TransferVerdict {
    if !has_content(output) {
        return TransferVerdict::Empty;
    }
    if contains_failure_marker(&String::from_utf8_lossy(output)) {
        return TransferVerdict::Refused;
    }
    TransferVerdict::Allowed
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

    const RECORD: &str = "example.com. 3600 IN SOA ns1.example.com. admin.example.com. 1 2 3 4 5\n";

    #[test]
    fn classify_is_allowed_iff_content_and_no_marker() {
        for marker in FAILURE_MARKERS {
            let cases: [(String, TransferVerdict); 4] = [
                (String::new(), TransferVerdict::Empty),
                (RECORD.to_string(), TransferVerdict::Allowed),
                (format!("; {marker}.\n"), TransferVerdict::Refused),
                (format!("{RECORD};; {marker}.\n"), TransferVerdict::Refused),
            ];
            for (output, expected) in cases {
                assert_eq!(
                    classify_transfer(output.as_bytes()),
                    expected,
                    "output: {output:?}"
                );
            }
        }
    }

    #[test]
    fn whitespace_only_output_is_empty() {
        assert_eq!(classify_transfer(b" \n\t\n"), TransferVerdict::Empty);
        assert!(!classify_transfer(b"\n").is_allowed());
    }

    #[test]
    fn real_dig_refusal_is_denied() {
        let output: &[u8] = b"; Transfer failed.\n";
        assert_eq!(classify_transfer(output), TransferVerdict::Refused);
        let timeout: &[u8] = b";; communications error to 192.0.2.1#53: timed out\n";
        assert_eq!(classify_transfer(timeout), TransferVerdict::Refused);
        let unresolvable: &[u8] = b"dig: couldn't get address for 'ns9.example.com': not found\n";
        assert_eq!(classify_transfer(unresolvable), TransferVerdict::Refused);
    }

    #[test]
    fn marker_inside_record_data_is_still_a_leak() {
        let zone: &str = "\
example.com. 3600 IN SOA ns1.example.com. admin.example.com. 1 2 3 4 5
example.com. 3600 IN NS ns1.example.com.
example.com. 3600 IN TXT \"status page: api timed out yesterday\"
example.com. 3600 IN HINFO \"Transfer failed\" \"connection refused\"
example.com. 3600 IN SOA ns1.example.com. admin.example.com. 1 2 3 4 5
";
        assert_eq!(classify_transfer(zone.as_bytes()), TransferVerdict::Allowed);
        assert!(!contains_failure_marker(zone));
    }
}
