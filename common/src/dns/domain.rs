//! # Audit Target Model
//!
//! The zone under test. Parsed once from the command line and immutable for the run.
//!
//! Accepted input is a hostname in presentation format:
//! * Case-insensitive (stored lowercase).
//! * An optional trailing root dot (`example.com.`), which is dropped.
//! * At most 253 characters, labels of 1 to 63 characters drawn from `a-z`, `0-9`, `-` and `_`.

use std::fmt;
use std::str::FromStr;

const MAX_NAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Domain(String);

impl Domain {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Domain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed: &str = s.trim();
        let name: String = trimmed.strip_suffix('.').unwrap_or(trimmed).to_ascii_lowercase();

        if name.is_empty() {
            return Err(String::from("domain must not be empty"));
        }
        if name.len() > MAX_NAME_LEN {
            return Err(format!("domain exceeds {MAX_NAME_LEN} characters: {s}"));
        }

        for label in name.split('.') {
            validate_label(label).map_err(|reason| format!("invalid domain {s}: {reason}"))?;
        }

        Ok(Self(name))
    }
}

fn validate_label(label: &str) -> Result<(), String> {
    if label.is_empty() {
        return Err(String::from("empty label"));
    }
    if label.len() > MAX_LABEL_LEN {
        return Err(format!("label {label:?} exceeds {MAX_LABEL_LEN} characters"));
    }
    if label.starts_with('-') || label.ends_with('-') {
        return Err(format!("label {label:?} starts or ends with a hyphen"));
    }
    if let Some(c) = label
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(format!("label {label:?} contains {c:?}"));
    }
    Ok(())
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
    fn from_str_normalizes_case_and_root_dot() {
        let domain: Domain = Domain::from_str("  Example.COM. ").unwrap();
        assert_eq!(domain.as_str(), "example.com");
        assert_eq!(domain.to_string(), "example.com");
    }

    #[test]
    fn from_str_accepts_underscores_and_hyphens() {
        assert!(Domain::from_str("_dmarc.my-site.example").is_ok());
        assert!(Domain::from_str("localhost").is_ok());
    }

    #[test]
    fn from_str_rejects_malformed_names() {
        assert!(Domain::from_str("").is_err());
        assert!(Domain::from_str(".").is_err());
        assert!(Domain::from_str("example..com").is_err());
        assert!(Domain::from_str("-bad.example.com").is_err());
        assert!(Domain::from_str("bad-.example.com").is_err());
        assert!(Domain::from_str("exa mple.com").is_err());
        assert!(Domain::from_str("example.com/path").is_err());

        let long_label: String = format!("{}.com", "a".repeat(64));
        assert!(Domain::from_str(&long_label).is_err());

        let long_name: String = vec!["abcdefghij"; 26].join(".");
        assert!(Domain::from_str(&long_name).is_err());
    }
}
