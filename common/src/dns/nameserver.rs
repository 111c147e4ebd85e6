use std::fmt;

/// A hostname authoritative for the audited zone.
///
/// Discovered once by the nameserver enumerator and read-only afterwards. The root dot that
/// resolvers return (`ns1.example.com.`) is stripped so the name can be handed to both the
/// query tool (`@ns1.example.com`) and a TCP connect.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Nameserver {
    host: String,
}

impl Nameserver {
    pub fn new(host: impl AsRef<str>) -> Self {
        let host: &str = host.as_ref().trim();
        let host: String = host.strip_suffix('.').unwrap_or(host).to_ascii_lowercase();
        Self { host }
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

impl fmt::Display for Nameserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.host)
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
