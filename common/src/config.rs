use std::path::PathBuf;

pub const DEFAULT_QUERY_TOOL: &str = "dig";

/// Run-wide settings, assembled from command line flags.
#[derive(Debug, Clone)]
pub struct Config {
    /// Suppresses decorative output. `1` drops headers, `2` also drops informational lines.
    pub quiet: u8,
    pub no_banner: bool,
    /// Probe nameservers concurrently (one task per nameserver).
    pub parallel: bool,
    /// Path or name of the external query tool.
    pub query_tool: PathBuf,
    /// Skips the plain record lookups that precede the vulnerability probes.
    pub skip_recon: bool,
    /// Disables geolocation, ASN and blacklist lookups for resolved addresses.
    pub no_intel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quiet: 0,
            no_banner: false,
            parallel: false,
            query_tool: PathBuf::from(DEFAULT_QUERY_TOOL),
            skip_recon: false,
            no_intel: false,
        }
    }
}
