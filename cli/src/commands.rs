pub mod audit;

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use nsaudit_common::config::{Config, DEFAULT_QUERY_TOOL};
use nsaudit_common::dns::Domain;

#[derive(Parser, Debug)]
#[command(name = "nsaudit")]
#[command(version, about = "Audits the nameservers of a domain for common DNS misconfigurations.")]
pub struct CommandLine {
    /// Domain whose nameservers are audited
    pub domain: Domain,

    /// Probe nameservers concurrently
    #[arg(short, long)]
    pub parallel: bool,

    /// Skip the record lookups shown before the audit
    #[arg(long)]
    pub skip_recon: bool,

    /// Do not geolocate or look up ASN and blacklist data for resolved addresses
    #[arg(long)]
    pub no_intel: bool,

    /// Query tool used for transfer, DNSSEC and amplification probes
    #[arg(long = "dig", value_name = "PATH", default_value = DEFAULT_QUERY_TOOL)]
    pub query_tool: PathBuf,

    /// Hide the startup banner
    #[arg(long)]
    pub no_banner: bool,

    /// Less output. -q drops headers; -qq hides record lookups and informational findings,
    /// printing a count of the hidden findings per server instead
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,

    /// More log output (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn to_config(&self) -> Config {
        Config {
            quiet: self.quiet,
            no_banner: self.no_banner,
            parallel: self.parallel,
            query_tool: self.query_tool.clone(),
            skip_recon: self.skip_recon,
            no_intel: self.no_intel,
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
