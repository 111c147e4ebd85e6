use nsaudit_common::dns::Nameserver;
use nsaudit_common::probe::ProbeResult;
use nsaudit_common::probe::port::{CONNECT_TIMEOUT, DNS_PORT, PortProber};

/// Checks whether `ns` accepts TCP on port 53, which zone transfers require.
pub async fn probe(ports: &dyn PortProber, ns: &Nameserver) -> ProbeResult {
    if ports.is_open(ns.host(), DNS_PORT, CONNECT_TIMEOUT).await {
        ProbeResult::PortOpen { port: DNS_PORT }
    } else {
        ProbeResult::PortClosed { port: DNS_PORT }
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
