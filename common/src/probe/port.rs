use std::time::Duration;

use async_trait::async_trait;

pub const DNS_PORT: u16 = 53;
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Defines the strategy for checking whether a TCP port accepts connections.
#[async_trait]
pub trait PortProber: Send + Sync {
    /// Returns `true` if a connection to `host:port` completes within `timeout`.
    ///
    /// Name resolution failures, refusals and timeouts are all reported as `false`.
    async fn is_open(&self, host: &str, port: u16, timeout: Duration) -> bool;
}
