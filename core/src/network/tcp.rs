use std::time::Duration;

use async_trait::async_trait;
use nsaudit_common::probe::port::PortProber;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

/// Plain TCP connect check. The connection is dropped as soon as it is established.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpPortProber;

#[async_trait]
impl PortProber for TcpPortProber {
    async fn is_open(&self, host: &str, port: u16, probe_timeout: Duration) -> bool {
        match timeout(probe_timeout, TcpStream::connect((host, port))).await {
            Ok(Ok(_stream)) => true,
            Ok(Err(e)) => {
                debug!("{host}:{port} refused connection: {e}");
                false
            }
            Err(_elapsed) => {
                debug!("{host}:{port} did not answer within {probe_timeout:?}");
                false
            }
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
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn listening_port_is_open() {
        let listener: TcpListener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port: u16 = listener.local_addr().unwrap().port();

        assert!(
            TcpPortProber
                .is_open("127.0.0.1", port, Duration::from_secs(2))
                .await
        );
    }

    #[tokio::test]
    async fn released_port_is_closed() {
        let listener: TcpListener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port: u16 = listener.local_addr().unwrap().port();
        drop(listener);

        assert!(
            !TcpPortProber
                .is_open("127.0.0.1", port, Duration::from_secs(2))
                .await
        );
    }

    #[tokio::test]
    #[ignore]
    async fn unroutable_address_times_out() {
        assert!(
            !TcpPortProber
                .is_open("203.0.113.1", 53, Duration::from_millis(300))
                .await
        );
    }
}
