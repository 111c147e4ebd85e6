use std::time::Duration;

/// Per-attempt timeout, and the elapsed time at which an attempt counts as throttled.
pub const ATTEMPT_THRESHOLD: Duration = Duration::from_secs(2);
/// Pause between consecutive attempts against the same nameserver.
pub const ATTEMPT_INTERVAL: Duration = Duration::from_millis(100);

/// How hard the rate-limit probe pushes a nameserver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitProfile {
    /// Three attempts, run as part of the general zone transfer check.
    ZoneTransfer,
    /// Five attempts, for a dedicated AXFR sweep.
    Axfr,
}

impl RateLimitProfile {
    /// Every profile, in the order they run against each nameserver.
    pub const ALL: [RateLimitProfile; 2] = [Self::ZoneTransfer, Self::Axfr];

    pub fn attempts(self) -> usize {
        match self {
            Self::ZoneTransfer => 3,
            Self::Axfr => 5,
        }
    }
}
