//! # Vulnerability probes
//!
//! Each probe issues one or more query tool invocations (or a TCP connect) and turns every
//! attempt into exactly one [`ProbeResult`][nsaudit_common::probe::ProbeResult]. Probes never
//! fail: execution problems surface as denied, absent or closed classifications.
//!
//! * [`transfer`]: AXFR and IXFR attempts against one nameserver, plus analysis of a leaked
//!   zone.
//! * [`rate_limit`]: repeated AXFR attempts timed against a throttling threshold.
//! * [`amplification`]: response/query size ratios for record types abused in reflection
//!   attacks.
//! * [`dnssec`] and [`port`]: the ancillary checks.

pub mod amplification;
pub mod dnssec;
pub mod port;
pub mod rate_limit;
pub mod transfer;
