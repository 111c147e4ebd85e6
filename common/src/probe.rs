pub mod attempt;
pub mod finding;
pub mod port;
pub mod rate_limit;
pub mod result;

pub use attempt::{AttemptStatus, ProbeAttempt, QueryRunner};
pub use finding::{CheckKind, SecurityFinding, Severity, Subject};
pub use result::{DenialReason, ProbeResult, TransferKind, ZoneAnomaly};
