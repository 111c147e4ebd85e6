//! Adapters that reach outside the process.
//!
//! Each type here implements one of the collaborator traits from `nsaudit-common`, so the
//! probes and services never depend on them directly.

pub mod dig;
pub mod resolver;
pub mod tcp;

pub use dig::DigRunner;
pub use resolver::SystemResolver;
pub use tcp::TcpPortProber;
