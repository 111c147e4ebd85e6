//! # nsaudit core
//!
//! The **probe engine**: concrete adapters for the collaborator traits defined in
//! `nsaudit-common`, the individual vulnerability probes, and the services that sequence them
//! into a [`report::Report`].
//!
//! * [`network`] holds the adapters that touch the outside world (`dig`, TCP, the system
//!   resolver).
//! * [`probes`] turns raw query attempts into classified results.
//! * [`audit`] orchestrates probes across every nameserver of a domain.
//! * [`recon`] and [`intel`] cover the plain record lookups shown before the audit.

pub mod audit;
pub mod enumerator;
pub mod intel;
pub mod network;
pub mod probes;
pub mod recon;
pub mod report;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;
