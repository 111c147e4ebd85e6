//! # nsaudit common
//!
//! Shared vocabulary for the workspace: the models a DNS audit produces, the error taxonomy,
//! the run [`config::Config`], and the traits the probe engine talks to its collaborators
//! through ([`dns::resolver::Resolver`], [`probe::attempt::QueryRunner`],
//! [`probe::port::PortProber`]).
//!
//! Nothing in here performs IO. Concrete adapters live in `nsaudit-core`.

pub mod config;
pub mod dns;
pub mod error;
pub mod probe;
pub mod providers;
