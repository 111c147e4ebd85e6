use std::net::IpAddr;

use async_trait::async_trait;

use crate::dns::record::{MxRecord, SrvRecord};
use crate::dns::{Domain, Nameserver};
use crate::error::ResolutionError;

/// Defines the contract for ordinary forward and reverse DNS lookups.
///
/// Implementations return an empty vector when a name simply has no records of the requested
/// type, and a [`ResolutionError`] when the lookup itself failed. The one exception is
/// [`Resolver::lookup_ns`], for which an empty answer is reported as
/// [`ResolutionError::NoNameservers`] because every probe downstream depends on it.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Retrieves the authoritative nameservers for `domain`, in the order the resolver
    /// returned them.
    async fn lookup_ns(&self, domain: &Domain) -> Result<Vec<Nameserver>, ResolutionError>;

    /// Retrieves both A and AAAA addresses for `host`.
    async fn lookup_ip(&self, host: &str) -> Result<Vec<IpAddr>, ResolutionError>;

    async fn lookup_cname(&self, host: &str) -> Result<Vec<String>, ResolutionError>;

    async fn lookup_mx(&self, host: &str) -> Result<Vec<MxRecord>, ResolutionError>;

    /// Retrieves TXT records, each one's character-strings concatenated.
    async fn lookup_txt(&self, host: &str) -> Result<Vec<String>, ResolutionError>;

    async fn lookup_srv(&self, host: &str) -> Result<Vec<SrvRecord>, ResolutionError>;

    /// Retrieves the PTR names for `addr`.
    async fn reverse(&self, addr: IpAddr) -> Result<Vec<String>, ResolutionError>;
}
