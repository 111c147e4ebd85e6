//! Scripted stand-ins for the collaborator traits.
//!
//! Every probe and service in this crate reaches the network only through
//! [`QueryRunner`], [`Resolver`] and [`PortProber`], so these fakes are enough to drive the
//! whole engine deterministically. Enabled for downstream crates by the `test-util` feature.

use std::collections::{HashMap, HashSet, VecDeque};
use std::net::IpAddr;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use nsaudit_common::dns::record::{MxRecord, SrvRecord};
use nsaudit_common::dns::resolver::Resolver;
use nsaudit_common::dns::{Domain, Nameserver};
use nsaudit_common::error::ResolutionError;
use nsaudit_common::probe::port::PortProber;
use nsaudit_common::probe::{AttemptStatus, ProbeAttempt, QueryRunner};

/// A canned query tool outcome.
#[derive(Debug, Clone)]
pub struct Scripted {
    pub output: String,
    pub elapsed: Duration,
    pub status: AttemptStatus,
}

impl Scripted {
    /// Exits cleanly and instantly with `output`.
    pub fn output(output: &str) -> Self {
        Self {
            output: output.to_string(),
            elapsed: Duration::from_millis(5),
            status: AttemptStatus::Exited(Some(0)),
        }
    }

    pub fn empty() -> Self {
        Self::output("")
    }

    /// Ran into its deadline after `elapsed`.
    pub fn timed_out(elapsed: Duration) -> Self {
        Self {
            output: String::new(),
            elapsed,
            status: AttemptStatus::TimedOut,
        }
    }

    pub fn failed(reason: &str) -> Self {
        Self {
            output: String::new(),
            elapsed: Duration::ZERO,
            status: AttemptStatus::Failed(reason.to_string()),
        }
    }
}

/// [`QueryRunner`] answering from a script.
///
/// Queued responses are consumed first, in order. Otherwise the first rule whose every token
/// appears among the arguments wins, and the fallback answers everything else. All calls are
/// recorded.
pub struct ScriptedRunner {
    rules: Vec<(Vec<String>, Scripted)>,
    queue: Mutex<VecDeque<Scripted>>,
    fallback: Scripted,
    calls: Mutex<Vec<Vec<String>>>,
}

impl Default for ScriptedRunner {
    fn default() -> Self {
        Self::new(Scripted::empty())
    }
}

impl ScriptedRunner {
    pub fn new(fallback: Scripted) -> Self {
        Self {
            rules: Vec::new(),
            queue: Mutex::new(VecDeque::new()),
            fallback,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answers invocations whose arguments include all of `tokens`.
    pub fn when(mut self, tokens: &[&str], response: Scripted) -> Self {
        let tokens: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        self.rules.push((tokens, response));
        self
    }

    /// Answers the next invocations, in order, before any rule applies.
    pub fn then(self, response: Scripted) -> Self {
        self.queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(response);
        self
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls().len()
    }

    fn respond(&self, args: &[String]) -> Scripted {
        let queued: Option<Scripted> = self
            .queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front();
        if let Some(response) = queued {
            return response;
        }
        self.rules
            .iter()
            .find(|(tokens, _)| tokens.iter().all(|token| args.contains(token)))
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| self.fallback.clone())
    }
}

#[async_trait]
impl QueryRunner for ScriptedRunner {
    async fn run(&self, args: &[String], _timeout: Duration) -> ProbeAttempt {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(args.to_vec());
        let response: Scripted = self.respond(args);
        ProbeAttempt {
            args: args.to_vec(),
            output: response.output.into_bytes(),
            elapsed: response.elapsed,
            status: response.status,
        }
    }
}

/// [`Resolver`] serving fixed record sets. Names with nothing configured have no records.
#[derive(Default)]
pub struct StaticResolver {
    pub nameservers: Option<Result<Vec<Nameserver>, ResolutionError>>,
    pub ips: HashMap<String, Vec<IpAddr>>,
    pub cnames: HashMap<String, Vec<String>>,
    pub mx: HashMap<String, Vec<MxRecord>>,
    pub txt: HashMap<String, Vec<String>>,
    pub srv: HashMap<String, Vec<SrvRecord>>,
    pub ptr: HashMap<IpAddr, Vec<String>>,
}

impl StaticResolver {
    pub fn with_nameservers(hosts: &[&str]) -> Self {
        Self {
            nameservers: Some(Ok(hosts.iter().map(Nameserver::new).collect())),
            ..Self::default()
        }
    }

    pub fn failing_ns(error: ResolutionError) -> Self {
        Self {
            nameservers: Some(Err(error)),
            ..Self::default()
        }
    }
}

fn lookup<T: Clone>(table: &HashMap<String, Vec<T>>, name: &str) -> Vec<T> {
    table.get(name).cloned().unwrap_or_default()
}

#[async_trait]
impl Resolver for StaticResolver {
    async fn lookup_ns(&self, domain: &Domain) -> Result<Vec<Nameserver>, ResolutionError> {
        match &self.nameservers {
            Some(Ok(found)) if !found.is_empty() => Ok(found.clone()),
            Some(Err(e)) => Err(e.clone()),
            _ => Err(ResolutionError::NoNameservers(domain.to_string())),
        }
    }

    async fn lookup_ip(&self, host: &str) -> Result<Vec<IpAddr>, ResolutionError> {
        Ok(lookup(&self.ips, host))
    }

    async fn lookup_cname(&self, host: &str) -> Result<Vec<String>, ResolutionError> {
        Ok(lookup(&self.cnames, host))
    }

    async fn lookup_mx(&self, host: &str) -> Result<Vec<MxRecord>, ResolutionError> {
        Ok(lookup(&self.mx, host))
    }

    async fn lookup_txt(&self, host: &str) -> Result<Vec<String>, ResolutionError> {
        Ok(lookup(&self.txt, host))
    }

    async fn lookup_srv(&self, host: &str) -> Result<Vec<SrvRecord>, ResolutionError> {
        Ok(lookup(&self.srv, host))
    }

    async fn reverse(&self, addr: IpAddr) -> Result<Vec<String>, ResolutionError> {
        Ok(self.ptr.get(&addr).cloned().unwrap_or_default())
    }
}

/// [`PortProber`] reporting a fixed set of hosts as reachable on every port.
#[derive(Debug, Default)]
pub struct FixedPorts {
    open: HashSet<String>,
}

impl FixedPorts {
    pub fn closed() -> Self {
        Self::default()
    }

    pub fn open_on(hosts: &[&str]) -> Self {
        Self {
            open: hosts.iter().map(|host| host.to_string()).collect(),
        }
    }
}

#[async_trait]
impl PortProber for FixedPorts {
    async fn is_open(&self, host: &str, _port: u16, _timeout: Duration) -> bool {
        self.open.contains(host)
    }
}
