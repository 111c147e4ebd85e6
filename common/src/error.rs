//! Error types.
//!
//! Failures are contained at the smallest enclosing probe: none of these ever aborts a run.
//! A [`ResolutionError`] skips the checks that depend on the lookup, a [`ProbeExecutionError`]
//! degrades to a denied/absent classification, and a [`ParseError`] drops the one finding it
//! would have produced.

use std::time::Duration;

/// A DNS lookup through the [`Resolver`][crate::dns::resolver::Resolver] failed.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// The lookup succeeded but the zone publishes no NS records.
    #[error("no nameservers found for {0}")]
    NoNameservers(String),

    /// The resolver returned an error or timed out.
    #[error("lookup of {record_type} records for {name} failed: {reason}")]
    Lookup {
        name: String,
        record_type: &'static str,
        reason: String,
    },
}

/// The external query tool could not be run to completion.
#[derive(thiserror::Error, Debug)]
pub enum ProbeExecutionError {
    /// Returned when the tool binary is missing or not executable.
    #[error("failed to spawn {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// Returned when the tool did not exit before its deadline and had to be killed.
    #[error("query tool killed after {0:?}")]
    TimedOut(Duration),

    /// Returned when reading the tool's output or reaping it fails.
    #[error("an IO error occurred while running the query tool")]
    Io(#[from] std::io::Error),
}

/// The query tool produced output in an unexpected shape.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No query/response byte counts could be located in the output.
    #[error("no statistics block in query output")]
    MissingStatistics,

    /// A query size of zero would make the amplification ratio meaningless.
    #[error("query size reported as zero bytes")]
    ZeroQuerySize,

    #[error("invalid number in statistics: {0:?}")]
    InvalidNumber(String),
}
