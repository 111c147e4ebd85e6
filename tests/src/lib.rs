//! End-to-end runs of the audit engine against scripted collaborators.

#[cfg(test)]
mod audit;
