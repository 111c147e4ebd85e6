//! # Report aggregation
//!
//! A [`Report`] is an append-only sequence of [`SecurityFinding`]s in probe-issue order.
//! Rendering groups consecutive findings by subject and then by check; since every
//! nameserver's findings are appended as one contiguous batch, grouping never reorders,
//! merges or drops anything.

use std::fmt::Write;

use nsaudit_common::dns::{Domain, Nameserver};
use nsaudit_common::probe::{CheckKind, ProbeResult, SecurityFinding, Severity, Subject};
use nsaudit_common::providers;

#[derive(Debug, Clone)]
pub struct Report {
    domain: Domain,
    nameservers: Vec<Nameserver>,
    findings: Vec<SecurityFinding>,
}

/// All consecutive findings about one subject.
#[derive(Debug)]
pub struct Section<'a> {
    pub subject: &'a Subject,
    pub groups: Vec<Group<'a>>,
}

impl<'a> Section<'a> {
    pub fn findings(&self) -> impl Iterator<Item = &'a SecurityFinding> + '_ {
        self.groups.iter().flat_map(|group| group.findings)
    }

    pub fn warnings(&self) -> Vec<&'a SecurityFinding> {
        self.findings()
            .filter(|finding| finding.severity == Severity::Warning)
            .collect()
    }

    /// Findings left out when only warnings are shown.
    pub fn info_count(&self) -> usize {
        self.findings()
            .filter(|finding| finding.severity == Severity::Info)
            .count()
    }
}

/// All consecutive findings of one check within a [`Section`].
#[derive(Debug)]
pub struct Group<'a> {
    pub check: CheckKind,
    pub findings: &'a [SecurityFinding],
}

impl Report {
    pub fn new(domain: Domain) -> Self {
        Self {
            domain,
            nameservers: Vec::new(),
            findings: Vec::new(),
        }
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// The enumerated nameservers, in enumeration order.
    pub fn nameservers(&self) -> &[Nameserver] {
        &self.nameservers
    }

    pub fn set_nameservers(&mut self, nameservers: Vec<Nameserver>) {
        self.nameservers = nameservers;
    }

    pub fn push(&mut self, finding: SecurityFinding) {
        self.findings.push(finding);
    }

    pub fn extend(&mut self, findings: impl IntoIterator<Item = SecurityFinding>) {
        self.findings.extend(findings);
    }

    pub fn findings(&self) -> &[SecurityFinding] {
        &self.findings
    }

    pub fn warning_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|finding| finding.severity == Severity::Warning)
            .count()
    }

    pub fn sections(&self) -> Vec<Section<'_>> {
        self.findings
            .chunk_by(|a, b| a.subject == b.subject)
            .map(|run| Section {
                subject: &run[0].subject,
                groups: run
                    .chunk_by(|a, b| a.check == b.check)
                    .map(|findings| Group {
                        check: findings[0].check,
                        findings,
                    })
                    .collect(),
            })
            .collect()
    }

    /// Uncolored rendering, one line per finding plus its detail lines.
    pub fn render_plain(&self) -> String {
        let mut out: String = String::new();
        let _ = writeln!(out, "DNS security audit for {}", self.domain);
        if !self.nameservers.is_empty() {
            let hosts: Vec<&str> = self.nameservers.iter().map(Nameserver::host).collect();
            let _ = writeln!(out, "Nameservers: {}", hosts.join(", "));
        }

        for section in self.sections() {
            let _ = writeln!(out, "\n[{}]", subject_heading(section.subject));
            for group in &section.groups {
                let _ = writeln!(out, "  {}", group.check.label());
                for finding in group.findings {
                    let _ = writeln!(out, "    {}", finding.line());
                    for detail in details(&finding.result) {
                        let _ = writeln!(out, "      {detail}");
                    }
                }
            }
        }

        let _ = writeln!(out, "\n{}", self.summary());
        out
    }

    pub fn summary(&self) -> String {
        match self.warning_count() {
            0 => format!("{} checks completed, no warnings", self.findings.len()),
            1 => format!("{} checks completed, 1 warning", self.findings.len()),
            n => format!("{} checks completed, {n} warnings", self.findings.len()),
        }
    }
}

/// Section title: the nameserver with its inferred provider, or the domain.
pub fn subject_heading(subject: &Subject) -> String {
    match subject {
        Subject::Nameserver(ns) => format!("Nameserver {ns} ({})", providers::label(ns.host())),
        Subject::Domain(domain) => format!("Domain {domain}"),
    }
}

/// Sub-lines that belong to a result's single report line.
pub fn details(result: &ProbeResult) -> Vec<String> {
    match result {
        ProbeResult::TransferAllowed { distribution, .. } if !distribution.is_empty() => {
            std::iter::once(String::from("Record type distribution:"))
                .chain(
                    distribution
                        .iter()
                        .map(|(record_type, count)| format!("  {record_type}: {count}")),
                )
                .collect()
        }
        _ => Vec::new(),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
