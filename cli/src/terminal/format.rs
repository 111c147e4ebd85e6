//! Terminal rendering of reconnaissance results and the audit report.

use colored::*;
use nsaudit_common::config::Config;
use nsaudit_common::probe::{SecurityFinding, Severity, Subject};
use nsaudit_core::intel::IpIntelligence;
use nsaudit_core::recon::{ProviderHost, ReconReport};
use nsaudit_core::report::{self, Report, Section};

use crate::mprint;
use crate::terminal::{colors, print};

type Detail = (String, ColoredString);

pub fn print_recon(recon: &ReconReport, cfg: &Config) {
    if cfg.quiet > 1 || recon.is_empty() {
        return;
    }
    print::header("dns records", cfg.quiet);

    if !recon.ipv4.is_empty() || !recon.ipv6.is_empty() {
        print::section("A & AAAA Records");
        for record in &recon.ipv4 {
            print::aligned_line("IPv4", record.addr.to_string().color(colors::IPV4_ADDR));
            if let Some(intel) = &record.intel {
                print::as_tree_one_level(intel_details(intel));
            }
        }
        for addr in &recon.ipv6 {
            print::aligned_line("IPv6", addr.to_string().color(colors::IPV6_ADDR));
        }
    }

    if !recon.cnames.is_empty() {
        section_break("CNAME Redirection");
        for cname in &recon.cnames {
            print::aligned_line("Redirects to", cname.host.as_str());
            print::as_tree_one_level(vec![provider_detail(cname)]);
        }
    }

    if !recon.mail.is_empty() {
        section_break("MX Records");
        for mx in &recon.mail {
            print::aligned_line(
                mx.provider,
                format!("{} (preference {})", mx.record.host, mx.record.preference),
            );
        }
        print_providers("Email Service Providers", &recon.mail_providers());
    }

    if !recon.nameservers.is_empty() {
        section_break("NS Records");
        for ns in &recon.nameservers {
            print::aligned_line(ns.provider, ns.host.as_str());
        }
        print_providers("DNS Service Providers", &recon.dns_providers());
    }

    if !recon.reverse.is_empty() {
        section_break("PTR Records");
        for (addr, names) in &recon.reverse {
            print::aligned_line(&addr.to_string(), names.join(", "));
        }
    }

    let spf: Vec<&str> = recon.spf_records();
    if !spf.is_empty() {
        section_break("SPF Records");
        for record in &spf {
            print::print_status(record);
        }
        let mechanisms: Vec<Detail> = recon
            .spf_mechanisms()
            .into_iter()
            .map(|mechanism| (String::from("allows"), mechanism.color(colors::SECONDARY)))
            .collect();
        print::as_tree_one_level(mechanisms);
    }

    if !recon.srv.is_empty() {
        section_break("SRV Records");
        for srv in &recon.srv {
            print::aligned_line(
                &format!("{}:{}", srv.target, srv.port),
                format!("priority {} weight {}", srv.priority, srv.weight),
            );
        }
        let summary: String = match recon.srv.len() {
            1 => String::from("1 service advertised"),
            n => format!("{n} services advertised"),
        };
        print::as_tree_one_level(vec![(
            String::from("Service discovery"),
            summary.color(colors::SECONDARY),
        )]);
    }

    if !recon.txt.is_empty() {
        section_break("TXT Records");
        for txt in &recon.txt {
            print::print_status(txt);
        }
    }

    let policies = recon.policies();
    if !policies.is_empty() {
        section_break("DKIM and DMARC");
        for (policy, record) in policies {
            print::aligned_line(policy.label(), record);
        }
    }
}

fn section_break(label: &str) {
    mprint!();
    print::section(label);
}

fn intel_details(intel: &IpIntelligence) -> Vec<Detail> {
    intel
        .details()
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.color(colors::TEXT_DEFAULT)))
        .collect()
}

fn provider_detail(host: &ProviderHost) -> Detail {
    (
        String::from("Provider"),
        host.provider.color(colors::PROVIDER),
    )
}

fn print_providers(label: &str, providers: &[&'static str]) {
    let details: Vec<Detail> = providers
        .iter()
        .map(|provider| (label.to_string(), provider.color(colors::PROVIDER)))
        .collect();
    print::as_tree_one_level(details);
}

pub fn print_report(report: &Report, cfg: &Config) {
    if cfg.quiet == 0 {
        mprint!();
    }
    print::header("vulnerability audit", cfg.quiet);

    for (idx, section) in report.sections().iter().enumerate() {
        if cfg.quiet > 1 {
            print_warnings_only(section);
            continue;
        }
        if idx > 0 {
            mprint!();
        }
        print::tree_head(idx + 1, &report::subject_heading(section.subject));
        for group in &section.groups {
            print::nested(1, &format!("{}", group.check.label().color(colors::SECONDARY).bold()));
            for finding in group.findings {
                print_finding(finding, 2);
            }
        }
    }
}

fn print_warnings_only(section: &Section<'_>) {
    let subject: &Subject = section.subject;
    for finding in section.warnings() {
        print::print_status(format!("{subject}: {}", finding_line(finding)));
    }
    match section.info_count() {
        0 => {}
        1 => print::print_status(format!("{subject}: 1 informational finding not shown")),
        n => print::print_status(format!("{subject}: {n} informational findings not shown")),
    }
}

fn print_finding(finding: &SecurityFinding, depth: usize) {
    print::nested(depth, &format!("{}", finding_line(finding)));
    for detail in report::details(&finding.result) {
        print::nested(depth + 1, &format!("{}", detail.color(colors::SEPARATOR)));
    }
}

fn finding_line(finding: &SecurityFinding) -> ColoredString {
    match finding.severity {
        Severity::Warning => finding.line().color(colors::WARNING).bold(),
        Severity::Info => finding.line().color(colors::TEXT_DEFAULT),
    }
}

pub fn print_summary(report: &Report, elapsed_secs: f64, cfg: &Config) {
    let warnings: ColoredString = match report.warning_count() {
        0 => String::from("no warnings").bold().green(),
        1 => String::from("1 warning").bold().yellow(),
        n => format!("{n} warnings").bold().yellow(),
    };
    let total_time: ColoredString = format!("{elapsed_secs:.2}s").bold().yellow();
    let output: String = format!(
        "{}",
        format!(
            "Audit of {} complete: {} findings, {warnings} in {total_time}",
            report.domain(),
            report.findings().len()
        )
        .color(colors::TEXT_DEFAULT)
    );

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&output);
            print::end_of_program();
        }
        _ => {
            mprint!();
            print::print_status(output);
        }
    }
}
