//! Formatting functions for command output.
//!
//! Messages go to stdout, errors and warnings to stderr. The `format_*`
//! helpers return plain strings so summaries can be tested without a terminal.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::cli::{BumpOutcome, CheckStatus, PushOutcome, ReadinessReport, ReleaseReport};

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

pub fn display_heading(text: &str) {
    println!("\n{}", style(text).bold());
}

/// Print the changelog section, indented
pub fn display_changelog(text: &str) {
    for line in text.lines() {
        println!("  {}", line);
    }
}

/// `1.2.3 -> 2.0.0 (major, forced)`
pub fn format_version_change(previous: &str, next: &str, kind: &str, forced: bool) -> String {
    if forced {
        format!("{} -> {} ({}, forced)", previous, next, kind)
    } else {
        format!("{} -> {} ({})", previous, next, kind)
    }
}

pub fn format_push(push: &PushOutcome) -> String {
    match push {
        PushOutcome::Pending => "not reached".to_string(),
        PushOutcome::Pushed(remote) => format!("pushed to '{}'", remote),
        PushOutcome::Skipped(reason) => format!("skipped ({})", reason),
    }
}

/// Where an interrupted release stopped; a dry run has no effects to report
pub fn format_stopped(report: &ReleaseReport) -> String {
    if report.dry_run {
        format!("dry run stopped after '{}', nothing was changed", report.state)
    } else {
        format!("release stopped after '{}'", report.state)
    }
}

/// Print the summary of a release run.
pub fn display_release_report(report: &ReleaseReport) {
    let title = if report.dry_run {
        "Release (dry run)"
    } else {
        "Release"
    };
    display_heading(title);

    if let (Some(previous), Some(next), Some(kind)) =
        (&report.previous_version, &report.version, report.bump_type)
    {
        display_status(&format_version_change(
            previous,
            next,
            kind.as_str(),
            report.forced,
        ));
    }
    println!(
        "  Commits: {} ({} breaking)",
        report.commit_count, report.breaking_count
    );
    if let Some(tag) = &report.tag {
        println!("  Tag:     {}", style(tag).green());
    }
    if let Some(message) = &report.commit_message {
        println!("  Commit:  {}", message);
    }
    println!("  Push:    {}", format_push(&report.push));
    println!("  State:   {}", report.state);

    if let Some(changelog) = &report.changelog {
        let heading = if report.dry_run {
            "Changelog entry (not written)"
        } else {
            "Changelog entry"
        };
        display_heading(heading);
        display_changelog(changelog);
    }
}

pub fn display_bump_outcome(outcome: &BumpOutcome) {
    let change = format_version_change(
        &outcome.previous,
        &outcome.next,
        outcome.kind.as_str(),
        outcome.forced,
    );
    if outcome.written {
        display_success(&format!("{} written to {}", change, outcome.location));
    } else {
        display_status(&format!("{} (dry run, {} unchanged)", change, outcome.location));
    }
}

/// Print readiness checks, one line each.
pub fn display_readiness(report: &ReadinessReport) {
    display_heading("Release readiness");
    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => style("✓").green(),
            CheckStatus::Warn => style("⚠").yellow(),
            CheckStatus::Fail => style("✗").red(),
        };
        println!("  {} {}: {}", marker, check.name, check.message);
    }

    if report.ready {
        display_success("Ready to release");
    } else {
        display_error("Not ready to release");
    }
}
