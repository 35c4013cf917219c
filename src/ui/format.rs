//! ui::format
//!
//! Human-readable rendering of history and status.

use std::fmt::Write as _;

use crate::core::graph::LogEntry;
use crate::core::object::Signature;
use crate::engine::outcome::SHORT_ID_LEN;
use crate::engine::StatusReport;

const DATE_FORMAT: &str = "%a %b %e %H:%M:%S %Y %z";

fn format_date(sig: &Signature) -> String {
    match sig.datetime() {
        Some(dt) => dt.format(DATE_FORMAT).to_string(),
        None => format!("{} {}", sig.epoch, sig.tz_offset),
    }
}

/// Render one log entry.
///
/// ```text
/// ===
/// commit <id>
/// Merge: <parent> <parent>
/// Author: <name>
/// Date:   <date>
///
///     <message>
/// ```
///
/// The `Merge:` line only appears for merge commits.
pub fn log_entry(entry: &LogEntry) -> String {
    let commit = &entry.commit;
    let mut out = String::new();
    out.push_str("===\n");
    let _ = writeln!(out, "commit {}", entry.id);
    if commit.is_merge() {
        let parents: Vec<&str> = commit
            .parents
            .iter()
            .map(|p| p.short(SHORT_ID_LEN))
            .collect();
        let _ = writeln!(out, "Merge: {}", parents.join(" "));
    }
    let _ = writeln!(out, "Author: {}", commit.author.name);
    let _ = writeln!(out, "Date:   {}", format_date(&commit.author));
    out.push('\n');
    for line in commit.message.lines() {
        let _ = writeln!(out, "    {}", line);
    }
    out
}

/// Render a list of log entries separated by blank lines.
pub fn log(entries: &[LogEntry]) -> String {
    entries
        .iter()
        .map(log_entry)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a status report as five titled sections.
pub fn status(report: &StatusReport) -> String {
    let mut out = String::new();

    out.push_str("=== Branches ===\n");
    for branch in &report.branches {
        let marker = if *branch == report.current { "* " } else { "  " };
        let _ = writeln!(out, "{}{}", marker, branch);
    }
    out.push('\n');

    section(&mut out, "Staged Files", report.staged.iter().cloned());
    section(&mut out, "Removed Files", report.removed.iter().cloned());
    section(
        &mut out,
        "Modifications Not Staged For Commit",
        report
            .modified
            .iter()
            .map(|(path, change)| format!("{} ({})", path, change.label())),
    );
    section(&mut out, "Untracked Files", report.untracked.iter().cloned());

    out
}

fn section(out: &mut String, title: &str, lines: impl Iterator<Item = String>) {
    let _ = writeln!(out, "=== {} ===", title);
    for line in lines {
        out.push_str(&line);
        out.push('\n');
    }
    out.push('\n');
}
