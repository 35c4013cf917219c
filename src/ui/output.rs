//! ui::output
//!
//! Terminal output for strata commands.
//!
//! # Streams
//!
//! stdout carries command results: commit ids, log and status text, merge
//! reports, and `--json` documents. `-q` silences results but never JSON.
//!
//! stderr carries everything else: `[debug]` traces of engine decisions
//! (merge bases, per-file merge resolutions, checkout counts) under
//! `--debug`, config warnings, and the final `error:` line when a command
//! fails. Piping `strata log --json` therefore never picks up diagnostics.

use std::fmt::Display;

use serde::Serialize;

/// How much a command prints, chosen by `-q` and `--debug`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// `-q`: only errors and JSON
    Quiet,
    Normal,
    /// `--debug`: also trace engine decisions to stderr
    Debug,
}

impl Verbosity {
    /// `-q` takes precedence when both flags are given.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        match (quiet, debug) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Debug,
            (false, false) => Verbosity::Normal,
        }
    }

    fn shows_results(self) -> bool {
        self != Verbosity::Quiet
    }
}

/// Print a command result to stdout unless quiet.
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity.shows_results() {
        println!("{}", message);
    }
}

/// Trace an engine decision to stderr under `--debug`.
pub fn debug(message: impl Display, verbosity: Verbosity) {
    if verbosity == Verbosity::Debug {
        eprintln!("[debug] {}", message);
    }
}

/// Report a failed command. Shown even with `-q`.
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Report a non-fatal problem, such as an unknown config key.
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity.shows_results() {
        eprintln!("warning: {}", message);
    }
}

/// Print a value as pretty JSON (always shown).
pub fn json<T: Serialize>(value: &T) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One item per line, each behind `prefix`, with no trailing newline.
pub fn format_list<T: Display>(items: &[T], prefix: &str) -> String {
    items
        .iter()
        .map(|item| format!("{}{}", prefix, item))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_wins_over_debug() {
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Debug);
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
    }

    #[test]
    fn format_list_prefixes_each_item() {
        assert_eq!(format_list(&["a", "b"], "  "), "  a\n  b");
        assert_eq!(format_list::<&str>(&[], "* "), "");
    }
}
