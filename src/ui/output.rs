//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Results go to stdout, diagnostics to stderr. Everything except errors
//! and requested data respects the quiet flag. Internal diagnostics use
//! `tracing`; this module is only for what the user asked to see.

use std::collections::BTreeMap;
use std::fmt::Display;

use crate::core::verify::Violation;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print data the user asked for (always shown).
pub fn data(message: impl Display) {
    println!("{}", message);
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Format a list of items.
pub fn format_list<T: Display>(items: &[T], prefix: &str) -> String {
    items
        .iter()
        .map(|item| format!("{}{}", prefix, item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format validation violations, one per line.
pub fn format_violations(violations: &[Violation]) -> String {
    format_list(violations, "  - ")
}

/// Format a marking as aligned `place  count` rows.
pub fn format_marking(counts: &BTreeMap<String, usize>) -> String {
    let width = counts.keys().map(|k| k.len()).max().unwrap_or(0);
    counts
        .iter()
        .map(|(place, count)| format!("{:<width$}  {}", place, count, width = width))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_quiet_wins() {
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Debug);
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
    }

    #[test]
    fn marking_is_aligned() {
        let counts: BTreeMap<String, usize> =
            [("p1".to_string(), 1), ("p10".to_string(), 0)].into();
        assert_eq!(format_marking(&counts), "p1   1\np10  0");
    }

    #[test]
    fn violations_are_bulleted() {
        let out = format_violations(&[
            Violation::DuplicateNodeId("p1".into()),
            Violation::DuplicateTokenId("k".into()),
        ]);
        assert_eq!(out.lines().count(), 2);
        assert!(out.lines().all(|l| l.starts_with("  - ")));
    }
}
