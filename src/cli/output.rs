//! Handles all user-facing output for the CLI.
//!
//! Colored status lines, format diffs, `file:line:col` failure lines and the
//! node trace all go through here so every command looks the same.

use difference::{Changeset, Difference};
use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::ast::{NodeKind, ParseObserver, Span};
use crate::errors::{print_error, DeckError};

// ============================================================================
// NODE TRACE
// ============================================================================

/// Writes node lifecycle events to stderr as they happen.
pub struct StderrTrace;

impl ParseObserver for StderrTrace {
    fn constructed(&self, kind: NodeKind, span: Span) {
        let mut stderr = StandardStream::stderr(ColorChoice::Auto);
        let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)));
        let _ = writeln!(stderr, "+ {kind} {}..{}", span.start, span.end);
        let _ = stderr.reset();
    }

    fn destroyed(&self, kind: NodeKind) {
        let mut stderr = StandardStream::stderr(ColorChoice::Auto);
        let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)));
        let _ = writeln!(stderr, "- {kind}");
        let _ = stderr.reset();
    }
}

// ============================================================================
// CORE OUTPUT FUNCTIONS
// ============================================================================

/// Prints a bold green or red status line to stdout.
pub fn print_status(ok: bool, message: &str) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let color = if ok { Color::Green } else { Color::Red };
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
    let _ = writeln!(stdout, "{message}");
    let _ = stdout.reset();
}

/// Prints a one-line `file:line:col: message` failure to stderr.
pub fn print_location(file: &str, line: usize, column: usize, message: &str) {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    let _ = stderr.set_color(ColorSpec::new().set_bold(true));
    let _ = write!(stderr, "{file}:{line}:{column}: ");
    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)));
    let _ = writeln!(stderr, "{message}");
    let _ = stderr.reset();
}

/// Renders a diagnostic with miette.
pub fn print_diagnostic(error: DeckError) {
    print_error(error);
}

/// Prints a line diff between the original text and its canonical form.
pub fn print_format_diff(original: &str, formatted: &str) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let changeset = Changeset::new(original, formatted, "\n");
    print_diff(&mut stdout, &changeset.diffs);
    let _ = stdout.reset();
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn print_diff(stdout: &mut StandardStream, diffs: &[Difference]) {
    for diff in diffs {
        match diff {
            Difference::Same(x) => {
                let _ = stdout.reset();
                let _ = writeln!(stdout, " {x}");
            }
            Difference::Add(x) => {
                let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)));
                let _ = writeln!(stdout, "+{x}");
            }
            Difference::Rem(x) => {
                let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)));
                let _ = writeln!(stdout, "-{x}");
            }
        }
    }
}
