//! Deck error handling
//!
//! A single `DeckError` enum covers everything the parse driver and the CLI
//! can report. Parse variants carry the named source and a labeled span so
//! `miette` can render the offending line; construct them through
//! `SourceContext` rather than by hand so spans and sources stay consistent.

use miette::{Diagnostic, NamedSource, SourceSpan};
use std::sync::Arc;
use thiserror::Error;
use unicode_width::UnicodeWidthStr;

use crate::ast::Span;

pub type SourceArc = Arc<NamedSource<String>>;

// ============================================================================
// SOURCE CONTEXT - Error reporting infrastructure
// ============================================================================

/// Source name and text that diagnostics point into.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub name: String,
    pub content: String,
}

impl SourceContext {
    pub fn from_file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Context for text that did not come from a file.
    pub fn anonymous(content: impl Into<String>) -> Self {
        Self::from_file("<input>", content)
    }

    pub fn to_named_source(&self) -> SourceArc {
        Arc::new(NamedSource::new(self.name.clone(), self.content.clone()))
    }

    /// The literal text found at `pos`, up to the end of its line.
    fn found_at(&self, pos: usize) -> (String, Span) {
        let rest = self.content.get(pos..).unwrap_or("");
        let line = rest.split('\n').next().unwrap_or("").trim_end();
        (line.to_string(), Span::new(pos, pos + line.len()))
    }

    /// One-based line and display column of a byte offset.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use deck::errors::SourceContext;
    /// let src = SourceContext::anonymous("def f() {\n  x = }");
    /// assert_eq!(src.line_col(16), (2, 7));
    /// ```
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.content.len());
        let before = self.content.get(..offset).unwrap_or(&self.content);
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let line = before.matches('\n').count() + 1;
        let column = before[line_start..].width() + 1;
        (line, column)
    }

    // ------------------------------------------------------------------------
    // Constructors used by the grammar and the driver
    // ------------------------------------------------------------------------

    pub fn expected(&self, expected: impl Into<String>, pos: usize) -> DeckError {
        let expected = expected.into();
        let (found, span) = self.found_at(pos);
        let help = help_for(&expected);
        DeckError::Expected {
            expected,
            found,
            src: self.to_named_source(),
            span: span.into(),
            help,
        }
    }

    pub fn incomplete(&self, pos: usize) -> DeckError {
        let remaining = self.content.get(pos..).unwrap_or("").to_string();
        DeckError::Incomplete {
            span: Span::new(pos, self.content.len()).into(),
            remaining,
            src: self.to_named_source(),
        }
    }

    pub fn lexer_failure(&self, message: impl Into<String>, pos: usize) -> DeckError {
        let (_, span) = self.found_at(pos);
        DeckError::Lexer {
            message: message.into(),
            src: self.to_named_source(),
            span: span.into(),
        }
    }

    pub fn nesting_too_deep(&self, limit: usize, pos: usize) -> DeckError {
        let (_, span) = self.found_at(pos);
        DeckError::NestingTooDeep {
            limit,
            src: self.to_named_source(),
            span: span.into(),
        }
    }
}

fn help_for(expected: &str) -> Option<String> {
    let help = match expected {
        "\")\"" => "every `(` needs a matching `)` on the same statement",
        "\"}\"" => "blocks close with `}`; separate statements with a newline or `;`",
        "block" => "a definition needs a body, even an empty one: `{ }`",
        "'\"'" => "string literals cannot span a missing closing quote",
        "expression" => "an expression is a definition, label, block, call, number or string",
        _ => return None,
    };
    Some(help.to_string())
}

fn describe_found(found: &str) -> String {
    if found.is_empty() {
        "end of line".to_string()
    } else {
        format!("'{found}'")
    }
}

// ============================================================================
// ERROR TYPE
// ============================================================================

#[derive(Error, Diagnostic, Debug)]
pub enum DeckError {
    /// A committed rule could not be completed.
    #[error("Parse error: expected {expected}, found {}", describe_found(.found))]
    #[diagnostic(code(deck::parse::expected))]
    Expected {
        expected: String,
        found: String,
        #[source_code]
        src: SourceArc,
        #[label("expected {expected}")]
        span: SourceSpan,
        #[help]
        help: Option<String>,
    },

    /// The grammar matched, but input was left over.
    #[error("Parse error: incomplete parse, unconsumed input '{remaining}'")]
    #[diagnostic(
        code(deck::parse::incomplete),
        help("only one top-level `def` is read; statements belong inside its block")
    )]
    Incomplete {
        remaining: String,
        #[source_code]
        src: SourceArc,
        #[label("not consumed")]
        span: SourceSpan,
    },

    #[error("Parse error: nesting deeper than {limit} levels")]
    #[diagnostic(code(deck::parse::nesting), help("raise --max-depth or flatten the input"))]
    NestingTooDeep {
        limit: usize,
        #[source_code]
        src: SourceArc,
        #[label("limit reached here")]
        span: SourceSpan,
    },

    /// A token matcher could not run; the input was not examined.
    #[error("Parse error: token matcher failed: {message}")]
    #[diagnostic(code(deck::parse::lexer), help("lower --max-depth or flatten the input"))]
    Lexer {
        message: String,
        #[source_code]
        src: SourceArc,
        #[label("while reading a token here")]
        span: SourceSpan,
    },

    #[error("I/O error: cannot read '{path}': {message}")]
    #[diagnostic(code(deck::io))]
    Io { path: String, message: String },

    #[error("Serialization error: {message}")]
    #[diagnostic(code(deck::serialize))]
    Serialize { message: String },
}

/// Type-safe classification of a `DeckError`, for callers and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Expected,
    Incomplete,
    NestingTooDeep,
    Lexer,
    Io,
    Serialize,
}

impl ErrorKind {
    pub const fn code_suffix(&self) -> &'static str {
        match self {
            ErrorKind::Expected => "expected",
            ErrorKind::Incomplete => "incomplete",
            ErrorKind::NestingTooDeep => "nesting",
            ErrorKind::Lexer => "lexer",
            ErrorKind::Io => "io",
            ErrorKind::Serialize => "serialize",
        }
    }
}

impl DeckError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DeckError::Expected { .. } => ErrorKind::Expected,
            DeckError::Incomplete { .. } => ErrorKind::Incomplete,
            DeckError::NestingTooDeep { .. } => ErrorKind::NestingTooDeep,
            DeckError::Lexer { .. } => ErrorKind::Lexer,
            DeckError::Io { .. } => ErrorKind::Io,
            DeckError::Serialize { .. } => ErrorKind::Serialize,
        }
    }

    /// The byte range the diagnostic points at, if it has one.
    pub fn span(&self) -> Option<Span> {
        let span = match self {
            DeckError::Expected { span, .. }
            | DeckError::Incomplete { span, .. }
            | DeckError::NestingTooDeep { span, .. }
            | DeckError::Lexer { span, .. } => span,
            DeckError::Io { .. } | DeckError::Serialize { .. } => return None,
        };
        Some(Span::new(span.offset(), span.offset() + span.len()))
    }

    /// The construct an expectation failure was waiting for.
    pub fn expected(&self) -> Option<&str> {
        match self {
            DeckError::Expected { expected, .. } => Some(expected),
            _ => None,
        }
    }

    /// The input text at the failure point, or the unconsumed tail.
    pub fn found(&self) -> Option<&str> {
        match self {
            DeckError::Expected { found, .. } => Some(found),
            DeckError::Incomplete { remaining, .. } => Some(remaining),
            _ => None,
        }
    }

    pub fn io(path: impl Into<String>, error: &std::io::Error) -> Self {
        DeckError::Io {
            path: path.into(),
            message: error.to_string(),
        }
    }

    pub fn serialize(error: impl std::fmt::Display) -> Self {
        DeckError::Serialize {
            message: error.to_string(),
        }
    }
}

/// Prints a DeckError with full miette diagnostics to stderr.
pub fn print_error(error: DeckError) {
    let report = miette::Report::new(error);
    eprintln!("{report:?}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_reports_rest_of_line() {
        let src = SourceContext::anonymous("def f( { }\nnext");
        let err = src.expected("\")\"", 7);
        assert_eq!(err.kind(), ErrorKind::Expected);
        assert_eq!(err.found(), Some("{ }"));
        assert_eq!(err.span(), Some(Span::new(7, 10)));
        assert_eq!(err.to_string(), "Parse error: expected \")\", found '{ }'");
    }

    #[test]
    fn expected_at_end_of_input_names_end_of_line() {
        let src = SourceContext::anonymous("def f");
        let err = src.expected("\"{\"", 5);
        assert_eq!(err.found(), Some(""));
        assert!(err.to_string().ends_with("found end of line"));
    }

    #[test]
    fn incomplete_covers_the_tail() {
        let src = SourceContext::anonymous("def f() { } x");
        let err = src.incomplete(12);
        assert_eq!(err.found(), Some("x"));
        assert_eq!(err.span(), Some(Span::new(12, 13)));
    }

    #[test]
    fn lexer_failure_is_a_hard_error() {
        let src = SourceContext::anonymous("def f() { a a }");
        let err = src.lexer_failure("stack limit reached", 12);
        assert_eq!(err.kind(), ErrorKind::Lexer);
        assert_eq!(err.span(), Some(Span::new(12, 15)));
        assert!(err.to_string().ends_with("stack limit reached"));
    }

    #[test]
    fn line_col_is_one_based() {
        let src = SourceContext::anonymous("ab\ncd");
        assert_eq!(src.line_col(0), (1, 1));
        assert_eq!(src.line_col(4), (2, 2));
    }
}
