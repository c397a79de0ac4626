//! Syntax module for the deck language
//!
//! Text goes in, a `Definition` (or an expression or statement fragment) comes
//! out. The layers, leaves first:
//!
//! - `lexical`: token matchers and the whitespace policy.
//! - `grammar`: ordered-choice recursive descent with hard commitment points.
//! - `parser`: the driver that runs a rule, checks the whole input was
//!   consumed, and returns either an AST or a diagnostic.

pub(crate) mod grammar;
pub mod lexical;
pub mod parser;

pub use parser::{parse, parse_expression, parse_statement, Parsed, Parser};

/// Nesting limit used unless the caller sets one.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Library-level parse configuration.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Name shown in diagnostics.
    pub source_name: String,
    /// Maximum number of nested expressions. Deeper input fails with
    /// `NestingTooDeep`. `None` means no limit beyond the thread's stack.
    pub max_depth: Option<usize>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            source_name: "<input>".to_string(),
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }
}

impl ParseOptions {
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.source_name = name.into();
        self
    }

    pub fn with_max_depth(mut self, limit: usize) -> Self {
        self.max_depth = Some(limit);
        self
    }

    /// Removes the nesting limit. Deep enough input then exhausts the stack.
    pub fn without_depth_limit(mut self) -> Self {
        self.max_depth = None;
        self
    }
}
