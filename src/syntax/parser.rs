//! Deck parse driver
//!
//! Runs a grammar rule over a whole input and sorts the outcome into the
//! three cases a caller must tell apart:
//!
//! - success: the AST and the offset the cursor reached;
//! - expectation failure: `Err`, no AST;
//! - incomplete parse: the AST built from the consumed prefix, together with
//!   a diagnostic describing the unconsumed tail.

use crate::ast::{Definition, Expression, ParseObserver, Statement};
use crate::errors::{DeckError, SourceContext};

use super::grammar::{Grammar, RuleResult};
use super::ParseOptions;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Result of a parse that matched.
#[derive(Debug)]
pub struct Parsed<T> {
    pub node: T,
    /// Byte offset reached, after trailing blanks and separators.
    pub end: usize,
    /// Set when input remains after `end`.
    pub incomplete: Option<DeckError>,
}

impl<T> Parsed<T> {
    pub fn is_complete(&self) -> bool {
        self.incomplete.is_none()
    }

    /// Treats leftover input as an error.
    pub fn into_complete(self) -> Result<T, DeckError> {
        match self.incomplete {
            Some(err) => Err(err),
            None => Ok(self.node),
        }
    }
}

/// Parses one top-level definition with default options.
///
/// # Examples
///
/// ```rust
/// use deck::syntax::parse;
/// let parsed = parse("def main() { x = 1 }").unwrap();
/// assert!(parsed.is_complete());
/// assert_eq!(parsed.node.name.unwrap().as_str(), "main");
/// ```
pub fn parse(text: &str) -> Result<Parsed<Definition>, DeckError> {
    Parser::default().parse(text)
}

/// Parses a single expression, such as a call chain.
pub fn parse_expression(text: &str) -> Result<Parsed<Expression>, DeckError> {
    Parser::default().parse_expression(text)
}

/// Parses a single statement: an expression or a reassignment.
pub fn parse_statement(text: &str) -> Result<Parsed<Statement>, DeckError> {
    Parser::default().parse_statement(text)
}

/// Parse driver with options and an optional node observer.
///
/// A `Parser` holds no state between calls; every call owns its cursor and
/// builds an independent tree.
#[derive(Default)]
pub struct Parser<'o> {
    options: ParseOptions,
    observer: Option<&'o dyn ParseObserver>,
}

impl<'o> Parser<'o> {
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: &'o dyn ParseObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn parse(&self, text: &str) -> Result<Parsed<Definition>, DeckError> {
        self.run(text, "definition", |g| g.definition())
    }

    pub fn parse_expression(&self, text: &str) -> Result<Parsed<Expression>, DeckError> {
        self.run(text, "expression", |g| g.expression())
    }

    pub fn parse_statement(&self, text: &str) -> Result<Parsed<Statement>, DeckError> {
        self.run(text, "statement", |g| g.statement())
    }

    fn run<T>(
        &self,
        text: &str,
        what: &str,
        rule: impl FnOnce(&mut Grammar<'_, 'o>) -> RuleResult<T>,
    ) -> Result<Parsed<T>, DeckError> {
        let source = SourceContext::from_file(self.options.source_name.clone(), text);
        let mut grammar = Grammar::new(&source, &self.options, self.observer);

        let node = match rule(&mut grammar)? {
            Some(node) => node,
            None => {
                let pos = grammar.cursor.token_start();
                return Err(source.expected(what, pos));
            }
        };

        grammar.cursor.skip_separators();
        grammar.cursor.skip_blanks();
        let end = grammar.cursor.pos();
        let incomplete = (end < text.len()).then(|| source.incomplete(end));

        Ok(Parsed {
            node,
            end,
            incomplete,
        })
    }
}
