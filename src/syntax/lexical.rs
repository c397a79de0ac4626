//! Lexical primitives.
//!
//! `Cursor` walks the source text and matches one token at a time. Spaces and
//! tabs are skipped before every token; newlines and `;` never are, since they
//! separate statements and are consumed explicitly by `skip_separators`.
//! A failed match leaves the cursor where it was.
//!
//! A token matcher that cannot run at all (pest refuses to start when the
//! thread is low on stack) is a `LexError`, never a non-match.

use pest::error::{Error, ErrorVariant};
use pest::iterators::Pairs;
use pest::Parser;
use pest_derive::Parser;

use crate::ast::Span;

#[derive(Parser)]
#[grammar = "syntax/lexical.pest"]
struct TokenParser;

/// A token matcher failed to run at `pos`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub pos: usize,
    pub message: String,
}

pub type LexResult<T> = Result<T, LexError>;

/// Byte position in the source plus the token matchers.
#[derive(Debug, Clone)]
pub struct Cursor<'src> {
    text: &'src str,
    pos: usize,
}

impl<'src> Cursor<'src> {
    pub fn new(text: &'src str) -> Self {
        Self { text, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Moves back to a position saved with `pos`.
    pub fn reset(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn rest(&self) -> &'src str {
        &self.text[self.pos..]
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Length of the prefix of the remaining text matched by `rule`, if any.
    fn match_rule(&self, rule: Rule) -> LexResult<Option<usize>> {
        classify(TokenParser::parse(rule, self.rest()), self.pos)
    }

    /// Consumes the match of `rule` after skipping blanks.
    fn token(&mut self, rule: Rule) -> LexResult<Option<(&'src str, Span)>> {
        let save = self.pos;
        let start = self.token_start();
        match self.match_rule(rule) {
            Ok(Some(len)) if len > 0 => {
                self.pos = start + len;
                Ok(Some((&self.text[start..self.pos], Span::new(start, self.pos))))
            }
            other => {
                self.pos = save;
                other.map(|_| None)
            }
        }
    }

    // ------------------------------------------------------------------------
    // Whitespace policy
    // ------------------------------------------------------------------------

    pub fn skip_blanks(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start_matches([' ', '\t']).len();
    }

    /// Skips blanks and returns the position where the next token starts.
    pub fn token_start(&mut self) -> usize {
        self.skip_blanks();
        self.pos
    }

    /// Consumes one or more `\n`/`;`, with blanks allowed between them.
    /// Returns whether at least one separator was consumed.
    pub fn skip_separators(&mut self) -> bool {
        let mut consumed = false;
        loop {
            let save = self.pos;
            self.skip_blanks();
            match self.rest().chars().next() {
                Some('\n' | ';') => {
                    self.pos += 1;
                    consumed = true;
                }
                _ => {
                    self.pos = save;
                    return consumed;
                }
            }
        }
    }

    // ------------------------------------------------------------------------
    // Tokens
    // ------------------------------------------------------------------------

    /// Matches a literal punctuation token such as `(` or `=`.
    pub fn eat(&mut self, literal: &str) -> Option<Span> {
        let save = self.pos;
        let start = self.token_start();
        if self.rest().starts_with(literal) {
            self.pos += literal.len();
            Some(Span::new(start, self.pos))
        } else {
            self.pos = save;
            None
        }
    }

    /// Matches `literal` exactly at the cursor, without skipping blanks.
    pub fn eat_exact(&mut self, literal: &str) -> Option<Span> {
        if self.rest().starts_with(literal) {
            let start = self.pos;
            self.pos += literal.len();
            Some(Span::new(start, self.pos))
        } else {
            None
        }
    }

    /// The `def` keyword, as a whole word.
    pub fn keyword(&mut self) -> LexResult<Option<Span>> {
        Ok(self.token(Rule::keyword)?.map(|(_, span)| span))
    }

    /// `[alpha][alnum_]*`, excluding the keyword.
    pub fn identifier(&mut self) -> LexResult<Option<(&'src str, Span)>> {
        self.token(Rule::identifier)
    }

    /// `[digit]+`
    pub fn number(&mut self) -> LexResult<Option<(&'src str, Span)>> {
        self.token(Rule::number)
    }

    /// Everything up to the next `"` or the end of input. Matches empty text.
    pub fn string_body(&mut self) -> LexResult<(&'src str, Span)> {
        let start = self.pos;
        self.pos += self.match_rule(Rule::string_body)?.unwrap_or(0);
        Ok((&self.text[start..self.pos], Span::new(start, self.pos)))
    }
}

/// Sorts a pest outcome into a match length, a plain non-match, or a
/// matcher that could not run.
fn classify(
    outcome: Result<Pairs<'_, Rule>, Error<Rule>>,
    pos: usize,
) -> LexResult<Option<usize>> {
    match outcome {
        Ok(mut pairs) => Ok(pairs.next().map(|pair| pair.as_str().len())),
        Err(error) => match error.variant {
            ErrorVariant::ParsingError { .. } => Ok(None),
            other => Err(LexError {
                pos,
                message: other.message().into_owned(),
            }),
        },
    }
}
