//! Deck: parser and canonical printer for the deck expression language.
//!
//! Source text goes through `syntax` into the tree defined in `ast`, and
//! `printer` turns a tree back into text. Evaluation is left to callers.

pub use crate::errors::{DeckError, ErrorKind, SourceContext};
pub use crate::syntax::{parse, parse_expression, parse_statement, ParseOptions, Parsed, Parser};

pub mod ast;
pub mod cli;
pub mod errors;
pub mod printer;
pub mod syntax;
