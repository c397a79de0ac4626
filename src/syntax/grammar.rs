//! Structural grammar: recursive descent with ordered choice.
//!
//! Every rule returns `Result<Option<T>, DeckError>`:
//!
//! - `Ok(Some(node))`: matched.
//! - `Ok(None)`: soft non-match. The cursor is back where the rule started
//!   and the caller may try its next alternative.
//! - `Err(_)`: a hard expectation failed after the rule committed (after
//!   `def`, `(`, `{`, an opening quote, or an `=`). It aborts the whole parse.
//!
//! ```text
//! tuple        := expression % ","
//! paren_args   := "(" > -tuple > ")"
//! block        := "{" > stmt_list > "}"
//! definition   := "def" > -identifier > -paren_args > block
//! label        := -identifier ":" -expression -("=" > expression)
//! invocation   := identifier -paren_args -block -invocation   (read as a loop)
//! paren_expr   := "(" > expression > ")"
//! expression   := definition | label | paren_expr | block | invocation | number | quoted_string
//! reassignment := identifier "=" > expression
//! statement    := reassignment | expression
//! stmt_list    := statement % (one or more "\n" or ";")
//! ```

use crate::ast::{
    Block, Definition, Expression, Identifier, Invocation, Label, LabelAssignment, NodeKind,
    NumberLiteral, ParseObserver, Reassignment, Span, Statement, StringLiteral, Tuple,
};
use crate::errors::{DeckError, SourceContext};

use super::lexical::{Cursor, LexError};
use super::ParseOptions;

pub(crate) type RuleResult<T> = Result<Option<T>, DeckError>;

pub(crate) struct Grammar<'src, 'o> {
    pub(crate) cursor: Cursor<'src>,
    source: &'src SourceContext,
    max_depth: Option<usize>,
    depth: usize,
    observer: Option<&'o dyn ParseObserver>,
}

impl<'src, 'o> Grammar<'src, 'o> {
    pub(crate) fn new(
        source: &'src SourceContext,
        options: &ParseOptions,
        observer: Option<&'o dyn ParseObserver>,
    ) -> Self {
        Self {
            cursor: Cursor::new(&source.content),
            source,
            max_depth: options.max_depth,
            depth: 0,
            observer,
        }
    }

    // ========================================================================
    // COMBINATOR HELPERS
    // ========================================================================

    /// Runs `rule`, restoring the cursor if it does not match.
    fn attempt<T>(&mut self, rule: fn(&mut Self) -> RuleResult<T>) -> RuleResult<T> {
        let save = self.cursor.pos();
        let result = rule(self)?;
        if result.is_none() {
            self.cursor.reset(save);
        }
        Ok(result)
    }

    /// Runs a committed sub-rule: a non-match becomes an expectation failure.
    fn expect<T>(&mut self, rule: fn(&mut Self) -> RuleResult<T>, what: &str) -> Result<T, DeckError> {
        match self.attempt(rule)? {
            Some(node) => Ok(node),
            None => Err(self.fail(what)),
        }
    }

    fn expect_token(&mut self, literal: &str) -> Result<Span, DeckError> {
        match self.cursor.eat(literal) {
            Some(span) => Ok(span),
            None => Err(self.fail(&format!("\"{literal}\""))),
        }
    }

    fn fail(&mut self, what: &str) -> DeckError {
        let pos = self.cursor.token_start();
        self.source.expected(what, pos)
    }

    /// Runs a recursive rule one level deeper, honoring the nesting limit.
    ///
    /// At the limit, input that could not start an expression is still a
    /// plain non-match, so probing for an optional part never fails.
    fn nested<T>(&mut self, rule: fn(&mut Self) -> RuleResult<T>) -> RuleResult<T> {
        if let Some(limit) = self.max_depth {
            if self.depth >= limit {
                let save = self.cursor.pos();
                let pos = self.cursor.token_start();
                if !self.could_start_expression() {
                    self.cursor.reset(save);
                    return Ok(None);
                }
                return Err(self.source.nesting_too_deep(limit, pos));
            }
        }
        self.depth += 1;
        let result = self.attempt(rule);
        self.depth -= 1;
        result
    }

    fn could_start_expression(&self) -> bool {
        matches!(
            self.cursor.rest().chars().next(),
            Some(c) if c.is_ascii_alphanumeric() || matches!(c, ':' | '(' | '{' | '"')
        )
    }

    fn built<T>(&self, kind: NodeKind, start: usize, node: T) -> T {
        if let Some(observer) = self.observer {
            observer.constructed(kind, Span::new(start, self.cursor.pos()));
        }
        node
    }

    /// Reports a node that was built and then dropped by backtracking.
    fn discarded(&self, kind: NodeKind) {
        if let Some(observer) = self.observer {
            observer.destroyed(kind);
        }
    }

    fn lex_error(&self, error: LexError) -> DeckError {
        self.source.lexer_failure(error.message, error.pos)
    }

    // ========================================================================
    // LEXICAL RULES
    // ========================================================================

    fn identifier(&mut self) -> RuleResult<Identifier> {
        let token = self.cursor.identifier().map_err(|e| self.lex_error(e))?;
        Ok(token.map(|(name, span)| {
            self.built(NodeKind::Identifier, span.start, Identifier::new(name))
        }))
    }

    fn number(&mut self) -> RuleResult<NumberLiteral> {
        let token = self.cursor.number().map_err(|e| self.lex_error(e))?;
        Ok(token.map(|(digits, span)| {
            self.built(NodeKind::Number, span.start, NumberLiteral::new(digits))
        }))
    }

    fn quoted_string(&mut self) -> RuleResult<StringLiteral> {
        let Some(open) = self.cursor.eat("\"") else {
            return Ok(None);
        };
        let (body, _) = self.cursor.string_body().map_err(|e| self.lex_error(e))?;
        if self.cursor.eat_exact("\"").is_none() {
            return Err(self.source.expected("'\"'", self.cursor.pos()));
        }
        Ok(Some(self.built(
            NodeKind::String,
            open.start,
            StringLiteral::new(body),
        )))
    }

    // ========================================================================
    // EXPRESSION RULES
    // ========================================================================

    pub(crate) fn expression(&mut self) -> RuleResult<Expression> {
        self.nested(Self::expression_alternatives)
    }

    fn expression_alternatives(&mut self) -> RuleResult<Expression> {
        if let Some(def) = self.attempt(Self::definition)? {
            return Ok(Some(Expression::Definition(def)));
        }
        if let Some(label) = self.attempt(Self::label)? {
            return Ok(Some(Expression::Label(label)));
        }
        if let Some(inner) = self.attempt(Self::paren_expr)? {
            return Ok(Some(inner));
        }
        if let Some(block) = self.attempt(Self::block)? {
            return Ok(Some(Expression::Block(block)));
        }
        if let Some(call) = self.attempt(Self::invocation)? {
            return Ok(Some(Expression::Invocation(call)));
        }
        if let Some(number) = self.number()? {
            return Ok(Some(Expression::Number(number)));
        }
        Ok(self.quoted_string()?.map(Expression::String))
    }

    /// Zero or more expressions separated by commas. `None` when empty.
    fn tuple(&mut self) -> RuleResult<Tuple> {
        let start = self.cursor.token_start();
        let Some(first) = self.expression()? else {
            return Ok(None);
        };
        let mut elements = vec![first];
        loop {
            let save = self.cursor.pos();
            if self.cursor.eat(",").is_none() {
                break;
            }
            match self.expression()? {
                Some(element) => elements.push(element),
                None => {
                    self.cursor.reset(save);
                    break;
                }
            }
        }
        Ok(Some(self.built(NodeKind::Tuple, start, Tuple::new(elements))))
    }

    /// `( tuple? )`. Empty parentheses yield no tuple.
    fn paren_args(&mut self) -> Result<Option<Tuple>, DeckError> {
        if self.cursor.eat("(").is_none() {
            return Ok(None);
        }
        let tuple = self.tuple()?;
        self.expect_token(")")?;
        Ok(tuple)
    }

    fn paren_expr(&mut self) -> RuleResult<Expression> {
        if self.cursor.eat("(").is_none() {
            return Ok(None);
        }
        let inner = self.expect(Self::expression, "expression")?;
        self.expect_token(")")?;
        Ok(Some(inner))
    }

    pub(crate) fn block(&mut self) -> RuleResult<Block> {
        let Some(open) = self.cursor.eat("{") else {
            return Ok(None);
        };
        let statements = self.statement_list()?;
        self.expect_token("}")?;
        Ok(Some(self.built(NodeKind::Block, open.start, Block::new(statements))))
    }

    pub(crate) fn definition(&mut self) -> RuleResult<Definition> {
        let Some(keyword) = self.cursor.keyword().map_err(|e| self.lex_error(e))? else {
            return Ok(None);
        };
        let name = self.identifier()?;
        let args = self.paren_args()?;
        let body = self.expect(Self::block, "block")?;
        let def = Definition { name, args, body };
        Ok(Some(self.built(NodeKind::Definition, keyword.start, def)))
    }

    fn label(&mut self) -> RuleResult<Label> {
        let start = self.cursor.token_start();
        let name = self.identifier()?;
        if self.cursor.eat(":").is_none() {
            if name.is_some() {
                self.discarded(NodeKind::Identifier);
            }
            self.cursor.reset(start);
            return Ok(None);
        }
        let ty = self.expression()?.map(Box::new);
        let term = self.label_assignment()?;
        let label = Label { name, ty, term };
        Ok(Some(self.built(NodeKind::Label, start, label)))
    }

    fn label_assignment(&mut self) -> RuleResult<LabelAssignment> {
        let Some(eq) = self.cursor.eat("=") else {
            return Ok(None);
        };
        let value = Box::new(self.expect(Self::expression, "expression")?);
        let term = LabelAssignment { value };
        Ok(Some(self.built(NodeKind::LabelAssignment, eq.start, term)))
    }

    /// A call, its optional arguments and postfix block, then the rest of the
    /// chain. Chain links are separated by blanks only, so a newline or `;`
    /// always ends the chain.
    ///
    /// Links are read in a loop and linked from the last one back, so a long
    /// chain costs no stack.
    fn invocation(&mut self) -> RuleResult<Invocation> {
        let mut links = Vec::new();
        loop {
            let save = self.cursor.pos();
            let start = self.cursor.token_start();
            let Some(name) = self.identifier()? else {
                self.cursor.reset(save);
                break;
            };
            let args = self.paren_args()?;
            let block = self.attempt(Self::block)?;
            links.push((start, name, args, block));
        }

        let mut chain = None;
        for (start, name, args, block) in links.into_iter().rev() {
            let call = Invocation {
                name,
                args,
                block,
                next_call: chain.map(Box::new),
            };
            chain = Some(self.built(NodeKind::Invocation, start, call));
        }
        Ok(chain)
    }

    // ========================================================================
    // STATEMENT RULES
    // ========================================================================

    /// Reassignment is tried first: both forms can open with a bare
    /// identifier, and only the reassignment needs the `=` that follows it.
    pub(crate) fn statement(&mut self) -> RuleResult<Statement> {
        if let Some(assign) = self.attempt(Self::reassignment)? {
            return Ok(Some(Statement::Reassignment(assign)));
        }
        Ok(self.expression()?.map(Statement::Expression))
    }

    fn reassignment(&mut self) -> RuleResult<Reassignment> {
        let start = self.cursor.token_start();
        let Some(target) = self.identifier()? else {
            return Ok(None);
        };
        if self.cursor.eat("=").is_none() {
            self.discarded(NodeKind::Identifier);
            self.cursor.reset(start);
            return Ok(None);
        }
        let value = self.expect(Self::expression, "expression")?;
        let assign = Reassignment { target, value };
        Ok(Some(self.built(NodeKind::Reassignment, start, assign)))
    }

    /// Statements separated by runs of `\n`/`;`. Leading and trailing
    /// separators are allowed, and so is an empty list.
    fn statement_list(&mut self) -> Result<Vec<Statement>, DeckError> {
        let mut statements = Vec::new();
        self.cursor.skip_separators();
        while let Some(stmt) = self.statement()? {
            statements.push(stmt);
            if !self.cursor.skip_separators() {
                break;
            }
        }
        Ok(statements)
    }
}
