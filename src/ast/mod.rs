//! AST module for the deck language
//!
//! This module provides the syntax tree produced by the parser. The tree is a
//! strict ownership tree: every node is owned by exactly one parent, recursive
//! members are boxed, and nothing is mutated once the rule that built it returns.
//! Nodes carry no source positions; the parse driver reports the cursor it
//! reached and diagnostics carry their own spans.

// ============================================================================
// IMPORTS
// ============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod trace;
pub mod visit;

pub use trace::{EventLog, NodeEvent, ParseObserver, Traced};
pub use visit::{Visit, Visitor};

// ============================================================================
// SOURCE POSITIONS
// ============================================================================

/// A byte range in the source text.
///
/// # Examples
///
/// ```rust
/// use deck::ast::Span;
/// let span = Span::new(3, 7);
/// assert_eq!(span.len(), 4);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        miette::SourceSpan::from(span.start..span.end)
    }
}

// ============================================================================
// LEAF NODES
// ============================================================================

/// A name matching `[alpha][alnum_]*`.
///
/// # Examples
///
/// ```rust
/// use deck::ast::Identifier;
/// let ident = Identifier::new("main");
/// assert_eq!(ident.as_str(), "main");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(pub String);

impl Identifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw digit text. The value is never converted to a numeric type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NumberLiteral(pub String);

impl NumberLiteral {
    pub fn new(digits: impl Into<String>) -> Self {
        Self(digits.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Text found between a pair of double quotes, without the quotes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StringLiteral(pub String);

impl StringLiteral {
    pub fn new(content: impl Into<String>) -> Self {
        Self(content.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// COMPOSITE NODES
// ============================================================================

/// Comma separated expressions; order is positional.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tuple {
    pub elements: Vec<Expression>,
}

/// Statements in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Block {
    pub statements: Vec<Statement>,
}

/// The `= expr` tail of a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelAssignment {
    pub value: Box<Expression>,
}

/// `name: type = term`, each part optional. The colon is always present in source.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Label {
    pub name: Option<Identifier>,
    pub ty: Option<Box<Expression>>,
    pub term: Option<LabelAssignment>,
}

/// `def name(params) { body }`. Name and parameters may be absent, the body may not.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Definition {
    pub name: Option<Identifier>,
    pub args: Option<Tuple>,
    pub body: Block,
}

/// A call, optionally followed by a postfix block and by the next call of a chain.
///
/// `a() b() c()` is one invocation `a` whose `next_call` is `b`, whose
/// `next_call` is `c`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    pub name: Identifier,
    pub args: Option<Tuple>,
    pub block: Option<Block>,
    pub next_call: Option<Box<Invocation>>,
}

/// `name = value` without a colon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reassignment {
    pub target: Identifier,
    pub value: Expression,
}

// ============================================================================
// VARIANT LEVELS
// ============================================================================

/// Every node kind that can appear where an expression is expected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expression {
    Tuple(Tuple),
    Label(Label),
    Block(Block),
    Definition(Definition),
    Invocation(Invocation),
    Number(NumberLiteral),
    String(StringLiteral),
}

/// One entry of a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Statement {
    Expression(Expression),
    Reassignment(Reassignment),
}

/// Field-less tag for each node kind, used by tracing and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Identifier,
    Number,
    String,
    Tuple,
    Block,
    LabelAssignment,
    Label,
    Definition,
    Invocation,
    Reassignment,
}

impl NodeKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Identifier => "identifier",
            NodeKind::Number => "number",
            NodeKind::String => "string",
            NodeKind::Tuple => "tuple",
            NodeKind::Block => "block",
            NodeKind::LabelAssignment => "label assignment",
            NodeKind::Label => "label",
            NodeKind::Definition => "definition",
            NodeKind::Invocation => "invocation",
            NodeKind::Reassignment => "reassignment",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// PUBLIC API IMPLEMENTATION
// ============================================================================

impl Expression {
    /// Returns the kind of the node wrapped by this variant.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use deck::ast::{Expression, NodeKind, NumberLiteral};
    /// let expr = Expression::Number(NumberLiteral::new("42"));
    /// assert_eq!(expr.kind(), NodeKind::Number);
    /// ```
    pub fn kind(&self) -> NodeKind {
        match self {
            Expression::Tuple(_) => NodeKind::Tuple,
            Expression::Label(_) => NodeKind::Label,
            Expression::Block(_) => NodeKind::Block,
            Expression::Definition(_) => NodeKind::Definition,
            Expression::Invocation(_) => NodeKind::Invocation,
            Expression::Number(_) => NodeKind::Number,
            Expression::String(_) => NodeKind::String,
        }
    }

    pub fn as_label(&self) -> Option<&Label> {
        match self {
            Expression::Label(label) => Some(label),
            _ => None,
        }
    }

    pub fn as_invocation(&self) -> Option<&Invocation> {
        match self {
            Expression::Invocation(call) => Some(call),
            _ => None,
        }
    }

    pub fn as_definition(&self) -> Option<&Definition> {
        match self {
            Expression::Definition(def) => Some(def),
            _ => None,
        }
    }

    /// Builds a bare invocation of `name` with no arguments, block or chain.
    pub fn reference(name: impl Into<String>) -> Self {
        Expression::Invocation(Invocation::bare(name))
    }

    pub fn number(digits: impl Into<String>) -> Self {
        Expression::Number(NumberLiteral::new(digits))
    }

    pub fn string(content: impl Into<String>) -> Self {
        Expression::String(StringLiteral::new(content))
    }
}

impl Statement {
    pub fn kind(&self) -> NodeKind {
        match self {
            Statement::Expression(expr) => expr.kind(),
            Statement::Reassignment(_) => NodeKind::Reassignment,
        }
    }

    pub fn as_expression(&self) -> Option<&Expression> {
        match self {
            Statement::Expression(expr) => Some(expr),
            Statement::Reassignment(_) => None,
        }
    }

    pub fn as_reassignment(&self) -> Option<&Reassignment> {
        match self {
            Statement::Reassignment(assign) => Some(assign),
            Statement::Expression(_) => None,
        }
    }
}

impl Tuple {
    pub fn new(elements: Vec<Expression>) -> Self {
        Self { elements }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl Block {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl Label {
    /// The default value, if the label has an `= expr` part.
    pub fn default_value(&self) -> Option<&Expression> {
        self.term.as_ref().map(|term| term.value.as_ref())
    }

    pub fn type_expr(&self) -> Option<&Expression> {
        self.ty.as_deref()
    }
}

impl Invocation {
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: Identifier::new(name),
            args: None,
            block: None,
            next_call: None,
        }
    }

    /// Iterates over this invocation and every call chained after it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use deck::syntax::parse_expression;
    /// let parsed = parse_expression("a() b() c()").unwrap();
    /// let call = parsed.node.as_invocation().unwrap();
    /// let names: Vec<_> = call.chain().map(|c| c.name.as_str()).collect();
    /// assert_eq!(names, ["a", "b", "c"]);
    /// ```
    pub fn chain(&self) -> impl Iterator<Item = &Invocation> {
        std::iter::successors(Some(self), |call| call.next_call.as_deref())
    }
}

impl Reassignment {
    pub fn new(target: impl Into<String>, value: Expression) -> Self {
        Self {
            target: Identifier::new(target),
            value,
        }
    }
}

// ============================================================================
// DISPLAY (canonical text)
// ============================================================================

macro_rules! display_canonical {
    ($($node:ty),* $(,)?) => {
        $(
            impl fmt::Display for $node {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&crate::printer::Printer::canonical().render(self))
                }
            }
        )*
    };
}

display_canonical!(
    Tuple,
    Block,
    Label,
    Definition,
    Invocation,
    Reassignment,
    Expression,
    Statement,
);
