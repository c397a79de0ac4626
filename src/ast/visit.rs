//! Double-dispatch traversal over the syntax tree.
//!
//! `Visit::accept` dispatches on the node (and, for `Expression`/`Statement`,
//! on the variant) and calls the matching `Visitor` method. The matches are
//! exhaustive, so adding a node kind is flagged everywhere it must be handled.

use super::{
    Block, Definition, Expression, Invocation, Label, NumberLiteral, Reassignment, Statement,
    StringLiteral, Tuple,
};

/// One method per concrete node kind.
pub trait Visitor {
    type Output;

    fn visit_tuple(&mut self, node: &Tuple) -> Self::Output;
    fn visit_block(&mut self, node: &Block) -> Self::Output;
    fn visit_label(&mut self, node: &Label) -> Self::Output;
    fn visit_definition(&mut self, node: &Definition) -> Self::Output;
    fn visit_invocation(&mut self, node: &Invocation) -> Self::Output;
    fn visit_reassignment(&mut self, node: &Reassignment) -> Self::Output;
    fn visit_number(&mut self, node: &NumberLiteral) -> Self::Output;
    fn visit_string(&mut self, node: &StringLiteral) -> Self::Output;
}

/// Implemented by every node that a `Visitor` can be dispatched on.
pub trait Visit {
    fn accept<V: Visitor>(&self, visitor: &mut V) -> V::Output;
}

impl Visit for Expression {
    fn accept<V: Visitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            Expression::Tuple(node) => visitor.visit_tuple(node),
            Expression::Label(node) => visitor.visit_label(node),
            Expression::Block(node) => visitor.visit_block(node),
            Expression::Definition(node) => visitor.visit_definition(node),
            Expression::Invocation(node) => visitor.visit_invocation(node),
            Expression::Number(node) => visitor.visit_number(node),
            Expression::String(node) => visitor.visit_string(node),
        }
    }
}

impl Visit for Statement {
    fn accept<V: Visitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            Statement::Expression(expr) => expr.accept(visitor),
            Statement::Reassignment(node) => visitor.visit_reassignment(node),
        }
    }
}

macro_rules! visit_leaf {
    ($($node:ty => $method:ident),* $(,)?) => {
        $(
            impl Visit for $node {
                fn accept<V: Visitor>(&self, visitor: &mut V) -> V::Output {
                    visitor.$method(self)
                }
            }
        )*
    };
}

visit_leaf!(
    Tuple => visit_tuple,
    Block => visit_block,
    Label => visit_label,
    Definition => visit_definition,
    Invocation => visit_invocation,
    Reassignment => visit_reassignment,
    NumberLiteral => visit_number,
    StringLiteral => visit_string,
);
