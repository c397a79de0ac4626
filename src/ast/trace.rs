//! Optional construction/teardown tracing for syntax trees.
//!
//! Node types know nothing about tracing. The grammar reports each node it
//! builds to a `ParseObserver`, and a tree wrapped in `Traced` reports every
//! node again when it is dropped.

use std::cell::RefCell;
use std::ops::Deref;

use super::{
    Block, Definition, Identifier, Invocation, Label, NodeKind, NumberLiteral, Reassignment, Span,
    StringLiteral, Tuple, Visit, Visitor,
};

/// Receives node lifecycle events.
///
/// `constructed` fires for every node a grammar rule finishes, including
/// nodes later discarded when an enclosing alternative backtracks. The
/// grammar reports `destroyed` for those discarded nodes as it drops them, so
/// after a traced tree is torn down every construction has been matched.
/// A parse that ends in an error reports no teardown for its partial nodes.
pub trait ParseObserver {
    fn constructed(&self, _kind: NodeKind, _span: Span) {}

    fn destroyed(&self, _kind: NodeKind) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeEvent {
    Constructed { kind: NodeKind, span: Span },
    Destroyed { kind: NodeKind },
}

/// Observer that records every event in order.
#[derive(Debug, Default)]
pub struct EventLog {
    events: RefCell<Vec<NodeEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<NodeEvent> {
        self.events.borrow().clone()
    }

    pub fn constructed(&self) -> Vec<(NodeKind, Span)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                NodeEvent::Constructed { kind, span } => Some((*kind, *span)),
                NodeEvent::Destroyed { .. } => None,
            })
            .collect()
    }

    pub fn destroyed(&self) -> Vec<NodeKind> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                NodeEvent::Destroyed { kind } => Some(*kind),
                NodeEvent::Constructed { .. } => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl ParseObserver for EventLog {
    fn constructed(&self, kind: NodeKind, span: Span) {
        self.events
            .borrow_mut()
            .push(NodeEvent::Constructed { kind, span });
    }

    fn destroyed(&self, kind: NodeKind) {
        self.events.borrow_mut().push(NodeEvent::Destroyed { kind });
    }
}

// ============================================================================
// TRACED TREES
// ============================================================================

/// Owns a tree and reports its teardown to an observer when dropped.
///
/// Nodes are reported parent first, then children in field order.
pub struct Traced<'o, T: Visit> {
    node: T,
    observer: &'o dyn ParseObserver,
}

impl<'o, T: Visit> Traced<'o, T> {
    pub fn new(node: T, observer: &'o dyn ParseObserver) -> Self {
        Self { node, observer }
    }
}

impl<T: Visit> Deref for Traced<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.node
    }
}

impl<T: Visit> Drop for Traced<'_, T> {
    fn drop(&mut self) {
        let mut teardown = Teardown {
            observer: self.observer,
        };
        self.node.accept(&mut teardown);
    }
}

struct Teardown<'o> {
    observer: &'o dyn ParseObserver,
}

impl Teardown<'_> {
    fn identifier(&self, ident: Option<&Identifier>) {
        if ident.is_some() {
            self.observer.destroyed(NodeKind::Identifier);
        }
    }
}

impl Visitor for Teardown<'_> {
    type Output = ();

    fn visit_tuple(&mut self, node: &Tuple) {
        self.observer.destroyed(NodeKind::Tuple);
        for element in &node.elements {
            element.accept(self);
        }
    }

    fn visit_block(&mut self, node: &Block) {
        self.observer.destroyed(NodeKind::Block);
        for stmt in &node.statements {
            stmt.accept(self);
        }
    }

    fn visit_label(&mut self, node: &Label) {
        self.observer.destroyed(NodeKind::Label);
        self.identifier(node.name.as_ref());
        if let Some(ty) = &node.ty {
            ty.accept(self);
        }
        if let Some(term) = &node.term {
            self.observer.destroyed(NodeKind::LabelAssignment);
            term.value.accept(self);
        }
    }

    fn visit_definition(&mut self, node: &Definition) {
        self.observer.destroyed(NodeKind::Definition);
        self.identifier(node.name.as_ref());
        if let Some(args) = &node.args {
            self.visit_tuple(args);
        }
        self.visit_block(&node.body);
    }

    fn visit_invocation(&mut self, node: &Invocation) {
        for link in node.chain() {
            self.observer.destroyed(NodeKind::Invocation);
            self.identifier(Some(&link.name));
            if let Some(args) = &link.args {
                self.visit_tuple(args);
            }
            if let Some(block) = &link.block {
                self.visit_block(block);
            }
        }
    }

    fn visit_reassignment(&mut self, node: &Reassignment) {
        self.observer.destroyed(NodeKind::Reassignment);
        self.identifier(Some(&node.target));
        node.value.accept(self);
    }

    fn visit_number(&mut self, _node: &NumberLiteral) {
        self.observer.destroyed(NodeKind::Number);
    }

    fn visit_string(&mut self, _node: &StringLiteral) {
        self.observer.destroyed(NodeKind::String);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expression, Statement};

    #[test]
    fn teardown_reports_parent_before_children() {
        let log = EventLog::new();
        let def = Definition {
            name: Some(Identifier::new("f")),
            args: None,
            body: Block::new(vec![Statement::Expression(Expression::number("1"))]),
        };
        drop(Traced::new(def, &log));
        assert_eq!(
            log.destroyed(),
            vec![
                NodeKind::Definition,
                NodeKind::Identifier,
                NodeKind::Block,
                NodeKind::Number
            ]
        );
    }

    #[test]
    fn traced_derefs_to_the_tree() {
        let log = EventLog::new();
        let traced = Traced::new(Block::default(), &log);
        assert!(traced.is_empty());
        assert!(log.events().is_empty());
    }
}
