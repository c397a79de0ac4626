//! Structural printer.
//!
//! Walks the tree through `Visitor` and produces text in one of two layouts:
//!
//! - `Layout::Canonical`: re-parseable source. Absent parts are left out,
//!   tokens get the spaces the lexer needs, nested blocks are indented.
//!   Printing a parsed tree, parsing the result and printing again gives the
//!   same text.
//! - `Layout::Structural`: the debugging layout. Optional parts are
//!   concatenated without separators and each absent one shows as `_`.
//!
//! The printer canonicalizes: comments do not exist, spacing and separators
//! are normalized, `a()` prints as `a`, and `(expr)` prints as `expr`.
//!
//! The grammar never builds `Expression::Tuple`; tuples only come from
//! argument lists. A hand-built tuple expression prints as `(a, b)`, which
//! does not parse back.

use crate::ast::{
    Block, Definition, Expression, Invocation, Label, NumberLiteral, Reassignment, StringLiteral,
    Tuple, Visit, Visitor,
};

const INDENT: &str = "    ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Canonical,
    Structural,
}

#[derive(Debug, Clone, Copy)]
pub struct Printer {
    layout: Layout,
    depth: usize,
}

/// Canonical text of a top-level definition, newline terminated.
///
/// # Examples
///
/// ```rust
/// use deck::{printer::print, syntax::parse};
/// let def = parse("def f(x:,y:Int=0){a:=1}").unwrap().node;
/// assert_eq!(print(&def), "def f(x:, y: Int = 0) {\n    a: = 1\n}\n");
/// ```
pub fn print(def: &Definition) -> String {
    let mut text = Printer::canonical().render(def);
    text.push('\n');
    text
}

/// Structural (debug) text of any node.
pub fn print_structural<N: Visit + ?Sized>(node: &N) -> String {
    Printer::structural().render(node)
}

impl Printer {
    pub fn canonical() -> Self {
        Self {
            layout: Layout::Canonical,
            depth: 0,
        }
    }

    pub fn structural() -> Self {
        Self {
            layout: Layout::Structural,
            depth: 0,
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn render<N: Visit + ?Sized>(&self, node: &N) -> String {
        let mut printer = *self;
        node.accept(&mut printer)
    }

    fn is_canonical(&self) -> bool {
        self.layout == Layout::Canonical
    }

    /// Renders an optional part; absence becomes the layout's placeholder.
    fn optional<N: Visit>(&mut self, node: Option<&N>) -> String {
        match node {
            Some(node) => node.accept(self),
            None if self.is_canonical() => String::new(),
            None => "_".to_string(),
        }
    }

    fn elements(&mut self, tuple: &Tuple) -> String {
        tuple
            .elements
            .iter()
            .map(|e| e.accept(self))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn args(&mut self, args: Option<&Tuple>) -> String {
        match args {
            Some(tuple) => self.elements(tuple),
            None if self.is_canonical() => String::new(),
            None => "_".to_string(),
        }
    }

    /// A label used as another label's type is wrapped in parentheses, so
    /// a following `= value` stays with the outer label.
    fn label_type(&mut self, ty: &Expression) -> String {
        match ty {
            Expression::Label(_) => format!("({})", ty.accept(self)),
            _ => ty.accept(self),
        }
    }
}

impl Visitor for Printer {
    type Output = String;

    fn visit_tuple(&mut self, node: &Tuple) -> String {
        let elements = self.elements(node);
        match self.layout {
            Layout::Canonical => format!("({elements})"),
            Layout::Structural => elements,
        }
    }

    fn visit_block(&mut self, node: &Block) -> String {
        match self.layout {
            Layout::Canonical => {
                let outer = INDENT.repeat(self.depth);
                let inner = INDENT.repeat(self.depth + 1);
                self.depth += 1;
                let mut text = String::from("{\n");
                for stmt in &node.statements {
                    text.push_str(&inner);
                    text.push_str(&stmt.accept(self));
                    text.push('\n');
                }
                self.depth -= 1;
                text.push_str(&outer);
                text.push('}');
                text
            }
            Layout::Structural => {
                let stmts: Vec<_> = node.statements.iter().map(|s| s.accept(self)).collect();
                format!("{{\n{}\n}}", stmts.join("\n"))
            }
        }
    }

    fn visit_label(&mut self, node: &Label) -> String {
        let name = node.name.as_ref().map(|n| n.to_string());
        match self.layout {
            Layout::Canonical => {
                let mut text = name.unwrap_or_default();
                text.push(':');
                if let Some(ty) = &node.ty {
                    text.push(' ');
                    text.push_str(&self.label_type(ty));
                }
                if let Some(term) = &node.term {
                    text.push_str(" = ");
                    text.push_str(&term.value.accept(self));
                }
                text
            }
            Layout::Structural => {
                let ty = self.optional(node.ty.as_deref());
                let term = match &node.term {
                    Some(term) => format!("={}", term.value.accept(self)),
                    None => "_".to_string(),
                };
                format!("{}:{ty}{term}", name.as_deref().unwrap_or("_"))
            }
        }
    }

    fn visit_definition(&mut self, node: &Definition) -> String {
        let name = node.name.as_ref().map(|n| n.to_string());
        let args = self.args(node.args.as_ref());
        let body = self.visit_block(&node.body);
        match self.layout {
            Layout::Canonical => format!("def {}({args}) {body}", name.unwrap_or_default()),
            Layout::Structural => {
                format!("def {}({args})\n{body}\n", name.as_deref().unwrap_or("_"))
            }
        }
    }

    fn visit_invocation(&mut self, node: &Invocation) -> String {
        let mut text = String::new();
        for (i, link) in node.chain().enumerate() {
            match self.layout {
                Layout::Canonical => {
                    if i > 0 {
                        text.push(' ');
                    }
                    text.push_str(link.name.as_str());
                    if let Some(args) = &link.args {
                        text.push('(');
                        text.push_str(&self.elements(args));
                        text.push(')');
                    }
                    if let Some(block) = &link.block {
                        text.push(' ');
                        text.push_str(&self.visit_block(block));
                    }
                }
                Layout::Structural => {
                    let args = self.args(link.args.as_ref());
                    let block = self.optional(link.block.as_ref());
                    text.push_str(&format!("{}({args}){block}", link.name));
                }
            }
        }
        // the last link has no next call
        if self.layout == Layout::Structural {
            text.push('_');
        }
        text
    }

    fn visit_reassignment(&mut self, node: &Reassignment) -> String {
        let value = node.value.accept(self);
        match self.layout {
            Layout::Canonical => format!("{} = {value}", node.target),
            Layout::Structural => format!("{}={value}", node.target),
        }
    }

    fn visit_number(&mut self, node: &NumberLiteral) -> String {
        node.as_str().to_string()
    }

    fn visit_string(&mut self, node: &StringLiteral) -> String {
        format!("\"{}\"", node.as_str())
    }
}
