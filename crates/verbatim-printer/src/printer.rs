//! Lexical-preserving printer
//!
//! Records the exact source text of every node at setup and keeps it in sync
//! with later edits, so printing reproduces untouched code byte for byte.
//!
//! ## Example
//!
//! ```rust,ignore
//! use verbatim_core::parse;
//! use verbatim_printer::LexicalPreservingPrinter;
//!
//! let source = "class A { void foo() {} }";
//! let mut parsed = parse(source)?;
//! let printer = LexicalPreservingPrinter::setup(&mut parsed.ast, parsed.root, source)?;
//!
//! let class = parsed.ast.class_by_name(parsed.root, "A").unwrap();
//! let foo = parsed.ast.methods_by_name(class, "foo")[0];
//! parsed.ast.add_parameter(foo, "float", "p1")?;
//!
//! assert_eq!(printer.print(&parsed.ast, foo), "void foo(float p1) {}");
//! ```

use std::cell::RefCell;
use std::fmt;
use std::io;
use std::rc::Rc;

use verbatim_core::Result;
use verbatim_core::ast::{Ast, NodeId};
use verbatim_core::config::PrinterConfig;

use crate::node_text::NodeText;
use crate::observer::PreservingObserver;
use crate::offset::LineIndex;
use crate::policy::Style;
use crate::registry::Registry;

/// Handle to the preserved text of one syntax tree.
///
/// Dropping the printer releases all recorded text; its observer stays
/// registered on the tree but ignores further edits.
#[derive(Debug)]
pub struct LexicalPreservingPrinter {
    registry: Rc<RefCell<Registry>>,
    root: NodeId,
}

impl LexicalPreservingPrinter {
    /// Record the text of `root` and everything below it from `source`, and
    /// start following edits to the tree
    pub fn setup(ast: &mut Ast, root: NodeId, source: &str) -> Result<Self> {
        Self::setup_with_config(ast, root, source, &PrinterConfig::default())
    }

    pub fn setup_with_config(
        ast: &mut Ast,
        root: NodeId,
        source: &str,
        config: &PrinterConfig,
    ) -> Result<Self> {
        config.validate()?;
        let index = LineIndex::new(source);
        let registry = Registry::build(ast, root, &index)?;
        tracing::debug!(
            root = %ast.label(root),
            nodes = registry.len(),
            lines = index.line_count(),
            "registered preserved text"
        );

        let registry = Rc::new(RefCell::new(registry));
        let style = Style::from_config(config, source);
        ast.add_observer(Box::new(PreservingObserver::new(
            Rc::downgrade(&registry),
            root,
            style,
        )));
        Ok(Self { registry, root })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Current text of `node`: its preserved text with edits applied, or the
    /// default rendering for a node that never had text
    pub fn print(&self, ast: &Ast, node: NodeId) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.print_to(ast, node, &mut out);
        out
    }

    pub fn print_to(&self, ast: &Ast, node: NodeId, out: &mut impl fmt::Write) -> fmt::Result {
        self.registry.borrow().expand(ast, node, out)
    }

    /// Write the text of `node` to a byte sink
    pub fn write_to(&self, ast: &Ast, node: NodeId, out: &mut impl io::Write) -> io::Result<()> {
        out.write_all(self.print(ast, node).as_bytes())
    }

    /// Snapshot of the recorded text of `node`
    pub fn text_for(&self, node: NodeId) -> Option<NodeText> {
        self.registry.borrow().get(node).cloned()
    }

    pub fn is_registered(&self, node: NodeId) -> bool {
        self.registry.borrow().contains(node)
    }

    /// Every node that currently has recorded text
    pub fn registered_nodes(&self) -> Vec<NodeId> {
        self.registry.borrow().nodes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verbatim_core::ast::Property;
    use verbatim_core::parse;

    #[test]
    fn test_print_round_trips() {
        let source = "class A {\n  void foo(int a) { return a; }\n}\n";
        let mut parsed = parse(source).unwrap();
        let printer = LexicalPreservingPrinter::setup(&mut parsed.ast, parsed.root, source).unwrap();
        assert_eq!(printer.print(&parsed.ast, parsed.root), source);
        assert_eq!(printer.print(&parsed.ast, parsed.root), source);
    }

    #[test]
    fn test_unregistered_node_uses_default_rendering() {
        let source = "class A {}";
        let mut parsed = parse(source).unwrap();
        let printer = LexicalPreservingPrinter::setup(&mut parsed.ast, parsed.root, source).unwrap();

        let fresh = parsed.ast.new_integer("42");
        assert!(!printer.is_registered(fresh));
        assert_eq!(printer.text_for(fresh), None);
        assert_eq!(printer.print(&parsed.ast, fresh), "42");
    }

    #[test]
    fn test_dropped_printer_ignores_edits() {
        let source = "class A { void foo() {} }";
        let mut parsed = parse(source).unwrap();
        let printer = LexicalPreservingPrinter::setup(&mut parsed.ast, parsed.root, source).unwrap();
        drop(printer);

        let class = parsed.ast.class_by_name(parsed.root, "A").unwrap();
        let foo = parsed.ast.methods_by_name(class, "foo")[0];
        parsed.ast.add_parameter(foo, "int", "x").unwrap();
        assert_eq!(parsed.ast.observer_count(), 1);
    }

    #[test]
    fn test_write_to_bytes() {
        let source = "class A {}";
        let mut parsed = parse(source).unwrap();
        let printer = LexicalPreservingPrinter::setup(&mut parsed.ast, parsed.root, source).unwrap();
        let class = parsed.ast.list(parsed.root, Property::Types)[0];

        let mut out = Vec::new();
        printer.write_to(&parsed.ast, class, &mut out).unwrap();
        assert_eq!(out, b"class A {}");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let source = "class A {}";
        let mut parsed = parse(source).unwrap();
        let config = PrinterConfig {
            indent: "x".to_string(),
            ..Default::default()
        };
        let result =
            LexicalPreservingPrinter::setup_with_config(&mut parsed.ast, parsed.root, source, &config);
        assert!(result.is_err());
        assert_eq!(parsed.ast.observer_count(), 0);
    }
}
