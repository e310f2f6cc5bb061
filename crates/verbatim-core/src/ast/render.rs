//! Default, non-preserving rendering of nodes
//!
//! This is the canonical layout used for nodes that have no recorded source
//! text. It ignores ranges and original whitespace entirely.

use std::fmt::{self, Write};

use super::kind::{NodeKind, Property};
use super::tree::{Ast, NodeId};

const INDENT: &str = "    ";

impl Ast {
    /// Render `node` in canonical layout
    pub fn render(&self, node: NodeId) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.render_to(node, &mut out);
        out
    }

    /// Render `node` in canonical layout into any formatter sink
    pub fn render_to(&self, node: NodeId, out: &mut dyn Write) -> fmt::Result {
        match self.kind(node) {
            NodeKind::CompilationUnit => {
                for (i, ty) in self.list(node, Property::Types).iter().enumerate() {
                    if i > 0 {
                        out.write_str("\n\n")?;
                    }
                    self.render_to(*ty, out)?;
                }
                Ok(())
            }
            NodeKind::ClassDeclaration => {
                self.render_modifiers(node, out)?;
                out.write_str("class ")?;
                self.render_child(node, Property::Name, out)?;
                out.write_str(" {")?;
                self.render_lines(self.list(node, Property::Members), out)?;
                out.write_char('}')
            }
            NodeKind::FieldDeclaration => {
                self.render_modifiers(node, out)?;
                self.render_child(node, Property::ElementType, out)?;
                out.write_char(' ')?;
                self.render_joined(self.list(node, Property::Variables), ", ", out)?;
                out.write_char(';')
            }
            NodeKind::VariableDeclarator => {
                self.render_child(node, Property::Name, out)?;
                if let Some(init) = self.node(node, Property::Initializer) {
                    out.write_str(" = ")?;
                    self.render_to(init, out)?;
                }
                Ok(())
            }
            NodeKind::MethodDeclaration => {
                self.render_modifiers(node, out)?;
                self.render_child(node, Property::ReturnType, out)?;
                out.write_char(' ')?;
                self.render_child(node, Property::Name, out)?;
                out.write_char('(')?;
                self.render_joined(self.list(node, Property::Parameters), ", ", out)?;
                out.write_char(')')?;
                match self.node(node, Property::Body) {
                    Some(body) => {
                        out.write_char(' ')?;
                        self.render_to(body, out)
                    }
                    None => out.write_char(';'),
                }
            }
            NodeKind::Parameter => {
                self.render_modifiers(node, out)?;
                self.render_child(node, Property::ParamType, out)?;
                out.write_char(' ')?;
                self.render_child(node, Property::Name, out)
            }
            NodeKind::BlockStmt => {
                out.write_char('{')?;
                self.render_lines(self.list(node, Property::Statements), out)?;
                out.write_char('}')
            }
            NodeKind::ExpressionStmt => {
                self.render_child(node, Property::Expression, out)?;
                out.write_char(';')
            }
            NodeKind::ReturnStmt => {
                out.write_str("return")?;
                if let Some(expr) = self.node(node, Property::Expression) {
                    out.write_char(' ')?;
                    self.render_to(expr, out)?;
                }
                out.write_char(';')
            }
            NodeKind::BinaryExpr => {
                self.render_child(node, Property::Left, out)?;
                write!(
                    out,
                    " {} ",
                    self.scalar(node, Property::Operator).unwrap_or_default()
                )?;
                self.render_child(node, Property::Right, out)
            }
            NodeKind::IntegerLiteral | NodeKind::CharLiteral => {
                out.write_str(self.scalar(node, Property::Value).unwrap_or_default())
            }
            NodeKind::NameExpr | NodeKind::ClassType => {
                self.render_child(node, Property::Name, out)
            }
            NodeKind::SimpleName => {
                out.write_str(self.scalar(node, Property::Identifier).unwrap_or_default())
            }
            NodeKind::PrimitiveType => {
                out.write_str(self.scalar(node, Property::Keyword).unwrap_or_default())
            }
            NodeKind::VoidType => out.write_str("void"),
        }
    }

    fn render_child(&self, node: NodeId, property: Property, out: &mut dyn Write) -> fmt::Result {
        match self.node(node, property) {
            Some(child) => self.render_to(child, out),
            None => Ok(()),
        }
    }

    fn render_modifiers(&self, node: NodeId, out: &mut dyn Write) -> fmt::Result {
        if let Some(modifiers) = self
            .get(node, Property::Modifiers)
            .and_then(|v| v.as_modifiers())
        {
            for modifier in modifiers {
                write!(out, "{modifier} ")?;
            }
        }
        Ok(())
    }

    fn render_joined(&self, items: &[NodeId], separator: &str, out: &mut dyn Write) -> fmt::Result {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.write_str(separator)?;
            }
            self.render_to(*item, out)?;
        }
        Ok(())
    }

    /// Each item on its own indented line, closing on a fresh line
    fn render_lines(&self, items: &[NodeId], out: &mut dyn Write) -> fmt::Result {
        if items.is_empty() {
            return Ok(());
        }
        for item in items {
            out.write_char('\n')?;
            for (i, line) in self.render(*item).lines().enumerate() {
                if i > 0 {
                    out.write_char('\n')?;
                }
                if !line.is_empty() {
                    out.write_str(INDENT)?;
                }
                out.write_str(line)?;
            }
        }
        out.write_char('\n')
    }
}
