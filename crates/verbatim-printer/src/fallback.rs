//! Text templates for nodes created after setup
//!
//! A node spliced into preserved text has no source of its own. For the kinds
//! below a template lays out its keywords and punctuation around references
//! to its children, so that later edits to the node can be translated just
//! like edits to parsed nodes. Other kinds print through [`Ast::render`].

use verbatim_core::ast::{Ast, NodeId, NodeKind, Property};

use crate::node_text::NodeText;
use crate::policy::Style;

/// Template text for a fresh node of a kind that has one
pub fn template(ast: &Ast, node: NodeId, style: &Style) -> Option<NodeText> {
    let mut text = NodeText::new();
    match ast.kind(node) {
        NodeKind::FieldDeclaration => {
            push_modifiers(ast, node, &mut text);
            push_child(ast, node, Property::ElementType, &mut text);
            text.push_literal(" ");
            push_joined(ast.list(node, Property::Variables), ", ", &mut text);
            text.push_literal(";");
        }
        NodeKind::VariableDeclarator => {
            push_child(ast, node, Property::Name, &mut text);
            if let Some(init) = ast.node(node, Property::Initializer) {
                text.push_literal(" = ");
                text.push_child(init);
            }
        }
        NodeKind::Parameter => {
            push_modifiers(ast, node, &mut text);
            push_child(ast, node, Property::ParamType, &mut text);
            text.push_literal(" ");
            push_child(ast, node, Property::Name, &mut text);
        }
        NodeKind::MethodDeclaration => {
            push_modifiers(ast, node, &mut text);
            push_child(ast, node, Property::ReturnType, &mut text);
            text.push_literal(" ");
            push_child(ast, node, Property::Name, &mut text);
            text.push_literal("(");
            push_joined(ast.list(node, Property::Parameters), ", ", &mut text);
            text.push_literal(")");
            match ast.node(node, Property::Body) {
                Some(body) => {
                    text.push_literal(" ");
                    text.push_child(body);
                }
                None => text.push_literal(";"),
            }
        }
        NodeKind::BlockStmt => {
            text.push_literal("{");
            let statements = ast.list(node, Property::Statements);
            for &statement in statements {
                text.push_literal(&style.newline);
                text.push_literal(&style.indent);
                text.push_child(statement);
            }
            if !statements.is_empty() {
                text.push_literal(&style.newline);
            }
            text.push_literal("}");
        }
        NodeKind::ExpressionStmt => {
            push_child(ast, node, Property::Expression, &mut text);
            text.push_literal(";");
        }
        NodeKind::ReturnStmt => {
            text.push_literal("return");
            if let Some(expression) = ast.node(node, Property::Expression) {
                text.push_literal(" ");
                text.push_child(expression);
            }
            text.push_literal(";");
        }
        _ => return None,
    }
    Some(text)
}

fn push_modifiers(ast: &Ast, node: NodeId, text: &mut NodeText) {
    if let Some(modifiers) = ast
        .get(node, Property::Modifiers)
        .and_then(|v| v.as_modifiers())
    {
        for modifier in modifiers {
            text.push_literal(modifier.keyword());
            text.push_literal(" ");
        }
    }
}

fn push_child(ast: &Ast, node: NodeId, property: Property, text: &mut NodeText) {
    if let Some(child) = ast.node(node, property) {
        text.push_child(child);
    }
}

fn push_joined(items: &[NodeId], separator: &str, text: &mut NodeText) {
    for (i, &item) in items.iter().enumerate() {
        if i > 0 {
            text.push_literal(separator);
        }
        text.push_child(item);
    }
}
