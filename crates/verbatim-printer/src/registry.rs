//! Side table of preserved text, keyed by node handle

use std::fmt;

use la_arena::ArenaMap;
use verbatim_core::ast::{Ast, NodeId};
use verbatim_core::{Result, VerbatimError};

use crate::fallback;
use crate::node_text::{NodeText, TextElement};
use crate::offset::LineIndex;
use crate::policy::Style;

/// Preserved text of every registered node
#[derive(Default)]
pub struct Registry {
    texts: ArenaMap<NodeId, NodeText>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("nodes", &self.len())
            .finish()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `root` and every node below it that carries a range
    pub fn build(ast: &Ast, root: NodeId, index: &LineIndex<'_>) -> Result<Self> {
        let mut registry = Self::new();
        for node in ast.descendants(root) {
            if let Some(text) = register_text(ast, index, node)? {
                registry.insert(node, text);
            }
        }
        Ok(registry)
    }

    pub fn insert(&mut self, node: NodeId, text: NodeText) {
        self.texts.insert(node, text);
    }

    pub fn get(&self, node: NodeId) -> Option<&NodeText> {
        self.texts.get(node)
    }

    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut NodeText> {
        self.texts.get_mut(node)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.texts.contains_idx(node)
    }

    /// Registered nodes in arena order
    pub fn nodes(&self) -> Vec<NodeId> {
        self.texts.iter().map(|(id, _)| id).collect()
    }

    pub fn len(&self) -> usize {
        self.texts.values().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Give `node` and its descendants template text where they have none
    /// and their kind has a template. Returns how many nodes were adopted.
    pub fn adopt(&mut self, ast: &Ast, node: NodeId, style: &Style) -> usize {
        let mut adopted = 0;
        for id in ast.descendants(node) {
            if self.contains(id) {
                continue;
            }
            if let Some(text) = fallback::template(ast, id, style) {
                tracing::trace!(node = %ast.label(id), "materialised template text");
                self.insert(id, text);
                adopted += 1;
            }
        }
        adopted
    }

    /// Write the preserved text of `node`, expanding child references
    /// recursively. Nodes without text use the default rendering.
    pub fn expand(&self, ast: &Ast, node: NodeId, out: &mut dyn fmt::Write) -> fmt::Result {
        let Some(text) = self.get(node) else {
            return ast.render_to(node, out);
        };
        for element in text.elements() {
            match element {
                TextElement::Literal(literal) => out.write_str(literal)?,
                TextElement::Child(child) => self.expand(ast, *child, out)?,
            }
        }
        Ok(())
    }
}

/// Split the source text of `node` into literal gaps and references to its
/// direct children. Returns `None` for a node without a range; children
/// without a range are left out.
pub fn register_text(ast: &Ast, index: &LineIndex<'_>, node: NodeId) -> Result<Option<NodeText>> {
    let Some(range) = ast.range(node) else {
        return Ok(None);
    };
    let span = index.span(range)?;

    let mut children = Vec::new();
    for child in ast.children(node) {
        match ast.range(child) {
            Some(child_range) => children.push((index.span(child_range)?, child_range, child)),
            None => tracing::warn!(
                node = %ast.label(node),
                child = %ast.label(child),
                "child has no range and is left out of the preserved text"
            ),
        }
    }
    children.sort_by_key(|(child_span, _, _)| child_span.start);

    let source = index.source();
    let mut text = NodeText::new();
    let mut cursor = span.start;
    for (child_span, child_range, child) in children {
        if child_span.start < cursor || child_span.end > span.end {
            return Err(VerbatimError::malformed_range(
                child_range,
                format!(
                    "{} overlaps a sibling or leaves its parent {range}",
                    ast.label(child)
                ),
            ));
        }
        text.push_literal(&source[cursor..child_span.start]);
        text.push_child(child);
        cursor = child_span.end;
    }
    text.push_literal(&source[cursor..span.end]);
    Ok(Some(text))
}
