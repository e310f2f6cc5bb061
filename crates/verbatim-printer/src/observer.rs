//! Translation of tree mutations into edits of preserved text
//!
//! The observer is registered on the [`Ast`] at setup and sees every
//! mutation after it has been applied. Events outside the registered subtree,
//! and events on nodes that never received text, need no translation: the
//! default rendering of such nodes already reflects the tree.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Weak;

use verbatim_core::ast::{Ast, AstEvent, AstObserver, ListChange, Modifier, NodeId, Property, Value};
use verbatim_core::{Result, VerbatimError};

use crate::node_text::{Boundary, NodeText, TextElement};
use crate::policy::{Anchor, Layout, Rule, Slot, Style};
use crate::registry::Registry;

/// Keeps a printer's registry in step with the tree it was set up on
pub struct PreservingObserver {
    registry: Weak<RefCell<Registry>>,
    root: NodeId,
    style: Style,
}

impl PreservingObserver {
    pub fn new(registry: Weak<RefCell<Registry>>, root: NodeId, style: Style) -> Self {
        Self {
            registry,
            root,
            style,
        }
    }
}

impl AstObserver for PreservingObserver {
    fn on_event(&mut self, ast: &Ast, event: &AstEvent<'_>) -> Result<()> {
        // The printer is gone
        let Some(registry) = self.registry.upgrade() else {
            return Ok(());
        };
        let owner = event.owner();
        if !ast.is_within(owner, self.root) {
            tracing::trace!(owner = %ast.label(owner), "edit outside the registered subtree");
            return Ok(());
        }

        let mut registry = registry.borrow_mut();
        if !registry.contains(owner) {
            tracing::trace!(owner = %ast.label(owner), "owner has no preserved text");
            return Ok(());
        }

        let mut edit = Edit {
            ast,
            registry: &mut *registry,
            style: &self.style,
            owner,
        };
        let result = match *event {
            AstEvent::PropertyChanged {
                property, old, new, ..
            } => edit.property_changed(property, old, new),
            AstEvent::ListChanged {
                property,
                index,
                child,
                change: ListChange::Added,
                ..
            } => edit.child_added(property, index, child),
            AstEvent::ListChanged {
                property,
                index,
                child,
                change: ListChange::Removed,
                ..
            } => edit.child_removed(property, index, child),
            AstEvent::ListChanged {
                property,
                child,
                change: ListChange::Replaced(old),
                ..
            } => edit.child_replaced(property, old, child),
        };

        match &result {
            Ok(()) => tracing::debug!(
                owner = %ast.label(owner),
                property = %event.property(),
                "translated edit"
            ),
            Err(err) => tracing::warn!(
                owner = %ast.label(owner),
                property = %event.property(),
                "edit could not be translated: {err}"
            ),
        }
        result
    }
}

/// One mutation being applied to the owner's text
struct Edit<'a> {
    ast: &'a Ast,
    registry: &'a mut Registry,
    style: &'a Style,
    owner: NodeId,
}

impl Edit<'_> {
    fn text(&mut self) -> Result<&mut NodeText> {
        self.registry
            .get_mut(self.owner)
            .ok_or_else(|| VerbatimError::internal_error("owner text vanished during an edit"))
    }

    fn label(&self) -> String {
        self.ast.label(self.owner)
    }

    fn unsupported(&self, property: Property, message: &str) -> VerbatimError {
        VerbatimError::unsupported_edit(self.label(), property.as_str(), message)
    }

    fn missing(&self, anchor: String) -> VerbatimError {
        VerbatimError::anchor_not_found(anchor, self.label())
    }

    fn rule(&self, property: Property) -> Result<Rule> {
        Slot::of(self.ast.kind(self.owner), property)
            .map(Slot::rule)
            .ok_or_else(|| self.unsupported(property, "no edit rule for this property"))
    }

    fn adopt(&mut self, node: NodeId) {
        self.registry.adopt(self.ast, node, self.style);
    }

    fn property_changed(&mut self, property: Property, old: &Value, new: &Value) -> Result<()> {
        if old == new {
            return Ok(());
        }

        if let (Some(old_child), Some(new_child)) = (old.as_node(), new.as_node()) {
            if !self.text()?.replace_child(old_child, new_child) {
                return Err(self.missing(format!("child {}", self.ast.label(old_child))));
            }
            self.adopt(new_child);
            return Ok(());
        }

        match (self.rule(property)?, old, new) {
            (
                Rule::Connective {
                    anchor, connective, ..
                },
                Value::Optional(None),
                Value::Optional(Some(child)),
            ) => self.insert_connective(anchor, connective, *child),
            (Rule::Connective { token, .. }, Value::Optional(Some(child)), Value::Optional(None)) => {
                self.remove_connective(token, *child)
            }
            (Rule::Keywords, Value::Modifiers(old), Value::Modifiers(new)) => {
                self.update_keywords(old, new)
            }
            (Rule::Token, Value::Scalar(old), Value::Scalar(new)) => {
                self.replace_token(property, old, new)
            }
            _ => Err(self.unsupported(property, "change has no translation")),
        }
    }

    fn child_added(&mut self, property: Property, index: usize, child: NodeId) -> Result<()> {
        let Rule::Splice {
            anchor,
            lead,
            separator,
            layout,
            closing_line,
        } = self.rule(property)?
        else {
            return Err(self.unsupported(property, "not a collection rule"));
        };
        let ast = self.ast;
        let siblings = ast.list(self.owner, property);
        let separator = self.style.separator(layout, separator);

        if siblings.len() == 1 {
            let lead = match layout {
                Layout::Inline => lead.to_string(),
                Layout::OwnLine => separator,
                Layout::BlankLine => String::new(),
            };
            let at = self.anchor_index(anchor)?;
            let text = self.text()?;
            let at = text.insert_literal(at, &lead);
            text.insert(at, TextElement::Child(child));
            if closing_line {
                self.close_line(at + 1)?;
            }
        } else if index == 0 {
            let next = siblings[1];
            let Some(at) = self.text()?.find_child(next) else {
                return Err(self.missing(format!("child {}", ast.label(next))));
            };
            let text = self.text()?;
            text.insert(at, TextElement::Child(child));
            text.insert_literal(at + 1, &separator);
        } else {
            let previous = siblings[index - 1];
            let Some(found) = self.text()?.find_child(previous) else {
                return Err(self.missing(format!("child {}", ast.label(previous))));
            };
            let text = self.text()?;
            let at = text.insert_literal(found + 1, &separator);
            text.insert(at, TextElement::Child(child));
        }

        self.adopt(child);
        Ok(())
    }

    /// Break the line before the element at `index` unless it already starts one
    fn close_line(&mut self, index: usize) -> Result<()> {
        let newline = self.style.newline.clone();
        let text = self.text()?;
        let next = text
            .elements()
            .get(index)
            .and_then(TextElement::as_literal)
            .map(str::to_owned);
        match next {
            Some(next) if next.starts_with(['\n', '\r']) => {}
            Some(next) => {
                text.replace(index, TextElement::Literal(format!("{newline}{next}")));
            }
            None => {
                text.insert_literal(index, &newline);
            }
        }
        Ok(())
    }

    /// Swap `old` for `child` where it stands, keeping the text around it
    fn child_replaced(&mut self, property: Property, old: NodeId, child: NodeId) -> Result<()> {
        if !matches!(self.rule(property)?, Rule::Splice { .. }) {
            return Err(self.unsupported(property, "not a collection rule"));
        }
        if !self.text()?.replace_child(old, child) {
            return Err(self.missing(format!("child {}", self.ast.label(old))));
        }
        self.adopt(child);
        Ok(())
    }

    fn replace_token(&mut self, property: Property, old: &str, new: &str) -> Result<()> {
        let ast = self.ast;
        let replaced = match Slot::of(ast.kind(self.owner), property) {
            // Only the text between the operands spells the operator
            Some(Slot::BinaryOperator) => {
                let (Some(left), Some(right)) = (
                    ast.node(self.owner, Property::Left),
                    ast.node(self.owner, Property::Right),
                ) else {
                    return Err(self.unsupported(property, "operator without operands"));
                };
                self.text()?.replace_token_between(left, right, old, new)
            }
            _ => self.text()?.replace_token(old, new),
        };
        if replaced {
            Ok(())
        } else {
            Err(self.missing(format!("`{old}`")))
        }
    }

    fn child_removed(&mut self, property: Property, index: usize, child: NodeId) -> Result<()> {
        let rule = self.rule(property)?;
        if !matches!(rule, Rule::Splice { .. }) {
            return Err(self.unsupported(property, "not a collection rule"));
        }
        let remaining = self.ast.list(self.owner, property).len();

        if let Some(comma) = rule.comma() {
            let span = if index == 0 && remaining > 0 {
                Some((Boundary::Child(child), Boundary::Token(comma)))
            } else if index > 0 {
                Some((Boundary::Token(comma), Boundary::Child(child)))
            } else {
                None
            };
            if let Some((from, to)) = span
                && !self.text()?.remove_text_between(from, to, true)
            {
                return Err(self.missing(format!("`{comma}` next to {}", self.ast.label(child))));
            }
        }

        if self.text()?.remove_child(child).is_none() {
            return Err(self.missing(format!("child {}", self.ast.label(child))));
        }
        Ok(())
    }

    fn insert_connective(&mut self, anchor: Anchor, connective: &str, child: NodeId) -> Result<()> {
        let at = self.anchor_index(anchor)?;
        let text = self.text()?;
        let at = text.insert_literal(at, connective);
        text.insert(at, TextElement::Child(child));
        self.adopt(child);
        Ok(())
    }

    fn remove_connective(&mut self, token: &str, child: NodeId) -> Result<()> {
        let text = self.text()?;
        if !text.remove_text_between(Boundary::Token(token), Boundary::Child(child), true) {
            return Err(self.missing(format!("`{token}` before {}", self.ast.label(child))));
        }
        self.text()?.remove_child(child);
        Ok(())
    }

    fn update_keywords(&mut self, old: &BTreeSet<Modifier>, new: &BTreeSet<Modifier>) -> Result<()> {
        for modifier in old.difference(new) {
            if !self.text()?.remove_keyword(modifier.keyword()) {
                return Err(self.missing(format!("`{modifier}`")));
            }
        }
        let added: Vec<&Modifier> = new.difference(old).collect();
        let text = self.text()?;
        for modifier in added.into_iter().rev() {
            text.prepend_literal(&format!("{modifier} "));
        }
        Ok(())
    }

    /// Element index right after `anchor` in the owner's text
    fn anchor_index(&mut self, anchor: Anchor) -> Result<usize> {
        match anchor {
            Anchor::Front => Ok(0),
            Anchor::Accessor(property) => {
                let Some(child) = self.ast.node(self.owner, property) else {
                    return Err(self.unsupported(property, "anchor property is empty"));
                };
                match self.text()?.find_child(child) {
                    Some(index) => Ok(index + 1),
                    None => Err(self.missing(format!("`{property}` child"))),
                }
            }
            Anchor::Token(token) => {
                // Tokens are searched after the owner's name so that a
                // comment between keyword and name cannot match
                let name = self.ast.node(self.owner, Property::Name);
                let text = self.text()?;
                let from = name
                    .and_then(|name| text.find_child(name))
                    .map_or(0, |index| index + 1);
                match text.find_literal_from(from, token) {
                    Some((index, offset)) => Ok(text.split_literal(index, offset + token.len())),
                    None => Err(self.missing(format!("`{token}`"))),
                }
            }
        }
    }
}
