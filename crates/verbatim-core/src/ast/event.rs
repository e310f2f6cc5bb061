//! Mutation events and the observer seam
//!
//! Every structural mutation on [`Ast`] is reported to the registered
//! observers after it has been applied. Observers run synchronously on the
//! mutating thread and may fail; the failure is returned from the mutation
//! call, but the tree change itself is not rolled back.

use super::kind::Property;
use super::tree::{Ast, NodeId};
use super::value::Value;
use crate::Result;

/// Kind of collection mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListChange {
    Added,
    Removed,
    /// The element at `index` took the place of this one
    Replaced(NodeId),
}

/// A single mutation, reported after the tree has been updated
#[derive(Debug, Clone, Copy)]
pub enum AstEvent<'a> {
    /// A non-collection property was replaced
    PropertyChanged {
        node: NodeId,
        property: Property,
        old: &'a Value,
        new: &'a Value,
    },
    /// A node was inserted into, removed from or swapped into a collection
    /// property. `index` is the position the child had (removal) or now has.
    ListChanged {
        owner: NodeId,
        property: Property,
        index: usize,
        child: NodeId,
        change: ListChange,
    },
}

impl AstEvent<'_> {
    /// The node whose property changed
    pub fn owner(&self) -> NodeId {
        match self {
            AstEvent::PropertyChanged { node, .. } => *node,
            AstEvent::ListChanged { owner, .. } => *owner,
        }
    }

    pub fn property(&self) -> Property {
        match self {
            AstEvent::PropertyChanged { property, .. } | AstEvent::ListChanged { property, .. } => {
                *property
            }
        }
    }
}

/// Receives every mutation applied to an [`Ast`]
pub trait AstObserver {
    fn on_event(&mut self, ast: &Ast, event: &AstEvent<'_>) -> Result<()>;
}
