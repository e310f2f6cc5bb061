//! Arena-backed syntax tree with observable mutations

use indexmap::IndexMap;
use la_arena::{Arena, Idx};
use std::fmt;

use super::event::{AstEvent, AstObserver, ListChange};
use super::kind::{NodeKind, Property, Shape};
use super::value::Value;
use crate::Result;
use crate::error::VerbatimError;
use crate::position::Range;

/// Stable handle of a node, assigned once at construction
pub type NodeId = Idx<NodeData>;

/// Storage for one node
#[derive(Debug, Clone)]
pub struct NodeData {
    kind: NodeKind,
    range: Option<Range>,
    parent: Option<NodeId>,
    properties: IndexMap<Property, Value>,
}

/// A syntax tree. Nodes live in an arena and are addressed by [`NodeId`].
///
/// Nodes that are created but never attached stay in the arena; they are
/// simply unreachable from the root.
#[derive(Default)]
pub struct Ast {
    nodes: Arena<NodeData>,
    observers: Vec<Box<dyn AstObserver>>,
}

impl fmt::Debug for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ast")
            .field("nodes", &self.nodes.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Numeric value of a node handle, for diagnostics
pub fn raw_id(id: NodeId) -> u32 {
    u32::from(id.into_raw())
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes ever allocated in this tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a node of `kind`. Properties missing from `values` start
    /// empty; a required single-node property must be provided.
    pub fn alloc(
        &mut self,
        kind: NodeKind,
        values: impl IntoIterator<Item = (Property, Value)>,
    ) -> Result<NodeId> {
        let mut provided: IndexMap<Property, Value> = values.into_iter().collect();
        let mut properties = IndexMap::with_capacity(kind.schema().len());

        for &(property, shape) in kind.schema() {
            let value = match provided.shift_remove(&property) {
                Some(value) => value,
                None => Value::empty(shape).ok_or_else(|| {
                    VerbatimError::invalid_edit(format!(
                        "{kind} requires a value for `{property}`"
                    ))
                })?,
            };
            if value.shape() != shape {
                return Err(shape_mismatch(kind, property, shape, &value));
            }
            for child in value.nodes() {
                self.ensure_detached(child)?;
            }
            properties.insert(property, value);
        }

        if let Some(property) = provided.keys().next() {
            return Err(VerbatimError::invalid_edit(format!(
                "{kind} has no property `{property}`"
            )));
        }

        let children: Vec<NodeId> = properties.values().flat_map(Value::nodes).collect();
        let id = self.nodes.alloc(NodeData {
            kind,
            range: None,
            parent: None,
            properties,
        });
        for child in children {
            self.nodes[child].parent = Some(id);
        }
        Ok(id)
    }

    /// Allocate a childless node whose scalar properties already match the schema
    pub(super) fn alloc_leaf(
        &mut self,
        kind: NodeKind,
        values: impl IntoIterator<Item = (Property, Value)>,
    ) -> NodeId {
        self.nodes.alloc(NodeData {
            kind,
            range: None,
            parent: None,
            properties: values.into_iter().collect(),
        })
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id].kind
    }

    pub fn range(&self, id: NodeId) -> Option<Range> {
        self.nodes[id].range
    }

    pub fn set_range(&mut self, id: NodeId, range: Range) {
        self.nodes[id].range = Some(range);
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    /// The node's full property mapping, in schema order
    pub fn properties(&self, id: NodeId) -> &IndexMap<Property, Value> {
        &self.nodes[id].properties
    }

    pub fn get(&self, id: NodeId, property: Property) -> Option<&Value> {
        self.nodes[id].properties.get(&property)
    }

    /// Single child under `property` (a `Node` or a present `Optional`)
    pub fn node(&self, id: NodeId, property: Property) -> Option<NodeId> {
        self.get(id, property).and_then(Value::as_node)
    }

    /// Items of a collection property; empty when the kind has no such collection
    pub fn list(&self, id: NodeId, property: Property) -> &[NodeId] {
        self.get(id, property)
            .and_then(Value::as_list)
            .unwrap_or_default()
    }

    pub fn scalar(&self, id: NodeId, property: Property) -> Option<&str> {
        self.get(id, property).and_then(Value::as_scalar)
    }

    /// Identifier of a simple name, or of the `name` child of a named node
    pub fn identifier(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::SimpleName => self.scalar(id, Property::Identifier),
            _ => self
                .node(id, Property::Name)
                .and_then(|name| self.identifier(name)),
        }
    }

    /// Direct children in property order
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes[id]
            .properties
            .values()
            .flat_map(Value::nodes)
            .collect()
    }

    /// `root` and every node below it, in pre-order
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).into_iter().rev());
        }
        out
    }

    /// Whether `id` is `root` or lies below it
    pub fn is_within(&self, id: NodeId, root: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == root {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Property of `parent` that holds `child`
    pub fn property_holding(&self, parent: NodeId, child: NodeId) -> Option<Property> {
        self.nodes[parent]
            .properties
            .iter()
            .find(|(_, value)| value.nodes().contains(&child))
            .map(|(property, _)| *property)
    }

    /// Short label used in diagnostics, e.g. `MethodDeclaration#4`
    pub fn label(&self, id: NodeId) -> String {
        format!("{}#{}", self.kind(id), raw_id(id))
    }

    pub fn add_observer(&mut self, observer: Box<dyn AstObserver>) {
        self.observers.push(observer);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Replace a non-collection property, returning the previous value
    pub fn set(&mut self, id: NodeId, property: Property, value: Value) -> Result<Value> {
        let shape = self.shape_of(id, property)?;
        if shape == Shape::List {
            return Err(VerbatimError::invalid_edit(format!(
                "`{property}` of {} is a collection; use insert/remove",
                self.label(id)
            )));
        }
        if value.shape() != shape {
            return Err(shape_mismatch(self.kind(id), property, shape, &value));
        }

        let current = self.nodes[id].properties[&property].nodes();
        for child in value.nodes() {
            if !current.contains(&child) {
                self.ensure_detached(child)?;
                self.ensure_acyclic(id, child)?;
            }
        }

        let old = self.nodes[id]
            .properties
            .insert(property, value.clone())
            .ok_or_else(|| VerbatimError::internal_error("schema property missing from node"))?;
        for child in old.nodes() {
            self.nodes[child].parent = None;
        }
        for child in value.nodes() {
            self.nodes[child].parent = Some(id);
        }

        tracing::trace!(node = %self.label(id), %property, "property set");
        self.notify(&AstEvent::PropertyChanged {
            node: id,
            property,
            old: &old,
            new: &value,
        })?;
        Ok(old)
    }

    /// Insert `child` into the collection `property` of `owner` at `index`
    pub fn insert(
        &mut self,
        owner: NodeId,
        property: Property,
        index: usize,
        child: NodeId,
    ) -> Result<()> {
        self.expect_list(owner, property)?;
        self.ensure_detached(child)?;
        self.ensure_acyclic(owner, child)?;

        let items = self.list_mut(owner, property)?;
        if index > items.len() {
            return Err(VerbatimError::invalid_edit(format!(
                "index {index} out of bounds for `{property}` of length {}",
                items.len()
            )));
        }
        items.insert(index, child);
        self.nodes[child].parent = Some(owner);

        tracing::trace!(owner = %self.label(owner), %property, index, "child added");
        self.notify(&AstEvent::ListChanged {
            owner,
            property,
            index,
            child,
            change: ListChange::Added,
        })
    }

    /// Append `child` to the collection `property` of `owner`
    pub fn push(&mut self, owner: NodeId, property: Property, child: NodeId) -> Result<()> {
        let index = self.list(owner, property).len();
        self.insert(owner, property, index, child)
    }

    /// Remove the element at `index` from the collection `property` of `owner`
    pub fn remove(&mut self, owner: NodeId, property: Property, index: usize) -> Result<NodeId> {
        self.expect_list(owner, property)?;
        let items = self.list_mut(owner, property)?;
        if index >= items.len() {
            return Err(VerbatimError::invalid_edit(format!(
                "index {index} out of bounds for `{property}` of length {}",
                items.len()
            )));
        }
        let child = items.remove(index);
        self.nodes[child].parent = None;

        tracing::trace!(owner = %self.label(owner), %property, index, "child removed");
        self.notify(&AstEvent::ListChanged {
            owner,
            property,
            index,
            child,
            change: ListChange::Removed,
        })?;
        Ok(child)
    }

    /// Swap the element at `index` for `child`, returning the detached element
    pub fn replace_at(
        &mut self,
        owner: NodeId,
        property: Property,
        index: usize,
        child: NodeId,
    ) -> Result<NodeId> {
        self.expect_list(owner, property)?;
        self.ensure_detached(child)?;
        self.ensure_acyclic(owner, child)?;

        let items = self.list_mut(owner, property)?;
        let len = items.len();
        let Some(slot) = items.get_mut(index) else {
            return Err(VerbatimError::invalid_edit(format!(
                "index {index} out of bounds for `{property}` of length {len}"
            )));
        };
        let old = std::mem::replace(slot, child);
        self.nodes[old].parent = None;
        self.nodes[child].parent = Some(owner);

        tracing::trace!(owner = %self.label(owner), %property, index, "child replaced");
        self.notify(&AstEvent::ListChanged {
            owner,
            property,
            index,
            child,
            change: ListChange::Replaced(old),
        })?;
        Ok(old)
    }

    /// Detach `child` from its parent, whichever property holds it
    pub fn remove_node(&mut self, child: NodeId) -> Result<()> {
        let parent = self.parent(child).ok_or_else(|| {
            VerbatimError::invalid_edit(format!("{} is not attached", self.label(child)))
        })?;
        let property = self
            .property_holding(parent, child)
            .ok_or_else(|| VerbatimError::internal_error("parent does not reference child"))?;

        match self.shape_of(parent, property)? {
            Shape::List => {
                let index = self
                    .list(parent, property)
                    .iter()
                    .position(|&item| item == child)
                    .ok_or_else(|| VerbatimError::internal_error("child missing from list"))?;
                self.remove(parent, property, index).map(drop)
            }
            Shape::Optional => self.set(parent, property, Value::Optional(None)).map(drop),
            _ => Err(VerbatimError::invalid_edit(format!(
                "`{property}` of {} is required and cannot be removed",
                self.label(parent)
            ))),
        }
    }

    fn shape_of(&self, id: NodeId, property: Property) -> Result<Shape> {
        self.kind(id).shape_of(property).ok_or_else(|| {
            VerbatimError::invalid_edit(format!("{} has no property `{property}`", self.label(id)))
        })
    }

    fn expect_list(&self, id: NodeId, property: Property) -> Result<()> {
        match self.shape_of(id, property)? {
            Shape::List => Ok(()),
            shape => Err(VerbatimError::invalid_edit(format!(
                "`{property}` of {} is {shape:?}, not a collection",
                self.label(id)
            ))),
        }
    }

    fn list_mut(&mut self, id: NodeId, property: Property) -> Result<&mut Vec<NodeId>> {
        match self.nodes[id].properties.get_mut(&property) {
            Some(Value::List(items)) => Ok(items),
            _ => Err(VerbatimError::internal_error("collection property missing")),
        }
    }

    fn ensure_detached(&self, child: NodeId) -> Result<()> {
        match self.parent(child) {
            Some(parent) => Err(VerbatimError::invalid_edit(format!(
                "{} is already attached to {}",
                self.label(child),
                self.label(parent)
            ))),
            None => Ok(()),
        }
    }

    /// `child` must not be `owner` or one of its ancestors
    fn ensure_acyclic(&self, owner: NodeId, child: NodeId) -> Result<()> {
        if self.is_within(owner, child) {
            return Err(VerbatimError::invalid_edit(format!(
                "{} cannot be placed inside its own subtree at {}",
                self.label(child),
                self.label(owner)
            )));
        }
        Ok(())
    }

    fn notify(&mut self, event: &AstEvent<'_>) -> Result<()> {
        if self.observers.is_empty() {
            return Ok(());
        }
        let mut observers = std::mem::take(&mut self.observers);
        let result = observers
            .iter_mut()
            .try_for_each(|observer| observer.on_event(self, event));
        self.observers = observers;
        result
    }
}

fn shape_mismatch(kind: NodeKind, property: Property, expected: Shape, value: &Value) -> VerbatimError {
    VerbatimError::invalid_edit(format!(
        "`{property}` of {kind} expects {expected:?}, got {:?}",
        value.shape()
    ))
}
