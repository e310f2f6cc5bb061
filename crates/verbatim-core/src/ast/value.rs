//! Tagged property values

use std::collections::BTreeSet;

use super::kind::{Modifier, Shape};
use super::tree::NodeId;

/// Value stored under a node property
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Node(NodeId),
    Optional(Option<NodeId>),
    List(Vec<NodeId>),
    Scalar(String),
    Modifiers(BTreeSet<Modifier>),
}

impl Value {
    pub fn shape(&self) -> Shape {
        match self {
            Value::Node(_) => Shape::Node,
            Value::Optional(_) => Shape::Optional,
            Value::List(_) => Shape::List,
            Value::Scalar(_) => Shape::Scalar,
            Value::Modifiers(_) => Shape::Modifiers,
        }
    }

    /// The single node held by a `Node` or a present `Optional`
    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            Value::Node(id) | Value::Optional(Some(id)) => Some(*id),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[NodeId]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Value::Scalar(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_modifiers(&self) -> Option<&BTreeSet<Modifier>> {
        match self {
            Value::Modifiers(set) => Some(set),
            _ => None,
        }
    }

    /// Every node referenced by this value, in order
    pub fn nodes(&self) -> Vec<NodeId> {
        match self {
            Value::Node(id) | Value::Optional(Some(id)) => vec![*id],
            Value::List(items) => items.clone(),
            Value::Optional(None) | Value::Scalar(_) | Value::Modifiers(_) => Vec::new(),
        }
    }

    /// Empty value of the given shape
    pub fn empty(shape: Shape) -> Option<Self> {
        match shape {
            Shape::Node => None,
            Shape::Optional => Some(Value::Optional(None)),
            Shape::List => Some(Value::List(Vec::new())),
            Shape::Scalar => Some(Value::Scalar(String::new())),
            Shape::Modifiers => Some(Value::Modifiers(BTreeSet::new())),
        }
    }
}

impl From<NodeId> for Value {
    fn from(id: NodeId) -> Self {
        Value::Node(id)
    }
}

impl From<Option<NodeId>> for Value {
    fn from(id: Option<NodeId>) -> Self {
        Value::Optional(id)
    }
}

impl From<Vec<NodeId>> for Value {
    fn from(items: Vec<NodeId>) -> Self {
        Value::List(items)
    }
}

impl From<BTreeSet<Modifier>> for Value {
    fn from(set: BTreeSet<Modifier>) -> Self {
        Value::Modifiers(set)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Scalar(text.to_string())
    }
}
