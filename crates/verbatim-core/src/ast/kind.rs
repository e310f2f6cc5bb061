//! Node kinds, properties and the per-kind property schema

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every kind of node the tree can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    CompilationUnit,
    ClassDeclaration,
    FieldDeclaration,
    VariableDeclarator,
    MethodDeclaration,
    Parameter,
    BlockStmt,
    ExpressionStmt,
    ReturnStmt,
    BinaryExpr,
    IntegerLiteral,
    CharLiteral,
    NameExpr,
    SimpleName,
    PrimitiveType,
    VoidType,
    ClassType,
}

/// Named property of a node. Every property a kind carries is listed in
/// [`NodeKind::schema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Property {
    Types,
    Modifiers,
    Name,
    Members,
    ElementType,
    Variables,
    Initializer,
    ReturnType,
    Parameters,
    Body,
    Statements,
    Expression,
    Left,
    Operator,
    Right,
    Value,
    Identifier,
    ParamType,
    Keyword,
}

impl Property {
    pub fn as_str(&self) -> &'static str {
        match self {
            Property::Types => "types",
            Property::Modifiers => "modifiers",
            Property::Name => "name",
            Property::Members => "members",
            Property::ElementType => "element_type",
            Property::Variables => "variables",
            Property::Initializer => "initializer",
            Property::ReturnType => "return_type",
            Property::Parameters => "parameters",
            Property::Body => "body",
            Property::Statements => "statements",
            Property::Expression => "expression",
            Property::Left => "left",
            Property::Operator => "operator",
            Property::Right => "right",
            Property::Value => "value",
            Property::Identifier => "identifier",
            Property::ParamType => "param_type",
            Property::Keyword => "keyword",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of the value stored under a property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Exactly one child node
    Node,
    /// Zero or one child node
    Optional,
    /// Ordered collection of child nodes
    List,
    /// Plain scalar text (identifier, literal value, operator)
    Scalar,
    /// Set of modifier keywords
    Modifiers,
}

impl NodeKind {
    /// The full property mapping of this kind, in source order
    pub fn schema(&self) -> &'static [(Property, Shape)] {
        use Property as P;
        use Shape as S;
        match self {
            NodeKind::CompilationUnit => &[(P::Types, S::List)],
            NodeKind::ClassDeclaration => &[
                (P::Modifiers, S::Modifiers),
                (P::Name, S::Node),
                (P::Members, S::List),
            ],
            NodeKind::FieldDeclaration => &[
                (P::Modifiers, S::Modifiers),
                (P::ElementType, S::Node),
                (P::Variables, S::List),
            ],
            NodeKind::VariableDeclarator => &[(P::Name, S::Node), (P::Initializer, S::Optional)],
            NodeKind::MethodDeclaration => &[
                (P::Modifiers, S::Modifiers),
                (P::ReturnType, S::Node),
                (P::Name, S::Node),
                (P::Parameters, S::List),
                (P::Body, S::Optional),
            ],
            NodeKind::Parameter => &[
                (P::Modifiers, S::Modifiers),
                (P::ParamType, S::Node),
                (P::Name, S::Node),
            ],
            NodeKind::BlockStmt => &[(P::Statements, S::List)],
            NodeKind::ExpressionStmt => &[(P::Expression, S::Node)],
            NodeKind::ReturnStmt => &[(P::Expression, S::Optional)],
            NodeKind::BinaryExpr => &[
                (P::Left, S::Node),
                (P::Operator, S::Scalar),
                (P::Right, S::Node),
            ],
            NodeKind::IntegerLiteral | NodeKind::CharLiteral => &[(P::Value, S::Scalar)],
            NodeKind::NameExpr | NodeKind::ClassType => &[(P::Name, S::Node)],
            NodeKind::SimpleName => &[(P::Identifier, S::Scalar)],
            NodeKind::PrimitiveType => &[(P::Keyword, S::Scalar)],
            NodeKind::VoidType => &[],
        }
    }

    /// Shape of `property` on this kind, if the kind has it
    pub fn shape_of(&self, property: Property) -> Option<Shape> {
        self.schema()
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, shape)| *shape)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Declaration modifiers. Declaration order is the canonical source order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Abstract,
    Static,
    Final,
    Transient,
    Volatile,
    Synchronized,
    Native,
    Strictfp,
}

impl Modifier {
    pub const ALL: [Modifier; 11] = [
        Modifier::Public,
        Modifier::Protected,
        Modifier::Private,
        Modifier::Abstract,
        Modifier::Static,
        Modifier::Final,
        Modifier::Transient,
        Modifier::Volatile,
        Modifier::Synchronized,
        Modifier::Native,
        Modifier::Strictfp,
    ];

    /// Lower-case source keyword
    pub fn keyword(&self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Abstract => "abstract",
            Modifier::Static => "static",
            Modifier::Final => "final",
            Modifier::Transient => "transient",
            Modifier::Volatile => "volatile",
            Modifier::Synchronized => "synchronized",
            Modifier::Native => "native",
            Modifier::Strictfp => "strictfp",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.keyword() == keyword)
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Primitive type keywords
pub const PRIMITIVE_TYPES: [&str; 8] = [
    "boolean", "byte", "char", "short", "int", "long", "float", "double",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_shapes() {
        assert_eq!(
            NodeKind::MethodDeclaration.shape_of(Property::Parameters),
            Some(Shape::List)
        );
        assert_eq!(
            NodeKind::VariableDeclarator.shape_of(Property::Initializer),
            Some(Shape::Optional)
        );
        assert_eq!(NodeKind::SimpleName.shape_of(Property::Members), None);
        assert!(NodeKind::VoidType.schema().is_empty());
    }

    #[test]
    fn test_modifier_keywords_round_trip() {
        for modifier in Modifier::ALL {
            assert_eq!(Modifier::from_keyword(modifier.keyword()), Some(modifier));
        }
        assert_eq!(Modifier::from_keyword("class"), None);
        assert!(Modifier::Public < Modifier::Static);
    }
}
