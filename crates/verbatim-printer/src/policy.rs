//! Where edits land in preserved text
//!
//! Every (node kind, property) pair the printer knows how to translate maps
//! to a [`Slot`]; every slot has exactly one [`Rule`]. A pair without a slot
//! is an unsupported edit.

use verbatim_core::ast::{NodeKind, Property};
use verbatim_core::config::PrinterConfig;

/// Text-bearing places in the tree that edits are translated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    CompilationUnitTypes,
    ClassMembers,
    FieldVariables,
    MethodParameters,
    BlockStatements,
    VariableInitializer,
    ReturnExpression,
    ClassModifiers,
    FieldModifiers,
    MethodModifiers,
    ParameterModifiers,
    NameIdentifier,
    IntegerValue,
    CharValue,
    PrimitiveKeyword,
    BinaryOperator,
}

/// Where in the owner's text an insertion is anchored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Right after the first literal occurrence of this token
    Token(&'static str),
    /// Right after the reference to the child held by this property
    Accessor(Property),
    /// Before all other text
    Front,
}

/// How elements of a collection are laid out relative to each other
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// On the same line, joined by the rule's separator
    Inline,
    /// Each element on its own indented line
    OwnLine,
    /// Elements separated by an empty line
    BlankLine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Collection elements spliced relative to an anchor and to each other
    Splice {
        anchor: Anchor,
        /// Text placed between the anchor and the first element
        lead: &'static str,
        /// Text between consecutive elements for [`Layout::Inline`]
        separator: &'static str,
        layout: Layout,
        /// Whether the first element into an empty collection also gets a
        /// line break before the text that follows it
        closing_line: bool,
    },
    /// An optional child introduced by connective text, e.g. ` = ` before an initializer
    Connective {
        anchor: Anchor,
        connective: &'static str,
        /// Token that ends the connective; empty when the connective is pure whitespace
        token: &'static str,
    },
    /// Modifier keyword set
    Keywords,
    /// A single scalar token spelled out in the owner's own text
    Token,
}

impl Slot {
    pub fn of(kind: NodeKind, property: Property) -> Option<Slot> {
        use NodeKind as K;
        use Property as P;
        let slot = match (kind, property) {
            (K::CompilationUnit, P::Types) => Slot::CompilationUnitTypes,
            (K::ClassDeclaration, P::Members) => Slot::ClassMembers,
            (K::FieldDeclaration, P::Variables) => Slot::FieldVariables,
            (K::MethodDeclaration, P::Parameters) => Slot::MethodParameters,
            (K::BlockStmt, P::Statements) => Slot::BlockStatements,
            (K::VariableDeclarator, P::Initializer) => Slot::VariableInitializer,
            (K::ReturnStmt, P::Expression) => Slot::ReturnExpression,
            (K::ClassDeclaration, P::Modifiers) => Slot::ClassModifiers,
            (K::FieldDeclaration, P::Modifiers) => Slot::FieldModifiers,
            (K::MethodDeclaration, P::Modifiers) => Slot::MethodModifiers,
            (K::Parameter, P::Modifiers) => Slot::ParameterModifiers,
            (K::SimpleName, P::Identifier) => Slot::NameIdentifier,
            (K::IntegerLiteral, P::Value) => Slot::IntegerValue,
            (K::CharLiteral, P::Value) => Slot::CharValue,
            (K::PrimitiveType, P::Keyword) => Slot::PrimitiveKeyword,
            (K::BinaryExpr, P::Operator) => Slot::BinaryOperator,
            _ => return None,
        };
        Some(slot)
    }

    pub fn rule(self) -> Rule {
        match self {
            Slot::CompilationUnitTypes => Rule::Splice {
                anchor: Anchor::Front,
                lead: "",
                separator: "",
                layout: Layout::BlankLine,
                closing_line: false,
            },
            Slot::ClassMembers => Rule::Splice {
                anchor: Anchor::Token("{"),
                lead: "",
                separator: "",
                layout: Layout::OwnLine,
                closing_line: true,
            },
            Slot::BlockStatements => Rule::Splice {
                anchor: Anchor::Token("{"),
                lead: "",
                separator: "",
                layout: Layout::OwnLine,
                closing_line: false,
            },
            Slot::FieldVariables => Rule::Splice {
                anchor: Anchor::Accessor(Property::ElementType),
                lead: " ",
                separator: ", ",
                layout: Layout::Inline,
                closing_line: false,
            },
            Slot::MethodParameters => Rule::Splice {
                anchor: Anchor::Token("("),
                lead: "",
                separator: ", ",
                layout: Layout::Inline,
                closing_line: false,
            },
            Slot::VariableInitializer => Rule::Connective {
                anchor: Anchor::Accessor(Property::Name),
                connective: " = ",
                token: "=",
            },
            Slot::ReturnExpression => Rule::Connective {
                anchor: Anchor::Token("return"),
                connective: " ",
                token: "",
            },
            Slot::ClassModifiers
            | Slot::FieldModifiers
            | Slot::MethodModifiers
            | Slot::ParameterModifiers => Rule::Keywords,
            Slot::NameIdentifier
            | Slot::IntegerValue
            | Slot::CharValue
            | Slot::PrimitiveKeyword
            | Slot::BinaryOperator => Rule::Token,
        }
    }
}

impl Rule {
    /// Comma token removed together with an element, for comma-joined collections
    pub fn comma(&self) -> Option<&'static str> {
        match self {
            Rule::Splice {
                separator,
                layout: Layout::Inline,
                ..
            } if separator.trim() == "," => Some(","),
            _ => None,
        }
    }
}

/// Whitespace synthesized around inserted text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    pub indent: String,
    pub newline: String,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            indent: "    ".to_string(),
            newline: "\n".to_string(),
        }
    }
}

impl Style {
    /// Style for edits to `source` under `config`
    pub fn from_config(config: &PrinterConfig, source: &str) -> Self {
        Self {
            indent: config.indent.clone(),
            newline: config.newline_for(source).to_string(),
        }
    }

    /// Text between two consecutive elements of a collection
    pub fn separator(&self, layout: Layout, inline: &str) -> String {
        match layout {
            Layout::Inline => inline.to_string(),
            Layout::OwnLine => format!("{}{}", self.newline, self.indent),
            Layout::BlankLine => format!("{0}{0}", self.newline),
        }
    }
}
