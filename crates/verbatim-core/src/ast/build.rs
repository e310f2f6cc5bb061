//! Node constructors, finders and convenience edits

use std::collections::BTreeSet;

use super::kind::{Modifier, NodeKind, PRIMITIVE_TYPES, Property};
use super::tree::{Ast, NodeId};
use super::value::Value;
use crate::Result;
use crate::error::VerbatimError;

impl Ast {
    fn alloc_scalar(&mut self, kind: NodeKind, property: Property, text: &str) -> NodeId {
        self.alloc_leaf(kind, [(property, Value::Scalar(text.to_string()))])
    }

    pub fn new_simple_name(&mut self, identifier: &str) -> NodeId {
        self.alloc_scalar(NodeKind::SimpleName, Property::Identifier, identifier)
    }

    pub fn new_integer(&mut self, value: &str) -> NodeId {
        self.alloc_scalar(NodeKind::IntegerLiteral, Property::Value, value)
    }

    /// Character literal; `value` is the quoted source form, e.g. `'z'`
    pub fn new_char(&mut self, value: &str) -> NodeId {
        self.alloc_scalar(NodeKind::CharLiteral, Property::Value, value)
    }

    pub fn new_primitive_type(&mut self, keyword: &str) -> NodeId {
        self.alloc_scalar(NodeKind::PrimitiveType, Property::Keyword, keyword)
    }

    pub fn new_void_type(&mut self) -> NodeId {
        self.alloc_leaf(NodeKind::VoidType, [])
    }

    pub fn new_class_type(&mut self, name: NodeId) -> Result<NodeId> {
        self.alloc(NodeKind::ClassType, [(Property::Name, name.into())])
    }

    /// Type node for a source spelling: `void`, a primitive keyword, or a class name
    pub fn new_type(&mut self, spelling: &str) -> Result<NodeId> {
        if spelling == "void" {
            Ok(self.new_void_type())
        } else if PRIMITIVE_TYPES.contains(&spelling) {
            Ok(self.new_primitive_type(spelling))
        } else if is_identifier(spelling) {
            let name = self.new_simple_name(spelling);
            self.new_class_type(name)
        } else {
            Err(VerbatimError::invalid_edit(format!(
                "`{spelling}` is not a type name"
            )))
        }
    }

    pub fn new_name_expr(&mut self, name: NodeId) -> Result<NodeId> {
        self.alloc(NodeKind::NameExpr, [(Property::Name, name.into())])
    }

    pub fn new_binary(&mut self, left: NodeId, operator: &str, right: NodeId) -> Result<NodeId> {
        self.alloc(
            NodeKind::BinaryExpr,
            [
                (Property::Left, left.into()),
                (Property::Operator, operator.into()),
                (Property::Right, right.into()),
            ],
        )
    }

    pub fn new_expression_stmt(&mut self, expression: NodeId) -> Result<NodeId> {
        self.alloc(
            NodeKind::ExpressionStmt,
            [(Property::Expression, expression.into())],
        )
    }

    pub fn new_return(&mut self, expression: Option<NodeId>) -> Result<NodeId> {
        self.alloc(
            NodeKind::ReturnStmt,
            [(Property::Expression, expression.into())],
        )
    }

    pub fn new_block(&mut self, statements: Vec<NodeId>) -> Result<NodeId> {
        self.alloc(
            NodeKind::BlockStmt,
            [(Property::Statements, statements.into())],
        )
    }

    pub fn new_variable(&mut self, name: NodeId, initializer: Option<NodeId>) -> Result<NodeId> {
        self.alloc(
            NodeKind::VariableDeclarator,
            [
                (Property::Name, name.into()),
                (Property::Initializer, initializer.into()),
            ],
        )
    }

    pub fn new_parameter(
        &mut self,
        modifiers: BTreeSet<Modifier>,
        param_type: NodeId,
        name: NodeId,
    ) -> Result<NodeId> {
        self.alloc(
            NodeKind::Parameter,
            [
                (Property::Modifiers, modifiers.into()),
                (Property::ParamType, param_type.into()),
                (Property::Name, name.into()),
            ],
        )
    }

    pub fn new_field(
        &mut self,
        modifiers: BTreeSet<Modifier>,
        element_type: NodeId,
        variables: Vec<NodeId>,
    ) -> Result<NodeId> {
        self.alloc(
            NodeKind::FieldDeclaration,
            [
                (Property::Modifiers, modifiers.into()),
                (Property::ElementType, element_type.into()),
                (Property::Variables, variables.into()),
            ],
        )
    }

    pub fn new_method(
        &mut self,
        modifiers: BTreeSet<Modifier>,
        return_type: NodeId,
        name: NodeId,
        parameters: Vec<NodeId>,
        body: Option<NodeId>,
    ) -> Result<NodeId> {
        self.alloc(
            NodeKind::MethodDeclaration,
            [
                (Property::Modifiers, modifiers.into()),
                (Property::ReturnType, return_type.into()),
                (Property::Name, name.into()),
                (Property::Parameters, parameters.into()),
                (Property::Body, body.into()),
            ],
        )
    }

    pub fn new_class(
        &mut self,
        modifiers: BTreeSet<Modifier>,
        name: NodeId,
        members: Vec<NodeId>,
    ) -> Result<NodeId> {
        self.alloc(
            NodeKind::ClassDeclaration,
            [
                (Property::Modifiers, modifiers.into()),
                (Property::Name, name.into()),
                (Property::Members, members.into()),
            ],
        )
    }

    pub fn new_compilation_unit(&mut self, types: Vec<NodeId>) -> Result<NodeId> {
        self.alloc(NodeKind::CompilationUnit, [(Property::Types, types.into())])
    }

    /// First class named `name` among the types of a compilation unit
    pub fn class_by_name(&self, unit: NodeId, name: &str) -> Option<NodeId> {
        self.list(unit, Property::Types)
            .iter()
            .copied()
            .find(|&ty| self.identifier(ty) == Some(name))
    }

    /// Methods of a class with the given name, in declaration order
    pub fn methods_by_name(&self, class: NodeId, name: &str) -> Vec<NodeId> {
        self.list(class, Property::Members)
            .iter()
            .copied()
            .filter(|&member| {
                self.kind(member) == NodeKind::MethodDeclaration
                    && self.identifier(member) == Some(name)
            })
            .collect()
    }

    /// Field of a class declaring a variable with the given name
    pub fn field_by_name(&self, class: NodeId, name: &str) -> Option<NodeId> {
        self.list(class, Property::Members)
            .iter()
            .copied()
            .filter(|&member| self.kind(member) == NodeKind::FieldDeclaration)
            .find(|&field| {
                self.list(field, Property::Variables)
                    .iter()
                    .any(|&var| self.identifier(var) == Some(name))
            })
    }

    /// Append a field `type name;` to a class. Returns the new field.
    pub fn add_field(&mut self, class: NodeId, type_name: &str, name: &str) -> Result<NodeId> {
        let element_type = self.new_type(type_name)?;
        let name = self.new_simple_name(name);
        let variable = self.new_variable(name, None)?;
        let field = self.new_field(BTreeSet::new(), element_type, vec![variable])?;
        self.push(class, Property::Members, field)?;
        Ok(field)
    }

    /// Append a parameter `type name` to a method. Returns the new parameter.
    pub fn add_parameter(&mut self, method: NodeId, type_name: &str, name: &str) -> Result<NodeId> {
        let param_type = self.new_type(type_name)?;
        let name = self.new_simple_name(name);
        let parameter = self.new_parameter(BTreeSet::new(), param_type, name)?;
        self.push(method, Property::Parameters, parameter)?;
        Ok(parameter)
    }

    /// Append a statement to a block, or to the body of a method
    pub fn add_statement(&mut self, target: NodeId, statement: NodeId) -> Result<()> {
        let block = match self.kind(target) {
            NodeKind::BlockStmt => target,
            NodeKind::MethodDeclaration => self.node(target, Property::Body).ok_or_else(|| {
                VerbatimError::invalid_edit(format!("{} has no body", self.label(target)))
            })?,
            _ => {
                return Err(VerbatimError::invalid_edit(format!(
                    "{} cannot hold statements",
                    self.label(target)
                )));
            }
        };
        self.push(block, Property::Statements, statement)
    }

    /// Replace the modifier set of a class, field, method or parameter
    pub fn set_modifiers(&mut self, node: NodeId, modifiers: BTreeSet<Modifier>) -> Result<()> {
        self.set(node, Property::Modifiers, modifiers.into())
            .map(drop)
    }

    /// Set or clear the initializer of a variable declarator
    pub fn set_initializer(&mut self, variable: NodeId, initializer: Option<NodeId>) -> Result<()> {
        self.set(variable, Property::Initializer, initializer.into())
            .map(drop)
    }

    /// Give a named node a fresh `SimpleName`. Returns the replaced name node.
    pub fn rename(&mut self, node: NodeId, identifier: &str) -> Result<NodeId> {
        let name = self.new_simple_name(identifier);
        let old = self.set(node, Property::Name, name.into())?;
        old.as_node()
            .ok_or_else(|| VerbatimError::internal_error("name property held no node"))
    }

    /// Change the identifier text of a `SimpleName` in place
    pub fn set_identifier(&mut self, name: NodeId, identifier: &str) -> Result<()> {
        self.set(name, Property::Identifier, identifier.into())
            .map(drop)
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_type_spellings() {
        let mut ast = Ast::new();
        let void = ast.new_type("void").unwrap();
        let int = ast.new_type("int").unwrap();
        let string = ast.new_type("String").unwrap();
        assert_eq!(ast.kind(void), NodeKind::VoidType);
        assert_eq!(ast.kind(int), NodeKind::PrimitiveType);
        assert_eq!(ast.kind(string), NodeKind::ClassType);
        assert_eq!(ast.identifier(string), Some("String"));
        assert!(ast.new_type("int[]").is_err());
    }

    #[test]
    fn test_finders() {
        let mut ast = Ast::new();
        let class_name = ast.new_simple_name("A");
        let class = ast
            .new_class(BTreeSet::new(), class_name, Vec::new())
            .unwrap();
        let unit = ast.new_compilation_unit(vec![class]).unwrap();

        let field = ast.add_field(class, "int", "count").unwrap();
        let ret = ast.new_void_type();
        let name = ast.new_simple_name("run");
        let method = ast
            .new_method(BTreeSet::new(), ret, name, Vec::new(), None)
            .unwrap();
        ast.push(class, Property::Members, method).unwrap();

        assert_eq!(ast.class_by_name(unit, "A"), Some(class));
        assert_eq!(ast.class_by_name(unit, "B"), None);
        assert_eq!(ast.field_by_name(class, "count"), Some(field));
        assert_eq!(ast.methods_by_name(class, "run"), vec![method]);
    }

    #[test]
    fn test_rename_swaps_name_node() {
        let mut ast = Ast::new();
        let name = ast.new_simple_name("A");
        let class = ast.new_class(BTreeSet::new(), name, Vec::new()).unwrap();
        let old = ast.rename(class, "B").unwrap();
        assert_eq!(old, name);
        assert_eq!(ast.parent(old), None);
        assert_eq!(ast.identifier(class), Some("B"));
    }

    #[test]
    fn test_add_statement_requires_body() {
        let mut ast = Ast::new();
        let ret = ast.new_void_type();
        let name = ast.new_simple_name("run");
        let method = ast
            .new_method(BTreeSet::new(), ret, name, Vec::new(), None)
            .unwrap();
        let value = ast.new_integer("1");
        let stmt = ast.new_expression_stmt(value).unwrap();
        assert!(ast.add_statement(method, stmt).is_err());
    }
}
