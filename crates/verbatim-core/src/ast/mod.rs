//! Syntax tree for a small Java-like language
//!
//! The tree is stored in an arena and addressed by stable [`NodeId`] handles.
//! Every node kind exposes its complete property mapping through
//! [`Ast::properties`], so tooling can walk and edit nodes uniformly without
//! per-kind code:
//!
//! - `Node` / `Optional`: single child (required or not)
//! - `List`: ordered child collection
//! - `Scalar`: identifier, literal value or operator text
//! - `Modifiers`: set of declaration modifiers
//!
//! Mutations go through [`Ast::set`], [`Ast::insert`] and [`Ast::remove`] (or
//! the convenience helpers built on them) and are reported to every
//! registered [`AstObserver`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use verbatim_core::parser::parse;
//!
//! let parsed = parse("class A { void foo() {} }")?;
//! let mut ast = parsed.ast;
//! let class = ast.class_by_name(parsed.root, "A").unwrap();
//! let foo = ast.methods_by_name(class, "foo")[0];
//! ast.add_parameter(foo, "int", "x")?;
//! assert_eq!(ast.render(foo), "void foo(int x) {}");
//! ```

mod build;
mod event;
mod kind;
mod render;
mod tree;
mod value;

pub use event::{AstEvent, AstObserver, ListChange};
pub use kind::{Modifier, NodeKind, PRIMITIVE_TYPES, Property, Shape};
pub use tree::{Ast, NodeData, NodeId, raw_id};
pub use value::Value;
