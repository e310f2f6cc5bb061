//! Parser for a small Java-like language
//!
//! Supported constructs: classes (including nested ones), fields with
//! initializers, methods with parameters and bodies, blocks, expression and
//! return statements, `+ - * /` expressions over integer and character
//! literals and names. Line and block comments are accepted anywhere
//! whitespace is.
//!
//! Every node receives an inclusive [`Range`](crate::position::Range); the
//! compilation unit is given [`Range::whole_buffer`](crate::position::Range::whole_buffer)
//! so that leading and trailing trivia belong to it.

mod grammar;
mod lexer;

pub use lexer::{Token, TokenKind, tokenize};

use crate::Result;
use crate::ast::{Ast, NodeId};

/// A parsed compilation unit
#[derive(Debug)]
pub struct Parsed {
    pub ast: Ast,
    /// The `CompilationUnit` node
    pub root: NodeId,
}

/// Parse a complete source buffer
pub fn parse(source: &str) -> Result<Parsed> {
    let tokens = tokenize(source)?;
    tracing::trace!(tokens = tokens.len(), "tokenized source");
    grammar::parse_tokens(&tokens)
}
