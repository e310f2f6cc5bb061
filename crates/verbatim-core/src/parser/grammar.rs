//! Recursive-descent parser over the token stream
//!
//! Every node gets the inclusive range of the tokens it was built from; the
//! compilation unit spans the whole buffer.

use std::collections::BTreeSet;

use super::Parsed;
use super::lexer::{Token, TokenKind};
use crate::Result;
use crate::ast::{Ast, Modifier, NodeId, PRIMITIVE_TYPES};
use crate::error::VerbatimError;
use crate::position::{Position, Range};

const RESERVED: [&str; 3] = ["class", "return", "void"];

/// A node together with the source extent it was parsed from.
///
/// For a parenthesized expression the extent includes the parentheses while
/// the node's own range does not.
#[derive(Debug, Clone, Copy)]
struct Spanned {
    id: NodeId,
    range: Range,
}

pub(super) fn parse_tokens(tokens: &[Token]) -> Result<Parsed> {
    let mut parser = Parser::new(tokens);
    let root = parser.parse_unit()?;
    Ok(Parsed {
        ast: parser.ast,
        root,
    })
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    ast: Ast,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            ast: Ast::new(),
        }
    }

    fn current(&self) -> &'a Token {
        // The lexer always terminates the stream with Eof
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn at_word(&self, word: &str) -> bool {
        let token = self.current();
        token.kind == TokenKind::Ident && token.text == word
    }

    fn bump(&mut self) -> &'a Token {
        let token = self.current();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<&'a Token> {
        if self.at(kind) {
            Ok(self.bump())
        } else {
            Err(self.error(format!("expected {what}")))
        }
    }

    fn expect_word(&mut self, word: &str) -> Result<&'a Token> {
        if self.at_word(word) {
            Ok(self.bump())
        } else {
            Err(self.error(format!("expected `{word}`")))
        }
    }

    fn error(&self, message: String) -> VerbatimError {
        let token = self.current();
        let found = match token.kind {
            TokenKind::Eof => "end of input".to_string(),
            _ => format!("`{}`", token.text),
        };
        VerbatimError::parse_error(
            format!("{message}, found {found}"),
            token.start.line,
            token.start.column,
        )
    }

    fn finish(&mut self, id: NodeId, begin: Position, end: Position) -> Spanned {
        let range = Range::new(begin, end);
        self.ast.set_range(id, range);
        Spanned { id, range }
    }

    fn parse_unit(&mut self) -> Result<NodeId> {
        let mut types = Vec::new();
        while !self.at(TokenKind::Eof) {
            let (modifiers, start) = self.parse_modifiers();
            if !self.at_word("class") {
                return Err(self.error("expected a class declaration".to_string()));
            }
            types.push(self.parse_class(modifiers, start)?.id);
        }
        let root = self.ast.new_compilation_unit(types)?;
        self.ast.set_range(root, Range::whole_buffer());
        tracing::debug!(nodes = self.ast.len(), "parsed compilation unit");
        Ok(root)
    }

    fn parse_modifiers(&mut self) -> (BTreeSet<Modifier>, Option<Position>) {
        let mut modifiers = BTreeSet::new();
        let mut start = None;
        while self.at(TokenKind::Ident) {
            let Some(modifier) = Modifier::from_keyword(&self.current().text) else {
                break;
            };
            let token = self.bump();
            start.get_or_insert(token.start);
            modifiers.insert(modifier);
        }
        (modifiers, start)
    }

    fn parse_class(
        &mut self,
        modifiers: BTreeSet<Modifier>,
        start: Option<Position>,
    ) -> Result<Spanned> {
        let keyword = self.expect_word("class")?;
        let name = self.parse_name()?;
        self.expect(TokenKind::LBrace, "`{`")?;
        let mut members = Vec::new();
        while !self.at(TokenKind::RBrace) {
            if self.at(TokenKind::Eof) {
                return Err(self.error("expected `}`".to_string()));
            }
            members.push(self.parse_member()?.id);
        }
        let close = self.bump();
        let id = self.ast.new_class(modifiers, name.id, members)?;
        Ok(self.finish(id, start.unwrap_or(keyword.start), close.end))
    }

    fn parse_member(&mut self) -> Result<Spanned> {
        let (modifiers, start) = self.parse_modifiers();
        if self.at_word("class") {
            return self.parse_class(modifiers, start);
        }
        let element_type = self.parse_type()?;
        let begin = start.unwrap_or(element_type.range.begin);
        let name = self.parse_name()?;

        if self.at(TokenKind::LParen) {
            return self.parse_method_rest(modifiers, begin, element_type, name);
        }

        let mut variables = vec![self.parse_variable_rest(name)?.id];
        while self.at(TokenKind::Comma) {
            self.bump();
            let name = self.parse_name()?;
            variables.push(self.parse_variable_rest(name)?.id);
        }
        let semi = self.expect(TokenKind::Semicolon, "`;`")?;
        let id = self.ast.new_field(modifiers, element_type.id, variables)?;
        Ok(self.finish(id, begin, semi.end))
    }

    fn parse_method_rest(
        &mut self,
        modifiers: BTreeSet<Modifier>,
        begin: Position,
        return_type: Spanned,
        name: Spanned,
    ) -> Result<Spanned> {
        self.expect(TokenKind::LParen, "`(`")?;
        let mut parameters = Vec::new();
        if !self.at(TokenKind::RParen) {
            loop {
                parameters.push(self.parse_parameter()?.id);
                if !self.at(TokenKind::Comma) {
                    break;
                }
                self.bump();
            }
        }
        self.expect(TokenKind::RParen, "`)` or `,`")?;

        let (body, end) = if self.at(TokenKind::LBrace) {
            let block = self.parse_block()?;
            (Some(block.id), block.range.end)
        } else {
            let semi = self.expect(TokenKind::Semicolon, "`{` or `;`")?;
            (None, semi.end)
        };

        let id = self
            .ast
            .new_method(modifiers, return_type.id, name.id, parameters, body)?;
        Ok(self.finish(id, begin, end))
    }

    fn parse_parameter(&mut self) -> Result<Spanned> {
        let (modifiers, start) = self.parse_modifiers();
        let param_type = self.parse_type()?;
        let name = self.parse_name()?;
        let id = self.ast.new_parameter(modifiers, param_type.id, name.id)?;
        Ok(self.finish(
            id,
            start.unwrap_or(param_type.range.begin),
            name.range.end,
        ))
    }

    fn parse_variable_rest(&mut self, name: Spanned) -> Result<Spanned> {
        let (initializer, end) = if self.at(TokenKind::Eq) {
            self.bump();
            let init = self.parse_expression()?;
            (Some(init.id), init.range.end)
        } else {
            (None, name.range.end)
        };
        let id = self.ast.new_variable(name.id, initializer)?;
        Ok(self.finish(id, name.range.begin, end))
    }

    fn parse_type(&mut self) -> Result<Spanned> {
        if !self.at(TokenKind::Ident) {
            return Err(self.error("expected a type".to_string()));
        }
        let token = self.current();
        let id = match token.text.as_str() {
            "void" => {
                self.bump();
                self.ast.new_void_type()
            }
            keyword if PRIMITIVE_TYPES.contains(&keyword) => {
                self.bump();
                self.ast.new_primitive_type(keyword)
            }
            _ => {
                let name = self.parse_name()?;
                self.ast.new_class_type(name.id)?
            }
        };
        Ok(self.finish(id, token.start, token.end))
    }

    fn parse_name(&mut self) -> Result<Spanned> {
        let token = self.current();
        let reserved = RESERVED.contains(&token.text.as_str())
            || PRIMITIVE_TYPES.contains(&token.text.as_str())
            || Modifier::from_keyword(&token.text).is_some();
        if token.kind != TokenKind::Ident || reserved {
            return Err(self.error("expected an identifier".to_string()));
        }
        self.bump();
        let id = self.ast.new_simple_name(&token.text);
        Ok(self.finish(id, token.start, token.end))
    }

    fn parse_block(&mut self) -> Result<Spanned> {
        let open = self.expect(TokenKind::LBrace, "`{`")?;
        let mut statements = Vec::new();
        while !self.at(TokenKind::RBrace) {
            if self.at(TokenKind::Eof) {
                return Err(self.error("expected `}`".to_string()));
            }
            statements.push(self.parse_statement()?.id);
        }
        let close = self.bump();
        let id = self.ast.new_block(statements)?;
        Ok(self.finish(id, open.start, close.end))
    }

    fn parse_statement(&mut self) -> Result<Spanned> {
        if self.at(TokenKind::LBrace) {
            return self.parse_block();
        }
        if self.at_word("return") {
            let keyword = self.bump();
            let expression = if self.at(TokenKind::Semicolon) {
                None
            } else {
                Some(self.parse_expression()?.id)
            };
            let semi = self.expect(TokenKind::Semicolon, "`;`")?;
            let id = self.ast.new_return(expression)?;
            return Ok(self.finish(id, keyword.start, semi.end));
        }
        let expression = self.parse_expression()?;
        let semi = self.expect(TokenKind::Semicolon, "`;`")?;
        let id = self.ast.new_expression_stmt(expression.id)?;
        Ok(self.finish(id, expression.range.begin, semi.end))
    }

    fn parse_expression(&mut self) -> Result<Spanned> {
        self.parse_binary(&[TokenKind::Plus, TokenKind::Minus], Self::parse_term)
    }

    fn parse_term(&mut self) -> Result<Spanned> {
        self.parse_binary(&[TokenKind::Star, TokenKind::Slash], Self::parse_atom)
    }

    /// Left-associative chain of `operand (op operand)*`
    fn parse_binary(
        &mut self,
        operators: &[TokenKind],
        operand: fn(&mut Self) -> Result<Spanned>,
    ) -> Result<Spanned> {
        let mut left = operand(self)?;
        while operators.contains(&self.current().kind) {
            let operator = self.bump();
            let right = operand(self)?;
            let id = self.ast.new_binary(left.id, &operator.text, right.id)?;
            left = self.finish(id, left.range.begin, right.range.end);
        }
        Ok(left)
    }

    fn parse_atom(&mut self) -> Result<Spanned> {
        let token = self.current();
        match token.kind {
            TokenKind::Integer => {
                self.bump();
                let id = self.ast.new_integer(&token.text);
                Ok(self.finish(id, token.start, token.end))
            }
            TokenKind::Char => {
                self.bump();
                let id = self.ast.new_char(&token.text);
                Ok(self.finish(id, token.start, token.end))
            }
            TokenKind::Ident => {
                let name = self.parse_name()?;
                let id = self.ast.new_name_expr(name.id)?;
                Ok(self.finish(id, name.range.begin, name.range.end))
            }
            TokenKind::LParen => {
                let open = self.bump();
                let inner = self.parse_expression()?;
                let close = self.expect(TokenKind::RParen, "`)`")?;
                Ok(Spanned {
                    id: inner.id,
                    range: Range::new(open.start, close.end),
                })
            }
            _ => Err(self.error("expected an expression".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse;
    use crate::ast::{NodeKind, Property};

    #[test]
    fn test_operator_precedence() {
        let parsed = parse("class A { int x = 1 + 2 * 3; }").unwrap();
        let ast = &parsed.ast;
        let class = ast.class_by_name(parsed.root, "A").unwrap();
        let field = ast.field_by_name(class, "x").unwrap();
        let var = ast.list(field, Property::Variables)[0];
        let init = ast.node(var, Property::Initializer).unwrap();
        assert_eq!(ast.scalar(init, Property::Operator), Some("+"));
        let right = ast.node(init, Property::Right).unwrap();
        assert_eq!(ast.kind(right), NodeKind::BinaryExpr);
        assert_eq!(ast.scalar(right, Property::Operator), Some("*"));
    }

    #[test]
    fn test_parenthesized_expression_keeps_inner_range() {
        let parsed = parse("class A { int x = (1 + 2) * 3; }").unwrap();
        let ast = &parsed.ast;
        let class = ast.class_by_name(parsed.root, "A").unwrap();
        let field = ast.field_by_name(class, "x").unwrap();
        let var = ast.list(field, Property::Variables)[0];
        let product = ast.node(var, Property::Initializer).unwrap();
        let sum = ast.node(product, Property::Left).unwrap();
        assert_eq!(ast.range(product).unwrap().begin.column, 19);
        assert_eq!(ast.range(sum).unwrap().begin.column, 20);
        assert_eq!(ast.range(sum).unwrap().end.column, 24);
    }

    #[test]
    fn test_rejects_reserved_names() {
        let err = parse("class int {}").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parse error: expected an identifier, found `int` at line 1, column 7"
        );
    }

    #[test]
    fn test_reports_unclosed_body() {
        let err = parse("class A {\n  void foo() {\n").unwrap_err();
        assert!(err.to_string().contains("found end of input"));
    }
}
