//! Per-node preserved text
//!
//! A [`NodeText`] is the source text of one node split into literal runs and
//! references to the node's direct children. Literals carry everything that
//! is not a child: keywords, punctuation, whitespace and comments. Expanding
//! the references recursively reproduces the node's source.

use std::fmt::{self, Write};
use std::ops;

use verbatim_core::ast::{Ast, NodeId};

/// One run of a node's text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextElement {
    /// Verbatim text owned by the node itself
    Literal(String),
    /// Placeholder for a direct child's own text
    Child(NodeId),
}

impl TextElement {
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            TextElement::Literal(text) => Some(text),
            TextElement::Child(_) => None,
        }
    }

    pub fn as_child(&self) -> Option<NodeId> {
        match self {
            TextElement::Child(id) => Some(*id),
            TextElement::Literal(_) => None,
        }
    }
}

/// One end of a stretch of text to delete with [`NodeText::remove_text_between`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary<'a> {
    Child(NodeId),
    Token(&'a str),
}

/// Ordered text elements of a single node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeText {
    elements: Vec<TextElement>,
}

impl NodeText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_elements(elements: Vec<TextElement>) -> Self {
        Self { elements }
    }

    pub fn elements(&self) -> &[TextElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn push(&mut self, element: TextElement) {
        self.elements.push(element);
    }

    /// Append literal text, extending a trailing literal if there is one
    pub fn push_literal(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.elements.last_mut() {
            Some(TextElement::Literal(last)) => last.push_str(text),
            _ => self.elements.push(TextElement::Literal(text.to_string())),
        }
    }

    pub fn push_child(&mut self, child: NodeId) {
        self.elements.push(TextElement::Child(child));
    }

    pub fn insert(&mut self, index: usize, element: TextElement) {
        self.elements.insert(index, element);
    }

    pub fn replace(&mut self, index: usize, element: TextElement) -> TextElement {
        std::mem::replace(&mut self.elements[index], element)
    }

    pub fn remove(&mut self, index: usize) -> TextElement {
        self.elements.remove(index)
    }

    /// Child ids in text order
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.elements.iter().filter_map(TextElement::as_child)
    }

    pub fn find_child(&self, child: NodeId) -> Option<usize> {
        self.elements
            .iter()
            .position(|element| element.as_child() == Some(child))
    }

    /// Drop the reference to `child`, returning where it was
    pub fn remove_child(&mut self, child: NodeId) -> Option<usize> {
        let index = self.find_child(child)?;
        self.elements.remove(index);
        Some(index)
    }

    /// Point the reference to `old` at `new` instead
    pub fn replace_child(&mut self, old: NodeId, new: NodeId) -> bool {
        match self.find_child(old) {
            Some(index) => {
                self.elements[index] = TextElement::Child(new);
                true
            }
            None => false,
        }
    }

    /// Insert literal text at `index`, extending the literal just before it
    /// when there is one. Returns the index right after the inserted text.
    pub fn insert_literal(&mut self, index: usize, text: &str) -> usize {
        if text.is_empty() {
            return index;
        }
        if index > 0
            && let Some(TextElement::Literal(previous)) = self.elements.get_mut(index - 1)
        {
            previous.push_str(text);
            return index;
        }
        self.elements
            .insert(index, TextElement::Literal(text.to_string()));
        index + 1
    }

    /// Split the literal at `index` at byte offset `at`. Returns the element
    /// index at which text placed between the two halves belongs.
    pub fn split_literal(&mut self, index: usize, at: usize) -> usize {
        let Some(TextElement::Literal(text)) = self.elements.get_mut(index) else {
            return index;
        };
        if at == 0 {
            return index;
        }
        if at >= text.len() {
            return index + 1;
        }
        let tail = text.split_off(at);
        self.elements.insert(index + 1, TextElement::Literal(tail));
        index + 1
    }

    /// First literal at or after element `from` containing `token` outside a
    /// comment, as (element index, byte offset within the literal)
    pub fn find_literal_from(&self, from: usize, token: &str) -> Option<(usize, usize)> {
        self.elements
            .iter()
            .enumerate()
            .skip(from)
            .find_map(|(index, element)| {
                element
                    .as_literal()
                    .and_then(|text| code_matches(text, token).next())
                    .map(|offset| (index, offset))
            })
    }

    pub fn find_literal(&self, token: &str) -> Option<(usize, usize)> {
        self.find_literal_from(0, token)
    }

    /// Insert text before everything else
    pub fn prepend_literal(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.elements.first_mut() {
            Some(TextElement::Literal(first)) => first.insert_str(0, text),
            _ => self
                .elements
                .insert(0, TextElement::Literal(text.to_string())),
        }
    }

    /// Delete the first whole-word occurrence of `word` in the literals
    /// preceding the first child, along with the whitespace following it.
    /// Comments are never matched.
    pub fn remove_keyword(&mut self, word: &str) -> bool {
        for index in 0..self.elements.len() {
            let TextElement::Literal(text) = &mut self.elements[index] else {
                return false;
            };
            let Some(start) = find_word(text, word) else {
                continue;
            };
            let after = start + word.len();
            let trailing = text[after..].len() - text[after..].trim_start().len();
            text.replace_range(start..after + trailing, "");
            if text.is_empty() {
                self.elements.remove(index);
            }
            return true;
        }
        false
    }

    /// Rewrite the first occurrence of `old` outside comments to `new`
    pub fn replace_token(&mut self, old: &str, new: &str) -> bool {
        self.replace_token_in(0..self.elements.len(), old, new)
    }

    /// Rewrite `old` to `new` in the literals strictly between the references
    /// to `first` and `second`, e.g. the operator between two operands
    pub fn replace_token_between(
        &mut self,
        first: NodeId,
        second: NodeId,
        old: &str,
        new: &str,
    ) -> bool {
        match (self.find_child(first), self.find_child(second)) {
            (Some(start), Some(end)) if start < end => {
                self.replace_token_in(start + 1..end, old, new)
            }
            _ => false,
        }
    }

    fn replace_token_in(&mut self, elements: ops::Range<usize>, old: &str, new: &str) -> bool {
        if old.is_empty() {
            return false;
        }
        for element in &mut self.elements[elements] {
            let TextElement::Literal(text) = element else {
                continue;
            };
            let Some(start) = code_matches(text, old).next() else {
                continue;
            };
            text.replace_range(start..start + old.len(), new);
            return true;
        }
        false
    }

    /// Delete the text between two boundaries.
    ///
    /// Supported pairs:
    /// - `(Child(c), Token(t))`: everything after `c` up to and including the
    ///   first `t`, plus following whitespace when `consume_whitespace` is set
    /// - `(Token(t), Child(c))`: everything from the last `t` before `c` up to
    ///   `c`, plus preceding whitespace when `consume_whitespace` is set
    ///
    /// The child references themselves are kept. Returns `false`, leaving the
    /// text untouched, when the pair is unsupported or a boundary is missing,
    /// or when another child lies in between.
    pub fn remove_text_between(
        &mut self,
        from: Boundary<'_>,
        to: Boundary<'_>,
        consume_whitespace: bool,
    ) -> bool {
        match (from, to) {
            (Boundary::Child(child), Boundary::Token(token)) => {
                self.remove_through_token(child, token, consume_whitespace)
            }
            (Boundary::Token(token), Boundary::Child(child)) => {
                self.remove_back_to_token(token, child, consume_whitespace)
            }
            _ => false,
        }
    }

    fn remove_through_token(&mut self, child: NodeId, token: &str, consume_ws: bool) -> bool {
        let Some(anchor) = self.find_child(child) else {
            return false;
        };
        let mut found = None;
        for index in anchor + 1..self.elements.len() {
            match &self.elements[index] {
                TextElement::Child(_) => return false,
                TextElement::Literal(text) => {
                    if let Some(offset) = code_matches(text, token).next() {
                        found = Some((index, offset));
                        break;
                    }
                }
            }
        }
        let Some((index, offset)) = found else {
            return false;
        };

        if let TextElement::Literal(text) = &mut self.elements[index] {
            let mut cut = offset + token.len();
            if consume_ws {
                cut = text.len() - text[cut..].trim_start().len();
            }
            text.replace_range(..cut, "");
        }
        self.elements.drain(anchor + 1..index);
        self.drop_empty_literal(anchor + 1);
        true
    }

    fn remove_back_to_token(&mut self, token: &str, child: NodeId, consume_ws: bool) -> bool {
        let Some(anchor) = self.find_child(child) else {
            return false;
        };
        let mut found = None;
        for index in (0..anchor).rev() {
            match &self.elements[index] {
                TextElement::Child(_) => return false,
                TextElement::Literal(text) => {
                    if let Some(offset) = code_matches(text, token).last() {
                        found = Some((index, offset));
                        break;
                    }
                }
            }
        }
        let Some((index, offset)) = found else {
            return false;
        };

        if let TextElement::Literal(text) = &mut self.elements[index] {
            text.truncate(offset);
            if consume_ws {
                let kept = text.trim_end().len();
                text.truncate(kept);
            }
        }
        self.elements.drain(index + 1..anchor);
        self.drop_empty_literal(index);
        true
    }

    fn drop_empty_literal(&mut self, index: usize) {
        if matches!(self.elements.get(index), Some(TextElement::Literal(text)) if text.is_empty()) {
            self.elements.remove(index);
        }
    }

    /// Compact description for diagnostics and snapshots, e.g.
    /// `"class " [SimpleName#1] " {}"`
    pub fn describe(&self, ast: &Ast) -> String {
        let mut out = String::new();
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            let _ = match element {
                TextElement::Literal(text) => write!(out, "{text:?}"),
                TextElement::Child(id) => write!(out, "[{}]", ast.label(*id)),
            };
        }
        out
    }
}

impl fmt::Display for NodeText {
    /// Literals verbatim, children as `{n}` placeholders
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for element in &self.elements {
            match element {
                TextElement::Literal(text) => f.write_str(text)?,
                TextElement::Child(id) => write!(f, "{{{}}}", verbatim_core::ast::raw_id(*id))?,
            }
        }
        Ok(())
    }
}

/// Byte offset of `word` in `text` where it is not part of a longer identifier
/// Byte ranges of the `//` and `/* */` comments in a literal. An unclosed
/// comment runs to the end of the literal.
fn comment_spans(text: &str) -> Vec<ops::Range<usize>> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut i = 0;
    while i + 1 < bytes.len() {
        let end = match &bytes[i..i + 2] {
            b"//" => text[i..].find(['\n', '\r']).map_or(text.len(), |n| i + n),
            b"/*" => text[i + 2..].find("*/").map_or(text.len(), |n| i + n + 4),
            _ => {
                i += 1;
                continue;
            }
        };
        spans.push(i..end);
        i = end;
    }
    spans
}

/// Offsets of `token` in `text` that do not touch a comment, in order
fn code_matches<'a>(text: &'a str, token: &'a str) -> impl Iterator<Item = usize> + 'a {
    let comments = comment_spans(text);
    text.match_indices(token)
        .map(|(start, _)| start)
        .filter(move |&start| {
            let end = start + token.len();
            !comments
                .iter()
                .any(|comment| comment.start < end.max(start + 1) && start < comment.end)
        })
}

fn find_word(text: &str, word: &str) -> Option<usize> {
    let is_ident = |c: char| c.is_alphanumeric() || c == '_' || c == '$';
    code_matches(text, word).find(|&start| {
        let before = text[..start].chars().next_back();
        let after = text[start + word.len()..].chars().next();
        !before.is_some_and(is_ident) && !after.is_some_and(is_ident)
    })
}
