//! Verbatim Printer
//!
//! Lexical-preserving printing for [`verbatim_core`] syntax trees. After
//! [`LexicalPreservingPrinter::setup`], printing any node yields its original
//! source text (whitespace and comments included) with tree edits applied
//! in place; code nobody touched is reproduced exactly.
//!
//! The pieces:
//! - [`offset`]: line/column to byte offset resolution
//! - [`node_text`]: per-node text as literals and child references
//! - [`registry`]: the node-to-text side table, built at setup
//! - [`policy`]: where inserted and removed elements land
//! - [`observer`]: translation of tree events into text edits
//! - [`fallback`]: text templates for nodes created after setup

pub mod fallback;
pub mod node_text;
pub mod observer;
pub mod offset;
pub mod policy;
pub mod printer;
pub mod registry;

pub use node_text::{Boundary, NodeText, TextElement};
pub use observer::PreservingObserver;
pub use offset::{LineIndex, resolve, span_of};
pub use policy::{Anchor, Layout, Rule, Slot, Style};
pub use printer::LexicalPreservingPrinter;
pub use registry::{Registry, register_text};
