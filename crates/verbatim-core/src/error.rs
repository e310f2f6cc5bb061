//! Error types and handling for lexical-preservation operations

use std::path::PathBuf;
use thiserror::Error;

use crate::position::{Position, Range};

/// Main error type for parsing, tree mutation and preserved printing
#[derive(Debug, Error)]
pub enum VerbatimError {
    /// Syntax errors in the source handed to the parser
    #[error("Parse error: {message} at line {line}, column {column}")]
    ParseError {
        message: String,
        line: u32,
        column: u32,
    },

    /// A position or range does not fit the source buffer it was resolved against.
    /// Signals that the tree and the buffer handed to setup disagree.
    #[error("Malformed range {range}: {message}")]
    MalformedRange { range: String, message: String },

    /// A mutation has no entry in the edit rule tables
    #[error("Unsupported edit on {node}.{property}: {message}")]
    UnsupportedEdit {
        node: String,
        property: String,
        message: String,
    },

    /// An expected literal or accessor-derived anchor is missing from the current text
    #[error("Anchor {anchor} not found in text of {node}")]
    AnchorNotFound { anchor: String, node: String },

    /// A tree mutation that violates the node schema (wrong shape, attached child, bad index)
    #[error("Invalid edit: {message}")]
    InvalidEdit { message: String },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    MalformedRange,
    UnsupportedEdit,
    AnchorNotFound,
    InvalidEdit,
    Config,
    Io,
    Internal,
}

impl VerbatimError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            VerbatimError::ParseError { .. } => ErrorKind::Parse,
            VerbatimError::MalformedRange { .. } => ErrorKind::MalformedRange,
            VerbatimError::UnsupportedEdit { .. } => ErrorKind::UnsupportedEdit,
            VerbatimError::AnchorNotFound { .. } => ErrorKind::AnchorNotFound,
            VerbatimError::InvalidEdit { .. } => ErrorKind::InvalidEdit,
            VerbatimError::ConfigError { .. } => ErrorKind::Config,
            VerbatimError::IoError { .. } => ErrorKind::Io,
            VerbatimError::InternalError { .. } => ErrorKind::Internal,
        }
    }

    /// Check if this error is recoverable (can continue processing other files).
    ///
    /// Errors raised while translating an edit leave the preserved text out of
    /// sync with the tree, so they are never recoverable for that printer.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Parse | ErrorKind::Io | ErrorKind::InvalidEdit
        )
    }

    /// Create a parse error
    pub fn parse_error(message: impl Into<String>, line: u32, column: u32) -> Self {
        Self::ParseError {
            message: message.into(),
            line,
            column,
        }
    }

    /// Create a malformed range error for a single position
    pub fn malformed_position(position: Position, message: impl Into<String>) -> Self {
        Self::MalformedRange {
            range: position.to_string(),
            message: message.into(),
        }
    }

    /// Create a malformed range error
    pub fn malformed_range(range: Range, message: impl Into<String>) -> Self {
        Self::MalformedRange {
            range: range.to_string(),
            message: message.into(),
        }
    }

    /// Create an unsupported edit error
    pub fn unsupported_edit(
        node: impl Into<String>,
        property: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::UnsupportedEdit {
            node: node.into(),
            property: property.into(),
            message: message.into(),
        }
    }

    /// Create an anchor-not-found error
    pub fn anchor_not_found(anchor: impl Into<String>, node: impl Into<String>) -> Self {
        Self::AnchorNotFound {
            anchor: anchor.into(),
            node: node.into(),
        }
    }

    /// Create an invalid edit error
    pub fn invalid_edit(message: impl Into<String>) -> Self {
        Self::InvalidEdit {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Create an internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for VerbatimError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::new(),
            source: err,
        }
    }
}
