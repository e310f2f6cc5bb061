//! Printer configuration
//!
//! Controls the whitespace the preserving printer invents when it has to
//! synthesize layout for inserted nodes. Original text is never reformatted.
//!
//! ## Configuration Files
//!
//! - `verbatim.toml` - TOML
//! - `verbatim.json` - JSON
//!
//! When no explicit path is given, [`ConfigLoader`] searches from the start
//! directory upward until one of these files is found.
//!
//! ## Example
//!
//! ```toml
//! indent = "\t"
//! lineEnding = "auto"
//! ```

mod loader;

pub use loader::{CONFIG_FILE_NAMES, ConfigLoader};

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::error::VerbatimError;

/// Layout settings for synthesized text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct PrinterConfig {
    /// Indentation placed before a member or statement inserted on its own line
    pub indent: String,

    /// Line terminator used for inserted lines
    pub line_ending: LineEnding,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            indent: "    ".to_string(),
            line_ending: LineEnding::Auto,
        }
    }
}

impl PrinterConfig {
    /// Reject settings that would corrupt the printed source
    pub fn validate(&self) -> Result<()> {
        if !self.indent.chars().all(|c| c == ' ' || c == '\t') {
            return Err(VerbatimError::config_error(format!(
                "indent must consist of spaces and tabs, got {:?}",
                self.indent
            )));
        }
        Ok(())
    }

    /// The terminator to use for text inserted into `source`
    pub fn newline_for(&self, source: &str) -> &'static str {
        self.line_ending.resolve(source)
    }
}

/// Line terminator choice for inserted lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    Lf,
    CrLf,
    /// Reuse the first terminator found in the source, `\n` if there is none
    #[default]
    Auto,
}

impl LineEnding {
    pub fn resolve(self, source: &str) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
            LineEnding::Auto => detect_line_ending(source),
        }
    }
}

fn detect_line_ending(source: &str) -> &'static str {
    let bytes = source.as_bytes();
    match bytes.iter().position(|&b| b == b'\r' || b == b'\n') {
        Some(at) => match (bytes[at], bytes.get(at + 1)) {
            (b'\r', Some(b'\n')) => "\r\n",
            (b'\n', Some(b'\r')) => "\n\r",
            (b'\r', _) => "\r",
            _ => "\n",
        },
        None => "\n",
    }
}
