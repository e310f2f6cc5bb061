//! Verbatim Core
//!
//! Shared foundation of the verbatim lexical-preservation engine: the
//! observable syntax tree, the parser that fills it with source ranges,
//! source positions, printer configuration and the error types.

pub mod ast;
pub mod config;
pub mod error;
pub mod parser;
pub mod position;
pub mod result;

// Re-export commonly used types
pub use ast::{
    Ast, AstEvent, AstObserver, ListChange, Modifier, NodeId, NodeKind, Property, Shape, Value,
};
pub use config::{ConfigLoader, LineEnding, PrinterConfig};
pub use error::{ErrorKind, VerbatimError};
pub use parser::{Parsed, parse};
pub use position::{Position, Range};
pub use result::{Result, ResultExt};

/// Initialize the tracing subscriber for logging.
///
/// `verbose` raises the default level (0: info, 1: debug, 2+: trace);
/// `RUST_LOG` overrides it entirely.
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("verbatim={level}")));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
