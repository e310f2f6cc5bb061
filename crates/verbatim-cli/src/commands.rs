//! CLI command implementations

use std::fs;
use std::path::Path;

use anyhow::{Context, bail};
use serde_json::json;
use tracing::{debug, info};
use verbatim_core::ast::{Ast, NodeId, Property, raw_id};
use verbatim_core::{ConfigLoader, PrinterConfig, ResultExt, VerbatimError, parse};
use verbatim_printer::{LexicalPreservingPrinter, LineIndex, TextElement};

use crate::output::{CheckSummary, print_file_result};

/// One scripted tree edit requested on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    AddField {
        class: String,
        ty: String,
        name: String,
    },
    AddParam {
        method: String,
        ty: String,
        name: String,
    },
    RemoveParam {
        method: String,
        index: usize,
    },
    Rename {
        old: String,
        new: String,
    },
}

/// Parse `OWNER:TYPE:NAME`
pub fn parse_add(s: &str) -> Result<(String, String, String), String> {
    let parts: Vec<&str> = s.splitn(3, ':').collect();
    match parts.as_slice() {
        [owner, ty, name] if !owner.is_empty() && !ty.is_empty() && !name.is_empty() => {
            Ok((owner.to_string(), ty.to_string(), name.to_string()))
        }
        _ => Err(format!("Invalid value '{s}'. Expected 'OWNER:TYPE:NAME'")),
    }
}

/// Parse `METHOD:INDEX`
pub fn parse_remove_param(s: &str) -> Result<(String, usize), String> {
    let (method, index) = s
        .rsplit_once(':')
        .ok_or_else(|| format!("Invalid value '{s}'. Expected 'METHOD:INDEX'"))?;
    let index = index
        .parse()
        .map_err(|_| format!("Invalid parameter index '{index}'"))?;
    Ok((method.to_string(), index))
}

/// Parse `OLD:NEW`
pub fn parse_rename(s: &str) -> Result<(String, String), String> {
    match s.split_once(':') {
        Some((old, new)) if !old.is_empty() && !new.is_empty() => {
            Ok((old.to_string(), new.to_string()))
        }
        _ => Err(format!("Invalid value '{s}'. Expected 'OLD:NEW'")),
    }
}

/// A parsed file with a printer set up on its whole tree
struct Session {
    source: String,
    ast: Ast,
    root: NodeId,
    printer: LexicalPreservingPrinter,
}

impl Session {
    fn open(path: &Path, config_path: Option<&Path>) -> verbatim_core::Result<Self> {
        let source = fs::read_to_string(path).map_err(|e| VerbatimError::io_error(path, e))?;
        let config = load_config(path, config_path)?;
        let parsed = parse(&source)?;
        let mut ast = parsed.ast;
        let printer =
            LexicalPreservingPrinter::setup_with_config(&mut ast, parsed.root, &source, &config)?;
        debug!(
            "Opened {} with {} registered nodes",
            path.display(),
            printer.registered_nodes().len()
        );
        Ok(Self {
            source,
            ast,
            root: parsed.root,
            printer,
        })
    }

    fn classes(&self) -> &[NodeId] {
        self.ast.list(self.root, Property::Types)
    }

    fn class(&self, name: &str) -> anyhow::Result<NodeId> {
        self.ast
            .class_by_name(self.root, name)
            .with_context(|| format!("no class named `{name}`"))
    }

    /// Resolve `method` or `Class.method` to the first matching declaration
    fn method(&self, target: &str) -> anyhow::Result<NodeId> {
        let found = match target.split_once('.') {
            Some((class, method)) => self
                .ast
                .methods_by_name(self.class(class)?, method)
                .first()
                .copied(),
            None => self
                .classes()
                .iter()
                .find_map(|&class| self.ast.methods_by_name(class, target).first().copied()),
        };
        found.with_context(|| format!("no method named `{target}`"))
    }

    fn apply(&mut self, op: &EditOp) -> anyhow::Result<()> {
        match op {
            EditOp::AddField { class, ty, name } => {
                let class = self.class(class)?;
                self.ast.add_field(class, ty, name)?;
            }
            EditOp::AddParam { method, ty, name } => {
                let method = self.method(method)?;
                self.ast.add_parameter(method, ty, name)?;
            }
            EditOp::RemoveParam { method, index } => {
                let method = self.method(method)?;
                self.ast.remove(method, Property::Parameters, *index)?;
            }
            EditOp::Rename { old, new } => {
                let target = match self.class(old) {
                    Ok(class) => class,
                    Err(_) => self
                        .method(old)
                        .with_context(|| format!("nothing named `{old}` to rename"))?,
                };
                self.ast.rename(target, new)?;
            }
        }
        debug!("Applied {op:?}");
        Ok(())
    }
}

fn load_config(path: &Path, config_path: Option<&Path>) -> verbatim_core::Result<PrinterConfig> {
    let start_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    ConfigLoader::load(config_path, Some(start_dir))
}

/// Nodes whose printed text differs from their source span
fn check_file(path: &Path, config_path: Option<&Path>) -> verbatim_core::Result<(usize, Vec<String>)> {
    let session = Session::open(path, config_path)?;
    let index = LineIndex::new(&session.source);

    let nodes = session.printer.registered_nodes();
    let mut mismatches = Vec::new();
    for &node in &nodes {
        let Some(range) = session.ast.range(node) else {
            continue;
        };
        let expected = &session.source[index.span(range)?];
        if session.printer.print(&session.ast, node) != expected {
            mismatches.push(format!("{} at {range}", session.ast.label(node)));
        }
    }
    Ok((nodes.len(), mismatches))
}

/// Check command implementation
pub fn check_command(files: &[std::path::PathBuf], config_path: Option<&Path>) -> anyhow::Result<()> {
    let mut summary = CheckSummary::default();

    for file in files {
        summary.files_checked += 1;
        match check_file(file, config_path).log_and_continue() {
            Some((nodes, mismatches)) => {
                summary.nodes_checked += nodes;
                print_file_result(file, nodes, &mismatches);
                if !mismatches.is_empty() {
                    summary.failures += 1;
                }
            }
            None => summary.failures += 1,
        }
    }

    summary.print();
    if summary.has_failures() {
        bail!("{} of {} files failed the round-trip check", summary.failures, summary.files_checked);
    }
    Ok(())
}

/// Dump command implementation
pub fn dump_command(file: &Path, as_json: bool, config_path: Option<&Path>) -> anyhow::Result<()> {
    let session = Session::open(file, config_path)
        .with_context(|| format!("failed to set up {}", file.display()))?;
    let ast = &session.ast;

    if as_json {
        let nodes: Vec<_> = session
            .printer
            .registered_nodes()
            .into_iter()
            .filter_map(|node| {
                let text = session.printer.text_for(node)?;
                let elements: Vec<_> = text
                    .elements()
                    .iter()
                    .map(|element| match element {
                        TextElement::Literal(literal) => json!({ "literal": literal }),
                        TextElement::Child(child) => json!({ "child": raw_id(*child) }),
                    })
                    .collect();
                Some(json!({
                    "id": raw_id(node),
                    "kind": ast.kind(node).to_string(),
                    "range": ast.range(node).map(|range| range.to_string()),
                    "elements": elements,
                }))
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&nodes)?);
    } else {
        for node in session.printer.registered_nodes() {
            if let Some(text) = session.printer.text_for(node) {
                println!("{}: {}", ast.label(node), text.describe(ast));
            }
        }
    }
    Ok(())
}

/// Edit command implementation
pub fn edit_command(
    file: &Path,
    ops: &[EditOp],
    write: bool,
    config_path: Option<&Path>,
) -> anyhow::Result<()> {
    let mut session = Session::open(file, config_path)
        .with_context(|| format!("failed to set up {}", file.display()))?;
    for op in ops {
        session
            .apply(op)
            .with_context(|| format!("failed to apply {op:?}"))?;
    }

    let result = session.printer.print(&session.ast, session.root);
    if write {
        fs::write(file, &result).map_err(|e| VerbatimError::io_error(file, e))?;
        info!("Wrote {} edits to {}", ops.len(), file.display());
    } else {
        print!("{result}");
    }
    Ok(())
}
