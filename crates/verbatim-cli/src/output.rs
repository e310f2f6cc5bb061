//! Terminal reporting for the check command

use std::path::Path;

use colored::*;

/// Totals across all checked files
#[derive(Debug, Clone, Default)]
pub struct CheckSummary {
    pub files_checked: usize,
    pub nodes_checked: usize,
    pub failures: usize,
}

impl CheckSummary {
    pub fn has_failures(&self) -> bool {
        self.failures > 0
    }

    pub fn print(&self) {
        let status = if self.has_failures() {
            "FAILED".red().bold()
        } else {
            "ok".green().bold()
        };
        println!(
            "\n{status}: {} files, {} nodes checked, {} failed",
            self.files_checked, self.nodes_checked, self.failures
        );
    }
}

/// One line per file, followed by every node that did not round-trip
pub fn print_file_result(path: &Path, nodes: usize, mismatches: &[String]) {
    if mismatches.is_empty() {
        println!("{} {} ({nodes} nodes)", "✓".green(), path.display());
        return;
    }
    println!(
        "{} {} ({} of {nodes} nodes differ)",
        "✗".red(),
        path.display(),
        mismatches.len()
    );
    for mismatch in mismatches {
        println!("    {}", mismatch.dimmed());
    }
}
