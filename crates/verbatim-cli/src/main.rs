//! Verbatim CLI
//!
//! Command-line front end for lexical-preserving edits of Java-like sources

mod commands;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::error;

use commands::{EditOp, parse_add, parse_remove_param, parse_rename};

#[derive(Parser)]
#[command(name = "verbatim")]
#[command(about = "Edit syntax trees while keeping the original formatting")]
#[command(version = verbatim_core::VERSION)]
#[command(
    long_about = "verbatim records the exact source text of every syntax node and keeps it in\n\
step with tree edits, so untouched code prints back byte for byte.\n\
\n\
Examples:\n  \
verbatim check src/A.java                    # Verify every node round-trips\n  \
verbatim dump src/A.java --json              # Show the recorded text of each node\n  \
verbatim edit A.java --add-field A:int:count # Add a field, print the result"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        help = "Path to configuration file (verbatim.toml/verbatim.json)"
    )]
    config: Option<PathBuf>,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that every node of each file prints back to its source text
    Check {
        #[arg(required = true, help = "Source files to check")]
        files: Vec<PathBuf>,
    },

    /// Print the recorded text of every registered node
    Dump {
        #[arg(help = "Source file to dump")]
        file: PathBuf,

        #[arg(long, help = "Emit JSON instead of the human-readable listing")]
        json: bool,
    },

    /// Apply edits to a file and print the preserved result
    ///
    /// Edits run in the order: added fields, added parameters, removed
    /// parameters, renames.
    Edit {
        #[arg(help = "Source file to edit")]
        file: PathBuf,

        #[arg(
            long,
            value_name = "CLASS:TYPE:NAME",
            value_parser = parse_add,
            help = "Append a field to a class"
        )]
        add_field: Vec<(String, String, String)>,

        #[arg(
            long,
            value_name = "METHOD:TYPE:NAME",
            value_parser = parse_add,
            help = "Append a parameter to a method"
        )]
        add_param: Vec<(String, String, String)>,

        #[arg(
            long,
            value_name = "METHOD:INDEX",
            value_parser = parse_remove_param,
            help = "Remove a parameter by position"
        )]
        remove_param: Vec<(String, usize)>,

        #[arg(
            long,
            value_name = "OLD:NEW",
            value_parser = parse_rename,
            help = "Rename a class or method"
        )]
        rename: Vec<(String, String)>,

        #[arg(long, help = "Write the result back to the file instead of stdout")]
        write: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.no_color || std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    }
    verbatim_core::init_tracing(cli.verbose);

    if let Err(e) = run_command(cli) {
        error!("verbatim failed: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Check { files } => commands::check_command(&files, cli.config.as_deref()),
        Commands::Dump { file, json } => commands::dump_command(&file, json, cli.config.as_deref()),
        Commands::Edit {
            file,
            add_field,
            add_param,
            remove_param,
            rename,
            write,
        } => {
            let ops = add_field
                .into_iter()
                .map(|(class, ty, name)| EditOp::AddField { class, ty, name })
                .chain(
                    add_param
                        .into_iter()
                        .map(|(method, ty, name)| EditOp::AddParam { method, ty, name }),
                )
                .chain(
                    remove_param
                        .into_iter()
                        .map(|(method, index)| EditOp::RemoveParam { method, index }),
                )
                .chain(
                    rename
                        .into_iter()
                        .map(|(old, new)| EditOp::Rename { old, new }),
                )
                .collect::<Vec<_>>();
            commands::edit_command(&file, &ops, write, cli.config.as_deref())
        }
    }
}
