//! cimdiff CLI
//!
//! Command-line interface for diffing and patching CIM record snapshots

use cimdiff_core::logging_facility::{init, Profile};
use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "cimdiff")]
#[command(about = "cimdiff - Diff and patch CIM record snapshots", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compute the change sequence between two record files
    Diff(commands::diff::DiffArgs),
    /// Apply a change file to a record file
    Apply(commands::apply::ApplyArgs),
    /// Undo a change file against the record file it produced
    Undo(commands::undo::UndoArgs),
    /// Print a Markdown summary of a change file
    Summary(commands::summary::SummaryArgs),
}

fn main() {
    let cli = Cli::parse();
    init(Profile::from_env().unwrap_or(Profile::Development));

    let result = match cli.command {
        Commands::Diff(args) => commands::diff::execute(args),
        Commands::Apply(args) => commands::apply::execute(args),
        Commands::Undo(args) => commands::undo::execute(args),
        Commands::Summary(args) => commands::summary::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
