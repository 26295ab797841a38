//! Undo command
//!
//! Usage: cimdiff undo <STATE> <CHANGES> [--output <FILE>] [--config <FILE>]

use clap::Args;
use std::path::PathBuf;

use super::{load_differ, read_changes, read_records, write_records};

#[derive(Debug, Args)]
pub struct UndoArgs {
    /// Snapshot the change file was applied to produce (JSON Lines)
    pub state: PathBuf,

    /// Change file to undo
    pub changes: PathBuf,

    /// Output file for the restored snapshot (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Engine configuration (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Execute undo command
pub fn execute(args: UndoArgs) -> Result<(), Box<dyn std::error::Error>> {
    let differ = load_differ(args.config.as_deref())?;
    let state = read_records(&differ, &args.state)?;
    let changes = read_changes(&args.changes)?;

    let restored = differ.undo(&state, &changes)?;
    write_records(&differ, &restored, args.output.as_ref())
}
