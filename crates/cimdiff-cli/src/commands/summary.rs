//! Summary command
//!
//! Usage: cimdiff summary <CHANGES> [--output <FILE>]

use cimdiff_core::diff::render_human_summary;
use clap::Args;
use std::path::PathBuf;

use super::{read_changes, write_text};

#[derive(Debug, Args)]
pub struct SummaryArgs {
    /// Change file produced by `cimdiff diff`
    pub changes: PathBuf,

    /// Output file for the Markdown summary (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute summary command
pub fn execute(args: SummaryArgs) -> Result<(), Box<dyn std::error::Error>> {
    let changes = read_changes(&args.changes)?;
    write_text(args.output.as_ref(), &render_human_summary(&changes))
}
