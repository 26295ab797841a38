//! Diff command
//!
//! Usage: cimdiff diff <PREVIOUS> <NEXT> [--output <FILE>] [--config <FILE>]

use clap::Args;
use std::path::PathBuf;

use super::{load_differ, read_records, write_text};

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Previous snapshot (JSON Lines record file)
    pub previous: PathBuf,

    /// Next snapshot (JSON Lines record file)
    pub next: PathBuf,

    /// Output file for the change sequence (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Engine configuration (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Execute diff command
pub fn execute(args: DiffArgs) -> Result<(), Box<dyn std::error::Error>> {
    let differ = load_differ(args.config.as_deref())?;
    let previous = read_records(&differ, &args.previous)?;
    let next = read_records(&differ, &args.next)?;

    let changes = differ.get_diff(&previous, &next)?;

    let mut json = serde_json::to_string_pretty(&changes)?;
    json.push('\n');
    write_text(args.output.as_ref(), &json)
}
