//! Apply command
//!
//! Usage: cimdiff apply <BASE> <CHANGES> [--output <FILE>] [--config <FILE>]

use clap::Args;
use std::path::PathBuf;

use super::{load_differ, read_changes, read_records, write_records};

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Base snapshot (JSON Lines record file)
    pub base: PathBuf,

    /// Change file produced by `cimdiff diff`
    pub changes: PathBuf,

    /// Output file for the resulting snapshot (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Engine configuration (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Execute apply command
pub fn execute(args: ApplyArgs) -> Result<(), Box<dyn std::error::Error>> {
    let differ = load_differ(args.config.as_deref())?;
    let base = read_records(&differ, &args.base)?;
    let changes = read_changes(&args.changes)?;

    let report = differ.apply_diff_report(&base, &changes)?;
    for skipped in &report.skipped {
        eprintln!(
            "Skipped change {} on {}: {}",
            skipped.change_id, skipped.target, skipped.error
        );
    }

    write_records(&differ, &report.records, args.output.as_ref())
}
