//! Subcommands and the file plumbing they share

pub mod apply;
pub mod diff;
pub mod summary;
pub mod undo;

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use cimdiff_core::codec::cson;
use cimdiff_core::{ChangeEntry, Differ, DifferConfig, RecordSet};

/// Differ over the CIM schema, configured from an optional TOML file
pub fn load_differ(config: Option<&Path>) -> Result<Differ, Box<dyn std::error::Error>> {
    let differ = Differ::cim();
    match config {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            Ok(differ.with_config(DifferConfig::from_toml_str(&text)?)?)
        }
        None => Ok(differ),
    }
}

/// Read a JSON Lines record file into a record set
pub fn read_records(differ: &Differ, path: &Path) -> Result<RecordSet, Box<dyn std::error::Error>> {
    let reader = BufReader::new(File::open(path)?);
    let records = cson::read_jsonl(differ.schema(), reader)
        .map_err(|e| format!("{}: {}", path.display(), e))?;
    tracing::debug!(path = %path.display(), records = records.len(), "read record file");
    Ok(RecordSet::from_records(records)?)
}

/// Read a JSON change file
pub fn read_changes(path: &Path) -> Result<Vec<ChangeEntry>, Box<dyn std::error::Error>> {
    let reader = BufReader::new(File::open(path)?);
    let changes: Vec<ChangeEntry> = serde_json::from_reader(reader)
        .map_err(|e| format!("{}: {}", path.display(), e))?;
    Ok(changes)
}

/// Write `text` to `output`, or to stdout when no path is given
pub fn write_text(output: Option<&PathBuf>, text: &str) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(path) => {
            std::fs::write(path, text)?;
            eprintln!("✓ Wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Write a record set as JSON Lines to `output` or stdout
pub fn write_records(
    differ: &Differ,
    records: &RecordSet,
    output: Option<&PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut buffer = Vec::new();
    cson::write_jsonl(differ.schema(), records.iter(), &mut buffer)?;
    write_text(output, &String::from_utf8(buffer)?)
}
