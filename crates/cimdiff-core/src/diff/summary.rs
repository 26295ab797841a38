//! Human-readable summary of a change sequence.

use std::collections::BTreeMap;

use crate::changes::{Change, ChangeEntry};

/// Entry counts of a change sequence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffSummary {
    pub creations: usize,
    pub deletions: usize,
    pub modifications: usize,
    /// Total property modifications across all modification entries
    pub properties_changed: usize,
}

impl DiffSummary {
    pub fn of(changes: &[ChangeEntry]) -> Self {
        changes.iter().fold(Self::default(), |mut acc, entry| {
            match &entry.change {
                Change::ObjectCreation { .. } => acc.creations += 1,
                Change::ObjectDeletion => acc.deletions += 1,
                Change::ObjectModification { modifications } => {
                    acc.modifications += 1;
                    acc.properties_changed += modifications.len();
                }
            }
            acc
        })
    }

    pub fn is_empty(&self) -> bool {
        self.creations + self.deletions + self.modifications == 0
    }
}

/// Render a Markdown summary of a change sequence.
///
/// Informational only; lists counts and, per record type, the touched ids.
pub fn render_human_summary(changes: &[ChangeEntry]) -> String {
    let summary = DiffSummary::of(changes);
    let mut out = String::new();

    out.push_str("## Diff\n\n");
    if summary.is_empty() {
        out.push_str("_No changes._\n");
        return out;
    }

    out.push_str(&format!(
        "| Created | Deleted | Modified | Properties |\n\
         |---|---|---|---|\n\
         | {} | {} | {} | {} |\n\n",
        summary.creations, summary.deletions, summary.modifications, summary.properties_changed,
    ));

    let mut by_type: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for entry in changes {
        let line = match &entry.change {
            Change::ObjectCreation { .. } => format!("+ {}", entry.target.reference),
            Change::ObjectDeletion => format!("- {}", entry.target.reference),
            Change::ObjectModification { modifications } => format!(
                "~ {} ({})",
                entry.target.reference,
                modifications
                    .iter()
                    .map(|m| m.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        };
        by_type
            .entry(entry.target.reference_type.as_str())
            .or_default()
            .push(line);
    }

    for (record_type, lines) in by_type {
        out.push_str(&format!("### {}\n\n", record_type));
        for line in lines {
            out.push_str(&format!("- `{}`\n", line));
        }
        out.push('\n');
    }

    out
}
