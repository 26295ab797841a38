//! Record set diff engine.
//!
//! Compares two snapshots of identified records and produces the ordered
//! change sequence that turns the first into the second.
//!
//! ## Entry point
//!
//! ```ignore
//! use cimdiff_core::diff::engine::compute_diff;
//!
//! let changes = compute_diff(&schema, &introspector, &config, &previous, &next)?;
//! let summary = cimdiff_core::diff::summary::render_human_summary(&changes);
//! ```
//!
//! ## Guarantees
//!
//! - **Grouping**: creations, deletions, replacements, modifications, in that order.
//! - **Stable order**: ascending record id within each group.
//! - **Empty diff**: identical snapshots produce no entries; a record with no
//!   differing property produces no entry.
//! - **Undo payloads**: every deletion and modification carries its reverse.

pub mod engine;
pub mod summary;

pub use engine::compute_diff;
pub use summary::{render_human_summary, DiffSummary};
