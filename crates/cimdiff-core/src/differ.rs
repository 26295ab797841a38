//! The `Differ` facade
//!
//! Bundles a schema registry, a configuration and the property introspector
//! caches behind the public diff/apply operations. Each operation logs
//! start, end and error events through the logging facility.
//!
//! ## Example
//!
//! ```
//! use cimdiff_core::{Differ, PropertyValue, Record, RecordSet};
//!
//! let differ = Differ::cim();
//! let previous = RecordSet::from_records(vec![
//!     Record::new("Substation", "123")
//!         .with("description", PropertyValue::text("A"))
//!         .with("name", PropertyValue::text("B")),
//! ])
//! .unwrap();
//! let next = RecordSet::from_records(vec![
//!     Record::new("Substation", "123")
//!         .with("description", PropertyValue::text("C"))
//!         .with("name", PropertyValue::text("B")),
//! ])
//! .unwrap();
//!
//! let changes = differ.get_diff(&previous, &next).unwrap();
//! assert_eq!(changes.len(), 1);
//!
//! let result = differ.apply_diff(&previous, &changes).unwrap();
//! assert_eq!(result, next);
//! ```

use std::sync::Arc;
use std::time::Instant;

use crate::apply::{apply_changes, invert, invert_all, ApplyReport};
use crate::changes::ChangeEntry;
use crate::config::DifferConfig;
use crate::diff::engine::compute_diff;
use crate::errors::Result;
use crate::introspect::PropertyIntrospector;
use crate::model::{Record, RecordSet};
use crate::schema::{cim, SchemaRegistry};
use crate::{log_op_end, log_op_error, log_op_start};

/// Differ - diff generator and patch applicator over one schema
///
/// `Differ` is `Send + Sync`; share it behind an `Arc` across threads. The
/// only shared mutable state is the introspector's append-only cache.
#[derive(Debug)]
pub struct Differ {
    schema: Arc<SchemaRegistry>,
    config: DifferConfig,
    introspector: PropertyIntrospector,
}

impl Differ {
    /// Differ over `schema` with the default configuration
    pub fn new(schema: Arc<SchemaRegistry>) -> Self {
        Self {
            schema,
            config: DifferConfig::default(),
            introspector: PropertyIntrospector::new(),
        }
    }

    /// Differ over the built-in CIM schema
    pub fn cim() -> Self {
        Self::new(Arc::new(cim::registry()))
    }

    /// Replace the configuration
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the configuration does not validate.
    pub fn with_config(mut self, config: DifferConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }

    pub fn config(&self) -> &DifferConfig {
        &self.config
    }

    pub fn introspector(&self) -> &PropertyIntrospector {
        &self.introspector
    }

    /// Compute the change sequence turning `previous` into `next`
    ///
    /// # Errors
    ///
    /// See [`compute_diff`].
    pub fn get_diff(&self, previous: &RecordSet, next: &RecordSet) -> Result<Vec<ChangeEntry>> {
        log_op_start!("get_diff", previous_len = previous.len(), next_len = next.len());
        let start = Instant::now();

        let changes = compute_diff(
            &self.schema,
            &self.introspector,
            &self.config,
            previous,
            next,
        )
        .map_err(|e| {
            log_op_error!(
                "get_diff",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        log_op_end!(
            "get_diff",
            duration_ms = start.elapsed().as_millis() as u64,
            changes_len = changes.len()
        );
        Ok(changes)
    }

    /// Build both record sets, then diff them
    ///
    /// # Errors
    ///
    /// Returns `DuplicateRecordId` before any diffing starts, otherwise as
    /// [`Differ::get_diff`].
    pub fn get_diff_from_records(
        &self,
        previous: impl IntoIterator<Item = Record>,
        next: impl IntoIterator<Item = Record>,
    ) -> Result<Vec<ChangeEntry>> {
        let previous = RecordSet::from_records(previous)?;
        let next = RecordSet::from_records(next)?;
        self.get_diff(&previous, &next)
    }

    /// Apply `changes` to a copy of `base`
    ///
    /// Entries skipped under the `skip_entry` policy are logged and dropped;
    /// use [`Differ::apply_diff_report`] to inspect them.
    ///
    /// # Errors
    ///
    /// See [`apply_changes`].
    pub fn apply_diff(&self, base: &RecordSet, changes: &[ChangeEntry]) -> Result<RecordSet> {
        self.apply_diff_report(base, changes)
            .map(|report| report.records)
    }

    /// Apply `changes` to a copy of `base`, reporting skipped entries
    ///
    /// # Errors
    ///
    /// See [`apply_changes`].
    pub fn apply_diff_report(
        &self,
        base: &RecordSet,
        changes: &[ChangeEntry],
    ) -> Result<ApplyReport> {
        self.logged_apply("apply_diff", base.clone(), changes)
    }

    /// Build the entry that undoes `entry`
    ///
    /// # Errors
    ///
    /// See [`invert`].
    pub fn invert(&self, entry: &ChangeEntry) -> Result<ChangeEntry> {
        invert(&self.schema, &self.introspector, entry)
    }

    /// Undo `changes` against `state`, the set they were applied to produce
    ///
    /// Applies the inverse of every entry, last entry first.
    ///
    /// # Errors
    ///
    /// `NotInvertible` if any entry lacks its reverse payload, otherwise as
    /// [`apply_changes`].
    pub fn undo(&self, state: &RecordSet, changes: &[ChangeEntry]) -> Result<RecordSet> {
        let inverses = invert_all(&self.schema, &self.introspector, changes).map_err(|e| {
            log_op_error!("undo", e.clone(), duration_ms = 0u64);
            e
        })?;
        self.logged_apply("undo", state.clone(), &inverses)
            .map(|report| report.records)
    }

    fn logged_apply(
        &self,
        op: &'static str,
        state: RecordSet,
        changes: &[ChangeEntry],
    ) -> Result<ApplyReport> {
        log_op_start!(op, previous_len = state.len(), changes_len = changes.len());
        let start = Instant::now();

        let report = apply_changes(
            &self.schema,
            &self.introspector,
            self.config.apply_failure,
            state,
            changes,
        )
        .map_err(|e| {
            log_op_error!(op, e.clone(), duration_ms = start.elapsed().as_millis() as u64);
            e
        })?;

        log_op_end!(
            op,
            duration_ms = start.elapsed().as_millis() as u64,
            next_len = report.records.len(),
            skipped = report.skipped.len()
        );
        Ok(report)
    }
}
