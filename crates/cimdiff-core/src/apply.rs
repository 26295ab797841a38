//! Patch applicator
//!
//! Folds a change sequence onto a base record set, entry by entry, in the
//! given order.
//!
//! ## Entry semantics
//!
//! - **Creation** inserts the carried record, overwriting any record at its id.
//! - **Deletion** removes the target; an absent target is a no-op.
//! - **Modification** rebuilds the target: every diff-relevant property is
//!   copied unchanged except the modified ones, which are decoded from their
//!   transport form. Companion flags are then derived from their properties.
//!
//! ## Failure policy
//!
//! Entries are validated before they touch the record set, so a failing entry
//! is never half-applied. Under [`ApplyFailurePolicy::FailFast`] the first
//! failure aborts the call; under [`ApplyFailurePolicy::SkipEntry`] the entry
//! is skipped and reported in [`ApplyReport::skipped`].

use cimdiff_core_types::ChangeId;

use crate::changes::{Change, ChangeEntry, PropertyModification};
use crate::codec::value::decode;
use crate::config::ApplyFailurePolicy;
use crate::diff::engine::snapshot;
use crate::errors::{DiffError, ExError, Result};
use crate::introspect::PropertyIntrospector;
use crate::model::{Record, RecordSet, TypedReference};
use crate::schema::{RecordType, SchemaRegistry};

/// A change entry that was skipped under [`ApplyFailurePolicy::SkipEntry`]
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedChange {
    pub change_id: ChangeId,
    pub target: TypedReference,
    pub error: DiffError,
}

/// Outcome of applying a change sequence
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyReport {
    /// The resulting record set
    pub records: RecordSet,
    /// Number of entries applied
    pub applied: usize,
    /// Entries skipped, in sequence order
    pub skipped: Vec<SkippedChange>,
}

/// Apply `changes` to `state`, returning the resulting set and a report
///
/// # Errors
///
/// Under [`ApplyFailurePolicy::FailFast`], the first entry error:
/// `MissingTarget`, `UnknownRecordType`, `UnknownProperty`,
/// `ValueKindMismatch`, `IdentifierNotModifiable` or `Decode`. Under
/// [`ApplyFailurePolicy::SkipEntry`] this function does not fail.
pub fn apply_changes(
    schema: &SchemaRegistry,
    introspector: &PropertyIntrospector,
    policy: ApplyFailurePolicy,
    mut state: RecordSet,
    changes: &[ChangeEntry],
) -> Result<ApplyReport> {
    let mut applied = 0;
    let mut skipped = Vec::new();

    for entry in changes {
        match apply_entry(schema, introspector, &mut state, entry) {
            Ok(()) => applied += 1,
            Err(error) => match policy {
                ApplyFailurePolicy::FailFast => return Err(error),
                ApplyFailurePolicy::SkipEntry => {
                    let ex: ExError = error.clone().into();
                    tracing::warn!(
                        change_id = %entry.id,
                        record_id = %entry.target.reference,
                        record_type = %entry.target.reference_type,
                        err.code = ex.code(),
                        "skipped change entry: {}",
                        error
                    );
                    skipped.push(SkippedChange {
                        change_id: entry.id.clone(),
                        target: entry.target.clone(),
                        error,
                    });
                }
            },
        }
    }

    Ok(ApplyReport {
        records: state,
        applied,
        skipped,
    })
}

fn apply_entry(
    schema: &SchemaRegistry,
    introspector: &PropertyIntrospector,
    state: &mut RecordSet,
    entry: &ChangeEntry,
) -> Result<()> {
    match &entry.change {
        Change::ObjectCreation { object } => {
            schema.check_record(object)?;
            state.insert(object.clone());
        }
        Change::ObjectDeletion => {
            if state.remove(&entry.target.reference).is_none() {
                tracing::debug!(record_id = %entry.target.reference, "deletion target already absent");
            }
        }
        Change::ObjectModification { modifications } => {
            let current = state
                .get(&entry.target.reference)
                .ok_or_else(|| DiffError::MissingTarget {
                    reference_type: entry.target.reference_type.clone(),
                    record_id: entry.target.reference.clone(),
                    change_id: entry.id.clone(),
                })?;
            let rebuilt = rebuild(schema, introspector, current, modifications)?;
            state.insert(rebuilt);
        }
    }
    Ok(())
}

/// Build the post-change record from `current` and a modification list
fn rebuild(
    schema: &SchemaRegistry,
    introspector: &PropertyIntrospector,
    current: &Record,
    modifications: &[PropertyModification],
) -> Result<Record> {
    let record_type = schema.record_type(&current.record_type)?;
    let names = introspector.properties_of(schema, &current.record_type)?;

    let mut next = Record::new(current.record_type.clone(), current.id.clone());
    for name in names
        .iter()
        .filter(|name| !modifications.iter().any(|m| &m.name == *name))
    {
        next.set(name.clone(), current.get(name).cloned());
    }

    write_modifications(schema, &record_type, &mut next, modifications)?;
    record_type.derive_companion_flags(&mut next);
    Ok(next)
}

/// Decode each modification into `record`
fn write_modifications(
    schema: &SchemaRegistry,
    record_type: &RecordType,
    record: &mut Record,
    modifications: &[PropertyModification],
) -> Result<()> {
    for modification in modifications {
        if modification.name == schema.id_property() {
            return Err(DiffError::IdentifierNotModifiable {
                record_type: record_type.name().to_string(),
                record_id: record.id.clone(),
                property: modification.name.clone(),
            });
        }
        let descriptor = record_type
            .property(&modification.name)
            .filter(|p| !p.excluded)
            .ok_or_else(|| DiffError::UnknownProperty {
                record_type: record_type.name().to_string(),
                property: modification.name.clone(),
            })?;
        let value = decode(record_type.name(), descriptor, modification)?;
        record.set(modification.name.clone(), value);
    }
    Ok(())
}

/// Build the entry that undoes `entry`
///
/// - creation becomes a deletion carrying a snapshot of the created record
/// - deletion becomes a creation of the record rebuilt from its snapshot
/// - modification swaps its forward and reverse lists
///
/// The inverse gets a fresh change id.
///
/// # Errors
///
/// Returns `NotInvertible` when a deletion or modification has no reverse
/// payload, and the decode and schema errors of rebuilding a deleted record.
pub fn invert(
    schema: &SchemaRegistry,
    introspector: &PropertyIntrospector,
    entry: &ChangeEntry,
) -> Result<ChangeEntry> {
    let not_invertible = |reason: &str| DiffError::NotInvertible {
        change_id: entry.id.clone(),
        reason: reason.to_string(),
    };

    match &entry.change {
        Change::ObjectCreation { object } => {
            let names = introspector.properties_of(schema, &object.record_type)?;
            Ok(ChangeEntry::deletion(
                entry.target.clone(),
                snapshot(&names, object),
            ))
        }
        Change::ObjectDeletion => {
            let snapshot = entry
                .reverse_modifications()
                .ok_or_else(|| not_invertible("deletion carries no snapshot"))?;
            let record_type = schema.record_type(&entry.target.reference_type)?;
            let mut record = Record::new(
                entry.target.reference_type.clone(),
                entry.target.reference.clone(),
            );
            write_modifications(schema, &record_type, &mut record, snapshot)?;
            record_type.derive_companion_flags(&mut record);
            Ok(ChangeEntry::creation(record))
        }
        Change::ObjectModification { modifications } => {
            let reverse = entry
                .reverse_modifications()
                .ok_or_else(|| not_invertible("modification carries no reverse list"))?;
            Ok(ChangeEntry::modification(
                entry.target.clone(),
                reverse.to_vec(),
                modifications.clone(),
            ))
        }
    }
}

/// Inverses of `changes`, in reverse order
///
/// # Errors
///
/// As [`invert`], for the first entry that cannot be inverted.
pub fn invert_all(
    schema: &SchemaRegistry,
    introspector: &PropertyIntrospector,
    changes: &[ChangeEntry],
) -> Result<Vec<ChangeEntry>> {
    changes
        .iter()
        .rev()
        .map(|entry| invert(schema, introspector, entry))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changes::TransportValue;
    use crate::model::PropertyValue;
    use crate::schema::cim;

    fn apply(state: Vec<Record>, changes: &[ChangeEntry]) -> Result<RecordSet> {
        let schema = cim::registry();
        let introspector = PropertyIntrospector::new();
        apply_changes(
            &schema,
            &introspector,
            ApplyFailurePolicy::FailFast,
            RecordSet::from_records(state)?,
            changes,
        )
        .map(|report| report.records)
    }

    #[test]
    fn test_modification_of_missing_target() {
        let entry = ChangeEntry::modification(
            TypedReference::new("Substation", "ghost"),
            vec![PropertyModification::text("name", "x")],
            vec![PropertyModification::null("name")],
        );
        let err = apply(vec![], std::slice::from_ref(&entry)).unwrap_err();
        assert_eq!(
            err,
            DiffError::MissingTarget {
                reference_type: "Substation".into(),
                record_id: "ghost".into(),
                change_id: entry.id.clone(),
            }
        );
        assert_eq!(
            err.to_string(),
            format!("Could not find Substation/ghost to apply change {} to", entry.id)
        );
    }

    #[test]
    fn test_deleting_absent_record_is_noop() {
        let entry = ChangeEntry::deletion(TypedReference::new("Terminal", "nope"), vec![]);
        let state = vec![Record::new("Terminal", "t1")];
        let result = apply(state, &[entry]).unwrap();
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_creation_overwrites() {
        let existing = Record::new("Terminal", "x").with("name", PropertyValue::text("old"));
        let replacement = Record::new("ConnectivityNode", "x");
        let result = apply(vec![existing], &[ChangeEntry::creation(replacement.clone())]).unwrap();
        assert_eq!(result.get("x"), Some(&replacement));
    }

    #[test]
    fn test_identifier_cannot_be_modified() {
        let entry = ChangeEntry::modification(
            TypedReference::new("Terminal", "t1"),
            vec![PropertyModification::text("mRID", "t2")],
            vec![PropertyModification::text("mRID", "t1")],
        );
        let err = apply(vec![Record::new("Terminal", "t1")], &[entry]).unwrap_err();
        assert!(matches!(err, DiffError::IdentifierNotModifiable { .. }));
    }

    #[test]
    fn test_companion_flag_cannot_be_modified_directly() {
        let entry = ChangeEntry::modification(
            TypedReference::new("PetersenCoil", "c"),
            vec![PropertyModification::text("aggregateSpecified", "true")],
            vec![PropertyModification::null("aggregateSpecified")],
        );
        let err = apply(vec![Record::new("PetersenCoil", "c")], &[entry]).unwrap_err();
        assert!(matches!(err, DiffError::UnknownProperty { property, .. } if property == "aggregateSpecified"));
    }

    #[test]
    fn test_modification_sets_companion_flag() {
        let entry = ChangeEntry::modification(
            TypedReference::new("PetersenCoil", "c"),
            vec![PropertyModification::text("aggregate", "true")],
            vec![PropertyModification::null("aggregate")],
        );
        let result = apply(vec![Record::new("PetersenCoil", "c")], &[entry]).unwrap();
        let coil = result.get("c").unwrap();
        assert_eq!(coil.get("aggregate"), Some(&PropertyValue::bool(true)));
        assert_eq!(coil.get("aggregateSpecified"), Some(&PropertyValue::bool(true)));
    }

    #[test]
    fn test_failed_entry_leaves_no_partial_record() {
        let schema = cim::registry();
        let introspector = PropertyIntrospector::new();
        let original = Record::new("ACLineSegment", "a").with("name", PropertyValue::text("A"));
        let entry = ChangeEntry::modification(
            TypedReference::new("ACLineSegment", "a"),
            vec![
                PropertyModification::text("name", "B"),
                PropertyModification::new("gch", Some(TransportValue::Text("1".into()))),
            ],
            vec![],
        );

        let report = apply_changes(
            &schema,
            &introspector,
            ApplyFailurePolicy::SkipEntry,
            RecordSet::from_records(vec![original.clone()]).unwrap(),
            &[entry],
        )
        .unwrap();
        assert_eq!(report.applied, 0);
        assert_eq!(report.skipped.len(), 1);
        assert!(matches!(report.skipped[0].error, DiffError::Decode { .. }));
        assert_eq!(report.records.get("a"), Some(&original));
    }

    #[test]
    fn test_invert_modification_swaps_lists() {
        let schema = cim::registry();
        let introspector = PropertyIntrospector::new();
        let forward = vec![PropertyModification::text("name", "B")];
        let reverse = vec![PropertyModification::text("name", "A")];
        let entry = ChangeEntry::modification(
            TypedReference::new("Substation", "s"),
            forward.clone(),
            reverse.clone(),
        );

        let inverse = invert(&schema, &introspector, &entry).unwrap();
        assert_ne!(inverse.id, entry.id);
        assert_eq!(inverse.modifications().unwrap(), reverse.as_slice());
        assert_eq!(inverse.reverse_modifications().unwrap(), forward.as_slice());
    }

    #[test]
    fn test_invert_without_reverse_is_error() {
        let schema = cim::registry();
        let introspector = PropertyIntrospector::new();
        let mut entry = ChangeEntry::deletion(TypedReference::new("Terminal", "t"), vec![]);
        entry.reverse_change = None;
        assert!(matches!(
            invert(&schema, &introspector, &entry),
            Err(DiffError::NotInvertible { .. })
        ));
    }

    #[test]
    fn test_invert_deletion_rebuilds_record() {
        let schema = cim::registry();
        let introspector = PropertyIntrospector::new();
        let coil = Record::new("PetersenCoil", "c")
            .with("aggregate", PropertyValue::bool(false))
            .with("aggregateSpecified", PropertyValue::bool(true))
            .with("name", PropertyValue::text("Coil"));
        let names = introspector.properties_of(&schema, "PetersenCoil").unwrap();
        let entry = ChangeEntry::deletion(
            TypedReference::new("PetersenCoil", "c"),
            snapshot(&names, &coil),
        );

        let inverse = invert(&schema, &introspector, &entry).unwrap();
        match inverse.change {
            Change::ObjectCreation { object } => assert_eq!(object, coil),
            other => panic!("unexpected change {:?}", other),
        }
    }
}
