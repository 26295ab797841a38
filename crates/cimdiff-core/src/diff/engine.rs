//! Diff computation engine.
//!
//! The entry point is [`compute_diff`], which classifies records of two
//! snapshots into created, deleted and modified ones and emits one change
//! entry per affected record.

use crate::changes::{ChangeEntry, PropertyModification};
use crate::codec::value::encode;
use crate::config::{DifferConfig, TypeMismatchPolicy};
use crate::equality::EqualityOracle;
use crate::errors::{DiffError, Result};
use crate::introspect::PropertyIntrospector;
use crate::model::{Record, RecordSet, TypedReference};
use crate::schema::SchemaRegistry;

/// Compute the ordered change sequence turning `previous` into `next`.
///
/// Entries are grouped: creations, then deletions, then replacements (a
/// deletion immediately followed by a creation, only under
/// [`TypeMismatchPolicy::Replace`]), then modifications. Within each group
/// entries follow ascending record id.
///
/// # Errors
///
/// - `UnknownRecordType` / `UnknownProperty` / `ValueKindMismatch` /
///   `IdentifierNotModifiable`: a record does not fit the schema
/// - `TypeMismatch`: a record changed type and the policy is
///   [`TypeMismatchPolicy::Error`]
pub fn compute_diff(
    schema: &SchemaRegistry,
    introspector: &PropertyIntrospector,
    config: &DifferConfig,
    previous: &RecordSet,
    next: &RecordSet,
) -> Result<Vec<ChangeEntry>> {
    for record in previous.iter().chain(next.iter()) {
        schema.check_record(record)?;
    }

    let oracle = EqualityOracle::new(config.quantity_comparison);

    let mut creations = Vec::new();
    let mut deletions = Vec::new();
    let mut replacements = Vec::new();
    let mut modifications = Vec::new();

    for record in next.iter().filter(|r| !previous.contains(&r.id)) {
        tracing::debug!(record_id = %record.id, record_type = %record.record_type, "created");
        creations.push(ChangeEntry::creation(record.clone()));
    }

    for record in previous.iter().filter(|r| !next.contains(&r.id)) {
        tracing::debug!(record_id = %record.id, record_type = %record.record_type, "deleted");
        deletions.push(deletion_of(schema, introspector, record)?);
    }

    for previous_record in previous.iter() {
        let Some(next_record) = next.get(&previous_record.id) else {
            continue;
        };

        if previous_record.record_type != next_record.record_type {
            match config.type_mismatch {
                TypeMismatchPolicy::Error => {
                    return Err(DiffError::TypeMismatch {
                        record_id: previous_record.id.clone(),
                        previous_type: previous_record.record_type.clone(),
                        next_type: next_record.record_type.clone(),
                    });
                }
                TypeMismatchPolicy::Replace => {
                    tracing::debug!(
                        record_id = %previous_record.id,
                        previous_type = %previous_record.record_type,
                        next_type = %next_record.record_type,
                        "replaced"
                    );
                    replacements.push(deletion_of(schema, introspector, previous_record)?);
                    replacements.push(ChangeEntry::creation(next_record.clone()));
                    continue;
                }
            }
        }

        let names = introspector.properties_of(schema, &next_record.record_type)?;
        if let Some(entry) = modification_of(&oracle, &names, previous_record, next_record) {
            tracing::debug!(
                record_id = %next_record.id,
                record_type = %next_record.record_type,
                properties = entry.modifications().map_or(0, |m| m.len()),
                "modified"
            );
            modifications.push(entry);
        }
    }

    let mut changes = creations;
    changes.append(&mut deletions);
    changes.append(&mut replacements);
    changes.append(&mut modifications);
    Ok(changes)
}

/// Deletion entry whose reverse payload snapshots every diff-relevant
/// property of the removed record, nulls included
fn deletion_of(
    schema: &SchemaRegistry,
    introspector: &PropertyIntrospector,
    record: &Record,
) -> Result<ChangeEntry> {
    let names = introspector.properties_of(schema, &record.record_type)?;
    Ok(ChangeEntry::deletion(
        TypedReference::new(record.record_type.clone(), record.id.clone()),
        snapshot(&names, record),
    ))
}

/// Every listed property of `record` in transport form
pub(crate) fn snapshot(names: &[String], record: &Record) -> Vec<PropertyModification> {
    names
        .iter()
        .map(|name| encode(name, record.get(name)))
        .collect()
}

fn modification_of(
    oracle: &EqualityOracle,
    names: &[String],
    previous: &Record,
    next: &Record,
) -> Option<ChangeEntry> {
    let (forward, reverse): (Vec<_>, Vec<_>) = names
        .iter()
        .filter(|name| !oracle.equal(previous.get(name), next.get(name)))
        .map(|name| (encode(name, next.get(name)), encode(name, previous.get(name))))
        .unzip();

    if forward.is_empty() {
        return None;
    }

    Some(ChangeEntry::modification(
        TypedReference::new(next.record_type.clone(), next.id.clone()),
        forward,
        reverse,
    ))
}
