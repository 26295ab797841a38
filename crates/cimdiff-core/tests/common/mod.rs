use std::sync::Arc;

use chrono::{TimeZone, Utc};
use cimdiff_core::schema::{cim, PropertyKind, RecordType, ScalarKind, ID_PROPERTY};
use cimdiff_core::{
    Differ, PropertyValue, Quantity, Record, RecordSet, Scalar, SchemaRegistry, TypedReference,
    UnitMultiplier, UnitSymbol,
};
use proptest::prelude::*;

/// Differ over the built-in CIM schema with the default configuration
#[allow(dead_code)]
pub fn cim_differ() -> Differ {
    Differ::cim()
}

/// Build a record set, panicking on duplicate ids
#[allow(dead_code)]
pub fn record_set(records: Vec<Record>) -> RecordSet {
    RecordSet::from_records(records).expect("fixture ids should be unique")
}

/// Substation with a description and a name
#[allow(dead_code)]
pub fn substation(id: &str, description: &str, name: &str) -> Record {
    Record::new("Substation", id)
        .with("description", PropertyValue::text(description))
        .with("name", PropertyValue::text(name))
}

/// PetersenCoil with the aggregate flag set and a nominal voltage
#[allow(dead_code)]
pub fn petersen_coil(id: &str, aggregate: bool) -> Record {
    Record::new("PetersenCoil", id)
        .with("name", PropertyValue::text("Coil"))
        .with("aggregate", PropertyValue::bool(aggregate))
        .with("aggregateSpecified", PropertyValue::bool(true))
        .with(
            "nominalU",
            PropertyValue::quantity(10.0, UnitMultiplier::Kilo, UnitSymbol::V),
        )
}

/// Registry with every CIM type's properties declared in reverse order
#[allow(dead_code)]
pub fn reversed_cim_registry() -> SchemaRegistry {
    let forward = cim::registry();
    forward
        .type_names()
        .into_iter()
        .fold(SchemaRegistry::new(forward.id_property()), |registry, name| {
            let record_type = forward
                .record_type(name)
                .expect("type names come from the registry");
            let reversed = record_type
                .properties()
                .iter()
                .rev()
                .fold(RecordType::builder(name), |builder, descriptor| {
                    builder.push(descriptor.clone())
                })
                .build();
            registry.with_type(reversed)
        })
}

// ============================================================================
// Strategies
// ============================================================================

/// Decimals JSON and text transport can both carry: finite, within ±1e6
#[allow(dead_code)]
pub fn decimal_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![
        -1.0e6..1.0e6f64,
        (-1000i32..1000).prop_map(f64::from),
    ]
}

#[allow(dead_code)]
pub fn quantity_strategy() -> impl Strategy<Value = Quantity> {
    (
        decimal_strategy(),
        prop::sample::select(UnitMultiplier::ALL.to_vec()),
        prop::sample::select(UnitSymbol::ALL.to_vec()),
    )
        .prop_map(|(value, multiplier, unit)| Quantity::new(value, multiplier, unit))
}

/// References whose parts hold neither `/` nor whitespace
#[allow(dead_code)]
pub fn reference_strategy() -> impl Strategy<Value = TypedReference> {
    ("[A-Z][A-Za-z]{0,11}", "[a-z0-9][a-z0-9-]{0,15}")
        .prop_map(|(reference_type, reference)| TypedReference::new(reference_type, reference))
}

#[allow(dead_code)]
fn scalar_strategy(kind: &ScalarKind) -> BoxedStrategy<Scalar> {
    match kind {
        ScalarKind::Bool => any::<bool>().prop_map(Scalar::Bool).boxed(),
        ScalarKind::Integer => any::<i64>().prop_map(Scalar::Integer).boxed(),
        ScalarKind::Decimal => decimal_strategy().prop_map(Scalar::Decimal).boxed(),
        ScalarKind::Text => "[A-Za-z0-9 ._-]{0,16}".prop_map(Scalar::Text).boxed(),
        // Whole seconds between 1970 and 2100
        ScalarKind::DateTime => (0i64..4_102_444_800)
            .prop_map(|secs| {
                Scalar::DateTime(
                    Utc.timestamp_opt(secs, 0)
                        .single()
                        .expect("whole-second timestamps are unambiguous"),
                )
            })
            .boxed(),
        ScalarKind::Enumeration(literals) => prop::sample::select(literals.clone())
            .prop_map(Scalar::Text)
            .boxed(),
    }
}

/// Values of a declared kind, collections included
#[allow(dead_code)]
pub fn value_strategy(kind: &PropertyKind) -> BoxedStrategy<PropertyValue> {
    match kind {
        PropertyKind::Scalar(scalar) => scalar_strategy(scalar)
            .prop_map(PropertyValue::Scalar)
            .boxed(),
        PropertyKind::Quantity => quantity_strategy()
            .prop_map(PropertyValue::Quantity)
            .boxed(),
        PropertyKind::Reference => reference_strategy()
            .prop_map(PropertyValue::Reference)
            .boxed(),
        PropertyKind::Collection(element) => {
            prop::collection::vec(value_strategy(element), 0..4)
                .prop_map(PropertyValue::Collection)
                .boxed()
        }
    }
}

#[allow(dead_code)]
fn diffable_properties(record_type: &RecordType) -> Vec<(String, PropertyKind)> {
    record_type
        .properties()
        .iter()
        .filter(|p| !p.excluded && p.name != ID_PROPERTY)
        .map(|p| (p.name.clone(), p.kind.clone()))
        .collect()
}

/// Records of one type with every property independently set or null
///
/// Companion flags are consistent with their properties.
#[allow(dead_code)]
pub fn record_strategy(record_type: Arc<RecordType>, id: String) -> BoxedStrategy<Record> {
    let properties = diffable_properties(&record_type);
    let values: Vec<BoxedStrategy<Option<PropertyValue>>> = properties
        .iter()
        .map(|(_, kind)| proptest::option::of(value_strategy(kind)).boxed())
        .collect();

    values
        .prop_map(move |values| {
            let mut record = Record::new(record_type.name(), id.clone());
            for ((name, _), value) in properties.iter().zip(values) {
                record.set(name.clone(), value);
            }
            record_type.derive_companion_flags(&mut record);
            record
        })
        .boxed()
}

/// Mix of `base` and `other`: a property comes from `other` when its bit in
/// `mask` is set
#[allow(dead_code)]
pub fn blend(record_type: &RecordType, base: &Record, other: &Record, mask: u64) -> Record {
    let mut blended = base.clone();
    for (i, (name, _)) in diffable_properties(record_type).iter().enumerate() {
        if mask & (1u64 << (i % 64)) != 0 {
            blended.set(name.clone(), other.get(name).cloned());
        }
    }
    record_type.derive_companion_flags(&mut blended);
    blended
}

/// Previous/next presence of one record id across two snapshots
#[allow(dead_code)]
fn slot_strategy(
    record_type: Arc<RecordType>,
    id: String,
) -> BoxedStrategy<(Option<Record>, Option<Record>)> {
    (
        record_strategy(record_type.clone(), id.clone()),
        record_strategy(record_type.clone(), id),
        0u8..5,
        any::<u64>(),
    )
        .prop_map(move |(a, b, shape, mask)| match shape {
            0 => (Some(a), None),
            1 => (None, Some(b)),
            2 => (Some(a.clone()), Some(a)),
            3 => (Some(a), Some(b)),
            _ => {
                let blended = blend(&record_type, &a, &b, mask);
                (Some(a), Some(blended))
            }
        })
        .boxed()
}

/// Two snapshots over `schema` sharing some ids
///
/// Ids are unique per slot and a shared id never changes type.
#[allow(dead_code)]
pub fn snapshot_pair_strategy(
    schema: Arc<SchemaRegistry>,
    max_records: usize,
) -> BoxedStrategy<(RecordSet, RecordSet)> {
    let type_names: Vec<String> = schema.type_names().iter().map(|s| s.to_string()).collect();

    prop::collection::vec(prop::sample::select(type_names), 1..max_records.max(2))
        .prop_flat_map(move |types| {
            types
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let record_type = schema
                        .record_type(name)
                        .expect("type names come from the registry");
                    slot_strategy(record_type, format!("{}-{}", name, i))
                })
                .collect::<Vec<_>>()
        })
        .prop_map(|slots| {
            let (previous, next): (Vec<_>, Vec<_>) = slots.into_iter().unzip();
            (
                record_set(previous.into_iter().flatten().collect()),
                record_set(next.into_iter().flatten().collect()),
            )
        })
        .boxed()
}

/// One record of `type_name` before and after a random partial change
#[allow(dead_code)]
pub fn modified_record_strategy(
    schema: Arc<SchemaRegistry>,
    type_name: &str,
) -> BoxedStrategy<(Record, Record)> {
    let record_type = schema
        .record_type(type_name)
        .expect("type name comes from the registry");
    let id = format!("{}-modified", type_name);
    (
        record_strategy(record_type.clone(), id.clone()),
        record_strategy(record_type.clone(), id),
        any::<u64>(),
    )
        .prop_map(move |(before, other, mask)| {
            let after = blend(&record_type, &before, &other, mask);
            (before, after)
        })
        .boxed()
}
