//! Record text codec
//!
//! A record is written as one JSON object:
//!
//! ```json
//! {
//!   "$type": "ACLineSegment",
//!   "mRID": "a1",
//!   "gch": "153 kF",
//!   "BaseVoltage": 86.0,
//!   "aggregate": true,
//!   "Location": "Location/loc-1",
//!   "Names": ["Name/n1", "Name/n2"]
//! }
//! ```
//!
//! Scalars map to JSON bools, numbers and strings. Quantities use the
//! compact `"<value> <multiplier><unit>"` text and references the
//! `"<referenceType>/<ref>"` text. Nulls and excluded properties are left
//! out; companion flags are derived from their properties on decode.
//!
//! Record streams are JSON Lines: one object per line.

use std::io::{BufRead, Write};

use serde_json::{Map, Number, Value};

use crate::errors::{DiffError, Result};
use crate::model::{PropertyValue, Record, Scalar};
use crate::schema::{PropertyKind, ScalarKind, SchemaRegistry};

use super::value::{parse_compact_quantity, parse_reference};

/// Key holding the record type name
pub const TYPE_KEY: &str = "$type";

/// Encode a record as a JSON object
///
/// # Errors
///
/// Returns `UnknownRecordType` for an undeclared type and `Serialization`
/// for a decimal JSON cannot represent (NaN or infinite).
pub fn encode_record(schema: &SchemaRegistry, record: &Record) -> Result<Value> {
    let record_type = schema.record_type(&record.record_type)?;

    let mut object = Map::new();
    object.insert(TYPE_KEY.to_string(), Value::String(record.record_type.clone()));
    object.insert(
        schema.id_property().to_string(),
        Value::String(record.id.clone()),
    );

    for (name, value) in record.iter() {
        // The identifier comes from `record.id` only
        let excluded = name == schema.id_property()
            || record_type.property(name).map_or(true, |p| p.excluded);
        if excluded {
            continue;
        }
        object.insert(name.to_string(), encode_value(value)?);
    }

    Ok(Value::Object(object))
}

fn encode_value(value: &PropertyValue) -> Result<Value> {
    Ok(match value {
        PropertyValue::Scalar(Scalar::Bool(b)) => Value::Bool(*b),
        PropertyValue::Scalar(Scalar::Integer(i)) => Value::Number((*i).into()),
        PropertyValue::Scalar(Scalar::Decimal(d)) => Number::from_f64(*d)
            .map(Value::Number)
            .ok_or_else(|| DiffError::Serialization {
                message: format!("decimal {} has no JSON representation", d),
            })?,
        PropertyValue::Scalar(other) => Value::String(other.canonical_text()),
        PropertyValue::Quantity(q) => Value::String(q.to_string()),
        PropertyValue::Reference(r) => Value::String(r.to_string()),
        PropertyValue::Collection(items) => Value::Array(
            items
                .iter()
                .map(encode_value)
                .collect::<Result<Vec<_>>>()?,
        ),
    })
}

/// Decode a record from a JSON object
///
/// # Errors
///
/// Returns `Serialization` when the type or id key is missing,
/// `UnknownRecordType` / `UnknownProperty` for undeclared names, and
/// `Decode` for values that do not fit their declared kind.
pub fn decode_record(schema: &SchemaRegistry, value: &Value) -> Result<Record> {
    let object = value.as_object().ok_or_else(|| DiffError::Serialization {
        message: "record must be a JSON object".to_string(),
    })?;
    let type_name = required_string(object, TYPE_KEY)?;
    let id = required_string(object, schema.id_property())?;
    let record_type = schema.record_type(type_name)?;

    let mut record = Record::new(type_name, id);
    for (name, raw) in object {
        if name == TYPE_KEY || name == schema.id_property() || raw.is_null() {
            continue;
        }
        let descriptor = record_type
            .property(name)
            .ok_or_else(|| DiffError::UnknownProperty {
                record_type: type_name.to_string(),
                property: name.clone(),
            })?;
        if descriptor.excluded {
            continue;
        }
        let value = decode_value(&descriptor.kind, raw).map_err(|reason| DiffError::Decode {
            record_type: type_name.to_string(),
            property: name.clone(),
            raw: raw.to_string(),
            reason,
        })?;
        record.set(name.clone(), Some(value));
    }

    record_type.derive_companion_flags(&mut record);
    Ok(record)
}

fn required_string<'a>(object: &'a Map<String, Value>, key: &str) -> Result<&'a str> {
    object
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| DiffError::Serialization {
            message: format!("record is missing the '{}' string", key),
        })
}

fn decode_value(kind: &PropertyKind, raw: &Value) -> std::result::Result<PropertyValue, String> {
    match kind {
        PropertyKind::Scalar(scalar) => decode_scalar(scalar, raw).map(PropertyValue::Scalar),
        PropertyKind::Quantity => {
            parse_compact_quantity(expect_str(raw)?).map(PropertyValue::Quantity)
        }
        PropertyKind::Reference => parse_reference(expect_str(raw)?).map(PropertyValue::Reference),
        PropertyKind::Collection(element) => raw
            .as_array()
            .ok_or_else(|| "expected an array".to_string())?
            .iter()
            .map(|item| decode_value(element, item))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(PropertyValue::Collection),
    }
}

fn decode_scalar(kind: &ScalarKind, raw: &Value) -> std::result::Result<Scalar, String> {
    match kind {
        ScalarKind::Bool => raw
            .as_bool()
            .map(Scalar::Bool)
            .ok_or_else(|| "expected a bool".to_string()),
        ScalarKind::Integer => raw
            .as_i64()
            .map(Scalar::Integer)
            .ok_or_else(|| "expected an integer".to_string()),
        ScalarKind::Decimal => raw
            .as_f64()
            .map(Scalar::Decimal)
            .ok_or_else(|| "expected a number".to_string()),
        ScalarKind::Text => expect_str(raw).map(|s| Scalar::Text(s.to_string())),
        ScalarKind::DateTime => chrono::DateTime::parse_from_rfc3339(expect_str(raw)?)
            .map(|dt| Scalar::DateTime(dt.with_timezone(&chrono::Utc)))
            .map_err(|e| e.to_string()),
        ScalarKind::Enumeration(literals) => {
            let text = expect_str(raw)?;
            if literals.iter().any(|l| l == text) {
                Ok(Scalar::Text(text.to_string()))
            } else {
                Err(format!("expected one of {}", literals.join("|")))
            }
        }
    }
}

fn expect_str(raw: &Value) -> std::result::Result<&str, String> {
    raw.as_str().ok_or_else(|| "expected a string".to_string())
}

/// Parse a single record from JSON text
///
/// # Errors
///
/// Returns `Serialization` for malformed JSON, otherwise as [`decode_record`].
pub fn from_str(schema: &SchemaRegistry, text: &str) -> Result<Record> {
    let value: Value = serde_json::from_str(text)?;
    decode_record(schema, &value)
}

/// Render a single record as pretty-printed JSON
///
/// # Errors
///
/// As [`encode_record`].
pub fn to_string_pretty(schema: &SchemaRegistry, record: &Record) -> Result<String> {
    Ok(serde_json::to_string_pretty(&encode_record(schema, record)?)?)
}

/// Read a JSON Lines record stream, skipping blank lines
///
/// # Errors
///
/// Returns `Io` when reading fails and `Serialization` (with the line
/// number) for malformed JSON, otherwise as [`decode_record`].
pub fn read_jsonl(schema: &SchemaRegistry, reader: impl BufRead) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(&line).map_err(|e| DiffError::Serialization {
            message: format!("line {}: {}", index + 1, e),
        })?;
        records.push(decode_record(schema, &value)?);
    }
    Ok(records)
}

/// Write records as JSON Lines
///
/// # Errors
///
/// Returns `Io` when writing fails, otherwise as [`encode_record`].
pub fn write_jsonl<'a>(
    schema: &SchemaRegistry,
    records: impl IntoIterator<Item = &'a Record>,
    mut writer: impl Write,
) -> Result<()> {
    for record in records {
        let line = serde_json::to_string(&encode_record(schema, record)?)?;
        writeln!(writer, "{}", line)?;
    }
    writer.flush()?;
    Ok(())
}
