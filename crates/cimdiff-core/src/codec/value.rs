//! Value codec: property values to and from their transport form
//!
//! Encoding is driven by the value, decoding by the declared property kind.
//! Every kind round-trips: `decode(encode(v))` is equal to `v` under the
//! equality oracle.
//!
//! Transport forms:
//! - scalar: canonical text
//! - quantity: value text, with unit and multiplier carried beside it
//! - reference: `"<referenceType>/<ref>"`
//! - collection: a list of element texts; quantity elements use the
//!   compact `"<value> <multiplier><unit>"` form

use chrono::{DateTime, Utc};

use crate::changes::{PropertyModification, TransportValue};
use crate::errors::{DiffError, Result};
use crate::model::units::split_prefixed_unit;
use crate::model::{PropertyValue, Quantity, Scalar, TypedReference};
use crate::schema::{PropertyDescriptor, PropertyKind, ScalarKind};

/// Encode a possibly-null property value as a modification
pub fn encode(name: &str, value: Option<&PropertyValue>) -> PropertyModification {
    match value {
        None => PropertyModification::null(name),
        Some(PropertyValue::Quantity(q)) => PropertyModification {
            name: name.to_string(),
            value: Some(TransportValue::Text(q.value_text())),
            unit: Some(q.unit),
            multiplier: Some(q.multiplier),
        },
        Some(other) => PropertyModification::new(name, Some(encode_element(other))),
    }
}

/// Transport form of a value nested in a collection (or of a top-level
/// non-quantity value)
pub fn encode_element(value: &PropertyValue) -> TransportValue {
    match value {
        PropertyValue::Scalar(s) => TransportValue::Text(s.canonical_text()),
        PropertyValue::Quantity(q) => TransportValue::Text(q.to_string()),
        PropertyValue::Reference(r) => TransportValue::Text(r.to_string()),
        PropertyValue::Collection(items) => {
            TransportValue::List(items.iter().map(encode_element).collect())
        }
    }
}

/// Decode a modification into a value of the property's declared kind
///
/// # Errors
///
/// Returns `Decode` when the transport value does not parse as the declared
/// kind, including a quantity missing its unit or multiplier.
pub fn decode(
    record_type: &str,
    descriptor: &PropertyDescriptor,
    modification: &PropertyModification,
) -> Result<Option<PropertyValue>> {
    let Some(raw) = &modification.value else {
        return Ok(None);
    };
    let ctx = DecodeContext {
        record_type,
        property: &descriptor.name,
    };

    match &descriptor.kind {
        PropertyKind::Quantity => {
            let text = ctx.expect_text(raw)?;
            let unit = modification
                .unit
                .ok_or_else(|| ctx.error(text, "quantity is missing its unit"))?;
            let multiplier = modification
                .multiplier
                .ok_or_else(|| ctx.error(text, "quantity is missing its multiplier"))?;
            let value = parse_decimal(text).map_err(|reason| ctx.error(text, reason))?;
            Ok(Some(PropertyValue::Quantity(Quantity::new(
                value, multiplier, unit,
            ))))
        }
        kind => decode_element(&ctx, kind, raw).map(Some),
    }
}

struct DecodeContext<'a> {
    record_type: &'a str,
    property: &'a str,
}

impl DecodeContext<'_> {
    fn error(&self, raw: &str, reason: impl Into<String>) -> DiffError {
        DiffError::Decode {
            record_type: self.record_type.to_string(),
            property: self.property.to_string(),
            raw: raw.to_string(),
            reason: reason.into(),
        }
    }

    fn expect_text<'v>(&self, raw: &'v TransportValue) -> Result<&'v str> {
        raw.as_text()
            .ok_or_else(|| self.error(&raw.render(), "expected text, found a list"))
    }
}

fn decode_element(
    ctx: &DecodeContext<'_>,
    kind: &PropertyKind,
    raw: &TransportValue,
) -> Result<PropertyValue> {
    match kind {
        PropertyKind::Collection(element) => match raw {
            TransportValue::List(items) => items
                .iter()
                .map(|item| decode_element(ctx, element, item))
                .collect::<Result<Vec<_>>>()
                .map(PropertyValue::Collection),
            TransportValue::Text(text) => Err(ctx.error(text, "expected a list")),
        },
        PropertyKind::Scalar(scalar) => {
            let text = ctx.expect_text(raw)?;
            parse_scalar(scalar, text)
                .map(PropertyValue::Scalar)
                .map_err(|reason| ctx.error(text, reason))
        }
        PropertyKind::Quantity => {
            let text = ctx.expect_text(raw)?;
            parse_compact_quantity(text)
                .map(PropertyValue::Quantity)
                .map_err(|reason| ctx.error(text, reason))
        }
        PropertyKind::Reference => {
            let text = ctx.expect_text(raw)?;
            parse_reference(text)
                .map(PropertyValue::Reference)
                .map_err(|reason| ctx.error(text, reason))
        }
    }
}

fn parse_scalar(kind: &ScalarKind, text: &str) -> std::result::Result<Scalar, String> {
    match kind {
        ScalarKind::Bool => match text {
            "true" => Ok(Scalar::Bool(true)),
            "false" => Ok(Scalar::Bool(false)),
            _ => Err("expected true or false".to_string()),
        },
        ScalarKind::Integer => text
            .parse::<i64>()
            .map(Scalar::Integer)
            .map_err(|e| e.to_string()),
        ScalarKind::Decimal => parse_decimal(text).map(Scalar::Decimal),
        ScalarKind::Text => Ok(Scalar::Text(text.to_string())),
        ScalarKind::DateTime => DateTime::parse_from_rfc3339(text)
            .map(|dt| Scalar::DateTime(dt.with_timezone(&Utc)))
            .map_err(|e| e.to_string()),
        ScalarKind::Enumeration(literals) => {
            if literals.iter().any(|l| l == text) {
                Ok(Scalar::Text(text.to_string()))
            } else {
                Err(format!("expected one of {}", literals.join("|")))
            }
        }
    }
}

/// Locale-invariant decimal parse
fn parse_decimal(text: &str) -> std::result::Result<f64, String> {
    text.parse::<f64>()
        .map_err(|e| format!("not a decimal number: {}", e))
}

/// Parse `"<value> <multiplier><unit>"`, e.g. `"156 cA"`
pub fn parse_compact_quantity(text: &str) -> std::result::Result<Quantity, String> {
    let (value, unit) = text
        .split_once(' ')
        .ok_or_else(|| "expected '<value> <unit>'".to_string())?;
    let value = parse_decimal(value)?;
    let (multiplier, unit) =
        split_prefixed_unit(unit).ok_or_else(|| format!("unknown unit '{}'", unit))?;
    Ok(Quantity::new(value, multiplier, unit))
}

/// Parse `"<referenceType>/<ref>"`
pub fn parse_reference(text: &str) -> std::result::Result<TypedReference, String> {
    let parts: Vec<&str> = text.split('/').map(str::trim).collect();
    match parts.as_slice() {
        [reference_type, reference] if !reference_type.is_empty() && !reference.is_empty() => {
            Ok(TypedReference::new(*reference_type, *reference))
        }
        _ => Err(format!(
            "expected '<referenceType>/<ref>', found {} part(s)",
            parts.len()
        )),
    }
}
