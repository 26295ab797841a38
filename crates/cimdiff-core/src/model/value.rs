//! Property values
//!
//! A record's properties hold one of a small closed set of value kinds.
//! Null is never a variant here; an unset property is `None` at the use site.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::units::{UnitMultiplier, UnitSymbol};

/// Primitive scalar value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Scalar {
    Bool(bool),
    Integer(i64),
    Decimal(f64),
    Text(String),
    DateTime(DateTime<Utc>),
}

impl Scalar {
    /// Canonical transport text
    ///
    /// Decimals use the shortest representation that parses back to the same
    /// `f64`, independent of any locale.
    pub fn canonical_text(&self) -> String {
        match self {
            Scalar::Bool(b) => b.to_string(),
            Scalar::Integer(i) => i.to_string(),
            Scalar::Decimal(d) => format_decimal(*d),
            Scalar::Text(s) => s.clone(),
            Scalar::DateTime(dt) => dt.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        }
    }
}

/// Numeric value with a unit and a scale multiplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    pub unit: UnitSymbol,
    pub multiplier: UnitMultiplier,
}

impl Quantity {
    pub fn new(value: f64, multiplier: UnitMultiplier, unit: UnitSymbol) -> Self {
        Self {
            value,
            unit,
            multiplier,
        }
    }

    /// Canonical transport text of the numeric part
    pub fn value_text(&self) -> String {
        format_decimal(self.value)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}{}",
            self.value_text(),
            self.multiplier.prefix(),
            self.unit
        )
    }
}

/// Pointer to another record by id and declared target type
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypedReference {
    #[serde(rename = "referenceType")]
    pub reference_type: String,
    #[serde(rename = "ref")]
    pub reference: String,
}

impl TypedReference {
    pub fn new(reference_type: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            reference_type: reference_type.into(),
            reference: reference.into(),
        }
    }
}

impl fmt::Display for TypedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.reference_type, self.reference)
    }
}

/// Value held by a single record property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum PropertyValue {
    Scalar(Scalar),
    Quantity(Quantity),
    Reference(TypedReference),
    Collection(Vec<PropertyValue>),
}

impl PropertyValue {
    pub fn text(value: impl Into<String>) -> Self {
        PropertyValue::Scalar(Scalar::Text(value.into()))
    }

    pub fn bool(value: bool) -> Self {
        PropertyValue::Scalar(Scalar::Bool(value))
    }

    pub fn integer(value: i64) -> Self {
        PropertyValue::Scalar(Scalar::Integer(value))
    }

    pub fn decimal(value: f64) -> Self {
        PropertyValue::Scalar(Scalar::Decimal(value))
    }

    pub fn quantity(value: f64, multiplier: UnitMultiplier, unit: UnitSymbol) -> Self {
        PropertyValue::Quantity(Quantity::new(value, multiplier, unit))
    }

    pub fn reference(reference_type: impl Into<String>, reference: impl Into<String>) -> Self {
        PropertyValue::Reference(TypedReference::new(reference_type, reference))
    }

    /// Short name of the value kind, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            PropertyValue::Scalar(_) => "scalar",
            PropertyValue::Quantity(_) => "quantity",
            PropertyValue::Reference(_) => "reference",
            PropertyValue::Collection(_) => "collection",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Scalar(Scalar::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Scalar(Scalar::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_quantity(&self) -> Option<&Quantity> {
        match self {
            PropertyValue::Quantity(q) => Some(q),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&TypedReference> {
        match self {
            PropertyValue::Reference(r) => Some(r),
            _ => None,
        }
    }
}

/// Locale-invariant, round-trippable decimal text
pub(crate) fn format_decimal(value: f64) -> String {
    // `Display` for f64 prints the shortest digits that parse back exactly.
    value.to_string()
}
