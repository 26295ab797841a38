//! Equality oracle
//!
//! Decides whether a previous and a next property value are equivalent,
//! dispatching on the value kind. Scalars compare by canonical transport
//! text, so two values that encode to the same text are equal and nothing
//! else is.

use crate::config::QuantityComparison;
use crate::model::{PropertyValue, Quantity};

/// EqualityOracle - per-kind value equivalence
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EqualityOracle {
    quantity_comparison: QuantityComparison,
}

impl EqualityOracle {
    pub fn new(quantity_comparison: QuantityComparison) -> Self {
        Self {
            quantity_comparison,
        }
    }

    /// Compare two possibly-null property values
    pub fn equal(&self, previous: Option<&PropertyValue>, next: Option<&PropertyValue>) -> bool {
        match (previous, next) {
            (None, None) => true,
            (Some(a), Some(b)) => self.values_equal(a, b),
            _ => false,
        }
    }

    /// Compare two non-null property values
    pub fn values_equal(&self, previous: &PropertyValue, next: &PropertyValue) -> bool {
        match (previous, next) {
            (PropertyValue::Scalar(a), PropertyValue::Scalar(b)) => {
                a.canonical_text() == b.canonical_text()
            }
            (PropertyValue::Quantity(a), PropertyValue::Quantity(b)) => self.quantities_equal(a, b),
            (PropertyValue::Reference(a), PropertyValue::Reference(b)) => a == b,
            (PropertyValue::Collection(a), PropertyValue::Collection(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|(x, y)| self.values_equal(x, y))
            }
            _ => false,
        }
    }

    fn quantities_equal(&self, a: &Quantity, b: &Quantity) -> bool {
        if a.unit != b.unit || a.multiplier != b.multiplier {
            return false;
        }
        match self.quantity_comparison {
            QuantityComparison::Exact => a.value_text() == b.value_text(),
            QuantityComparison::Tolerance(epsilon) => {
                a.value_text() == b.value_text() || (a.value - b.value).abs() <= epsilon
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Scalar, UnitMultiplier, UnitSymbol};

    fn kv(value: f64) -> PropertyValue {
        PropertyValue::quantity(value, UnitMultiplier::Kilo, UnitSymbol::V)
    }

    #[test]
    fn test_null_handling() {
        let oracle = EqualityOracle::default();
        let v = PropertyValue::text("A");
        assert!(oracle.equal(None, None));
        assert!(!oracle.equal(Some(&v), None));
        assert!(!oracle.equal(None, Some(&v)));
    }

    #[test]
    fn test_scalars_compare_by_canonical_text() {
        let oracle = EqualityOracle::default();
        assert!(oracle.values_equal(
            &PropertyValue::decimal(86.0),
            &PropertyValue::decimal(86.0)
        ));
        assert!(!oracle.values_equal(&PropertyValue::decimal(0.1), &PropertyValue::decimal(0.2)));
        // Same text, different declared scalar kind
        assert!(oracle.values_equal(
            &PropertyValue::integer(12),
            &PropertyValue::Scalar(Scalar::Text("12".into()))
        ));
    }

    #[test]
    fn test_exact_quantity_comparison() {
        let oracle = EqualityOracle::default();
        assert!(oracle.values_equal(&kv(10.0), &kv(10.0)));
        assert!(!oracle.values_equal(&kv(0.1 + 0.2), &kv(0.3)));
    }

    #[test]
    fn test_tolerant_quantity_comparison() {
        let oracle = EqualityOracle::new(QuantityComparison::Tolerance(1e-9));
        assert!(oracle.values_equal(&kv(0.1 + 0.2), &kv(0.3)));
        assert!(!oracle.values_equal(&kv(0.3), &kv(0.31)));
    }

    #[test]
    fn test_quantity_unit_and_multiplier_must_match() {
        let oracle = EqualityOracle::new(QuantityComparison::Tolerance(1.0));
        let mega = PropertyValue::quantity(10.0, UnitMultiplier::Mega, UnitSymbol::V);
        let amps = PropertyValue::quantity(10.0, UnitMultiplier::Kilo, UnitSymbol::A);
        assert!(!oracle.values_equal(&kv(10.0), &mega));
        assert!(!oracle.values_equal(&kv(10.0), &amps));
    }

    #[test]
    fn test_references_compare_both_fields() {
        let oracle = EqualityOracle::default();
        let a = PropertyValue::reference("Substation", "1");
        let b = PropertyValue::reference("Substation", "1");
        let other_type = PropertyValue::reference("Location", "1");
        assert!(oracle.values_equal(&a, &b));
        assert!(!oracle.values_equal(&a, &other_type));
    }

    #[test]
    fn test_collections_are_ordered() {
        let oracle = EqualityOracle::default();
        let ab = PropertyValue::Collection(vec![PropertyValue::integer(1), PropertyValue::integer(2)]);
        let ba = PropertyValue::Collection(vec![PropertyValue::integer(2), PropertyValue::integer(1)]);
        let a = PropertyValue::Collection(vec![PropertyValue::integer(1)]);
        assert!(oracle.values_equal(&ab, &ab.clone()));
        assert!(!oracle.values_equal(&ab, &ba));
        assert!(!oracle.values_equal(&ab, &a));
    }

    #[test]
    fn test_kind_mismatch_is_unequal() {
        let oracle = EqualityOracle::default();
        assert!(!oracle.values_equal(
            &PropertyValue::text("Substation/1"),
            &PropertyValue::reference("Substation", "1")
        ));
    }
}
