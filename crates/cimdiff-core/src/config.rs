//! Engine configuration
//!
//! Every field defaults, so an empty TOML document is a valid configuration:
//!
//! ```toml
//! type_mismatch = "replace"
//! apply_failure = "skip_entry"
//!
//! [quantity_comparison]
//! tolerance = 1e-9
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{DiffError, Result};

/// What the diff generator does when a record changes type between snapshots
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeMismatchPolicy {
    /// Abort the diff with a type-mismatch error
    #[default]
    Error,
    /// Emit a deletion of the old record followed by a creation of the new one
    Replace,
}

/// How quantity values are compared
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityComparison {
    /// Canonical value text must match exactly
    #[default]
    Exact,
    /// Values within an absolute tolerance are equal
    Tolerance(f64),
}

/// What the patch applicator does with an entry that fails to apply
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyFailurePolicy {
    /// Fail the whole call; no partial record set is returned
    #[default]
    FailFast,
    /// Skip the offending entry and report it
    SkipEntry,
}

/// DifferConfig - knobs for the diff generator and patch applicator
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DifferConfig {
    #[serde(default)]
    pub type_mismatch: TypeMismatchPolicy,

    #[serde(default)]
    pub quantity_comparison: QuantityComparison,

    #[serde(default)]
    pub apply_failure: ApplyFailurePolicy,
}

impl DifferConfig {
    /// Parse and validate a TOML configuration document
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` on malformed TOML, unknown keys or an
    /// invalid tolerance.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: DifferConfig = toml::from_str(text).map_err(|e| DiffError::InvalidConfig {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` when the quantity tolerance is not a finite,
    /// positive number.
    pub fn validate(&self) -> Result<()> {
        if let QuantityComparison::Tolerance(epsilon) = self.quantity_comparison {
            if !epsilon.is_finite() || epsilon <= 0.0 {
                return Err(DiffError::InvalidConfig {
                    reason: format!(
                        "quantity tolerance must be a finite positive number, got {}",
                        epsilon
                    ),
                });
            }
        }
        Ok(())
    }

    pub fn with_type_mismatch(mut self, policy: TypeMismatchPolicy) -> Self {
        self.type_mismatch = policy;
        self
    }

    pub fn with_quantity_comparison(mut self, comparison: QuantityComparison) -> Self {
        self.quantity_comparison = comparison;
        self
    }

    pub fn with_apply_failure(mut self, policy: ApplyFailurePolicy) -> Self {
        self.apply_failure = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config = DifferConfig::from_toml_str("").unwrap();
        assert_eq!(config, DifferConfig::default());
        assert_eq!(config.type_mismatch, TypeMismatchPolicy::Error);
        assert_eq!(config.quantity_comparison, QuantityComparison::Exact);
        assert_eq!(config.apply_failure, ApplyFailurePolicy::FailFast);
    }

    #[test]
    fn test_full_document() {
        let config = DifferConfig::from_toml_str(
            r#"
            type_mismatch = "replace"
            apply_failure = "skip_entry"

            [quantity_comparison]
            tolerance = 0.001
            "#,
        )
        .unwrap();
        assert_eq!(config.type_mismatch, TypeMismatchPolicy::Replace);
        assert_eq!(config.apply_failure, ApplyFailurePolicy::SkipEntry);
        assert_eq!(
            config.quantity_comparison,
            QuantityComparison::Tolerance(0.001)
        );
    }

    #[test]
    fn test_exact_comparison_as_string() {
        let config = DifferConfig::from_toml_str(r#"quantity_comparison = "exact""#).unwrap();
        assert_eq!(config.quantity_comparison, QuantityComparison::Exact);
    }

    #[test]
    fn test_rejects_non_positive_tolerance() {
        let result = DifferConfig::from_toml_str(
            r#"
            [quantity_comparison]
            tolerance = 0.0
            "#,
        );
        assert!(matches!(result, Err(DiffError::InvalidConfig { .. })));

        let negative = DifferConfig::default()
            .with_quantity_comparison(QuantityComparison::Tolerance(-1.0));
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let result = DifferConfig::from_toml_str(r#"colour = "blue""#);
        assert!(matches!(result, Err(DiffError::InvalidConfig { .. })));
    }
}
