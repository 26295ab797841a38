use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::value::PropertyValue;

/// Record - an identified, typed domain object
///
/// The identifier lives on the record itself and never appears in the
/// property map. A property missing from the map is null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Globally unique identifier (the CIM `mRID`)
    pub id: String,

    /// Concrete record type name, resolved against a schema registry
    pub record_type: String,

    /// Non-null property values keyed by property name
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyValue>,
}

impl Record {
    /// Create a record with no properties set
    pub fn new(record_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            record_type: record_type.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Builder-style setter for fixtures and tests
    pub fn with(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    /// Get a property value, `None` when null
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Set a property value; `None` clears it
    pub fn set(&mut self, name: impl Into<String>, value: Option<PropertyValue>) {
        let name = name.into();
        match value {
            Some(value) => {
                self.properties.insert(name, value);
            }
            None => {
                self.properties.remove(&name);
            }
        }
    }

    /// Iterate over the non-null properties in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }
}
