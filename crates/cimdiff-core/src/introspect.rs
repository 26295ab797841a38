//! Property introspection with per-type caches
//!
//! Lists are computed once per record type and registry revision, then
//! shared. One introspector may serve several registries: entries are keyed
//! by [`SchemaRegistry::revision`] as well as by type name. Population is
//! read-through: concurrent first uses may both compute the list, and the
//! first insert wins. The computed values are identical either way.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::errors::Result;
use crate::schema::SchemaRegistry;

type PropertyCache = HashMap<u64, HashMap<String, Arc<[String]>>>;

/// PropertyIntrospector - memoized diff-relevant property lists
#[derive(Debug, Default)]
pub struct PropertyIntrospector {
    properties: RwLock<PropertyCache>,
}

impl PropertyIntrospector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff-relevant property names of a type, in declaration order
    ///
    /// Excludes the identifier property and every excluded property.
    ///
    /// # Errors
    ///
    /// Returns `UnknownRecordType` if the schema does not declare the type.
    pub fn properties_of(&self, schema: &SchemaRegistry, type_name: &str) -> Result<Arc<[String]>> {
        read_through(&self.properties, schema.revision(), type_name, || {
            let record_type = schema.record_type(type_name)?;
            Ok(record_type
                .properties()
                .iter()
                .filter(|p| !p.excluded && p.name != schema.id_property())
                .map(|p| p.name.clone())
                .collect())
        })
    }

    /// Number of (registry, type) pairs with a cached property list
    pub fn cached_types(&self) -> usize {
        self.properties
            .read()
            .map(|m| m.values().map(HashMap::len).sum())
            .unwrap_or(0)
    }
}

fn read_through(
    cache: &RwLock<PropertyCache>,
    revision: u64,
    key: &str,
    compute: impl FnOnce() -> Result<Arc<[String]>>,
) -> Result<Arc<[String]>> {
    let hit = cache
        .read()
        .ok()
        .and_then(|m| m.get(&revision).and_then(|types| types.get(key)).cloned());
    if let Some(hit) = hit {
        return Ok(hit);
    }

    let computed = compute()?;
    match cache.write() {
        Ok(mut map) => Ok(map
            .entry(revision)
            .or_default()
            .entry(key.to_string())
            .or_insert(computed)
            .clone()),
        // A poisoned cache only loses memoization.
        Err(_) => Ok(computed),
    }
}
