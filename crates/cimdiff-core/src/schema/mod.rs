//! Record schema registry
//!
//! Declares, per record type, the ordered list of properties with their
//! kinds. The diff engine reads this metadata instead of inspecting records
//! at runtime: it is the property table every record type is checked
//! against.
//!
//! Optional value properties carry a companion boolean flag named
//! `<property>Specified`. The flag is excluded from diffing and transport
//! and is derived from its property whenever a record is rebuilt.

pub mod cim;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::errors::{DiffError, Result};
use crate::model::{PropertyValue, Record, Scalar};

/// Suffix appended to an optional property's name to form its companion flag
pub const SPECIFIED_SUFFIX: &str = "Specified";

/// Identifier property of every CIM record type
pub const ID_PROPERTY: &str = "mRID";

/// Declared kind of a primitive scalar property
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarKind {
    Bool,
    Integer,
    Decimal,
    Text,
    DateTime,
    /// Text restricted to a closed set of literals
    Enumeration(Vec<String>),
}

/// Declared kind of a property
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyKind {
    Scalar(ScalarKind),
    Quantity,
    Reference,
    Collection(Box<PropertyKind>),
}

impl PropertyKind {
    pub fn bool() -> Self {
        PropertyKind::Scalar(ScalarKind::Bool)
    }

    pub fn integer() -> Self {
        PropertyKind::Scalar(ScalarKind::Integer)
    }

    pub fn decimal() -> Self {
        PropertyKind::Scalar(ScalarKind::Decimal)
    }

    pub fn text() -> Self {
        PropertyKind::Scalar(ScalarKind::Text)
    }

    pub fn date_time() -> Self {
        PropertyKind::Scalar(ScalarKind::DateTime)
    }

    pub fn enumeration(literals: &[&str]) -> Self {
        PropertyKind::Scalar(ScalarKind::Enumeration(
            literals.iter().map(|s| s.to_string()).collect(),
        ))
    }

    pub fn collection_of(element: PropertyKind) -> Self {
        PropertyKind::Collection(Box::new(element))
    }

    /// Whether a value fits this declared kind
    pub fn accepts(&self, value: &PropertyValue) -> bool {
        match (self, value) {
            (PropertyKind::Scalar(kind), PropertyValue::Scalar(scalar)) => {
                match (kind, scalar) {
                    (ScalarKind::Bool, Scalar::Bool(_))
                    | (ScalarKind::Integer, Scalar::Integer(_))
                    | (ScalarKind::Decimal, Scalar::Decimal(_))
                    | (ScalarKind::Text, Scalar::Text(_))
                    | (ScalarKind::DateTime, Scalar::DateTime(_)) => true,
                    (ScalarKind::Enumeration(literals), Scalar::Text(text)) => {
                        literals.iter().any(|l| l == text)
                    }
                    _ => false,
                }
            }
            (PropertyKind::Quantity, PropertyValue::Quantity(_))
            | (PropertyKind::Reference, PropertyValue::Reference(_)) => true,
            (PropertyKind::Collection(element), PropertyValue::Collection(items)) => {
                items.iter().all(|item| element.accepts(item))
            }
            _ => false,
        }
    }

    /// Short description for error messages
    pub fn describe(&self) -> String {
        match self {
            PropertyKind::Scalar(ScalarKind::Bool) => "bool".to_string(),
            PropertyKind::Scalar(ScalarKind::Integer) => "integer".to_string(),
            PropertyKind::Scalar(ScalarKind::Decimal) => "decimal".to_string(),
            PropertyKind::Scalar(ScalarKind::Text) => "text".to_string(),
            PropertyKind::Scalar(ScalarKind::DateTime) => "date-time".to_string(),
            PropertyKind::Scalar(ScalarKind::Enumeration(literals)) => {
                format!("one of {}", literals.join("|"))
            }
            PropertyKind::Quantity => "quantity".to_string(),
            PropertyKind::Reference => "reference".to_string(),
            PropertyKind::Collection(element) => format!("collection of {}", element.describe()),
        }
    }
}

/// One declared property of a record type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub name: String,
    pub kind: PropertyKind,
    /// Not part of the public contract: never diffed, never transported
    pub excluded: bool,
    /// Name of the companion `Specified` flag, for optional properties
    pub companion: Option<String>,
}

/// RecordType - ordered property declarations of one record type
#[derive(Debug, Clone)]
pub struct RecordType {
    name: String,
    properties: Vec<PropertyDescriptor>,
    index: HashMap<String, usize>,
}

impl RecordType {
    pub fn builder(name: impl Into<String>) -> RecordTypeBuilder {
        RecordTypeBuilder {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All declared properties, in declaration order
    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.index.get(name).map(|&i| &self.properties[i])
    }

    /// Companion flag name of an optional property
    pub fn companion_flag(&self, name: &str) -> Option<&str> {
        self.property(name).and_then(|p| p.companion.as_deref())
    }

    /// Set every companion flag of `record` from its property
    ///
    /// The flag is `true` when the property holds a value and absent
    /// (null, read as false) otherwise.
    pub fn derive_companion_flags(&self, record: &mut Record) {
        for descriptor in &self.properties {
            if let Some(flag) = &descriptor.companion {
                let specified = record.get(&descriptor.name).is_some();
                record.set(flag.clone(), specified.then(|| PropertyValue::bool(true)));
            }
        }
    }

    /// Check a record's properties against this type's declarations
    ///
    /// # Errors
    ///
    /// Returns `UnknownProperty` for an undeclared property name and
    /// `ValueKindMismatch` for a value that does not fit its declared kind.
    pub fn check_record(&self, record: &Record) -> Result<()> {
        for (name, value) in record.iter() {
            let descriptor = self.property(name).ok_or_else(|| DiffError::UnknownProperty {
                record_type: self.name.clone(),
                property: name.to_string(),
            })?;
            if !descriptor.kind.accepts(value) {
                return Err(DiffError::ValueKindMismatch {
                    record_type: self.name.clone(),
                    record_id: record.id.clone(),
                    property: name.to_string(),
                    expected: descriptor.kind.describe(),
                    found: value.kind_name().to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Builder for [`RecordType`]
///
/// Re-declaring a name replaces the earlier declaration in place.
#[derive(Debug)]
pub struct RecordTypeBuilder {
    name: String,
    properties: Vec<PropertyDescriptor>,
}

impl RecordTypeBuilder {
    /// Declare a property that is always part of the contract
    pub fn property(self, name: &str, kind: PropertyKind) -> Self {
        self.push(PropertyDescriptor {
            name: name.to_string(),
            kind,
            excluded: false,
            companion: None,
        })
    }

    /// Declare an optional property together with its companion flag
    pub fn optional(self, name: &str, kind: PropertyKind) -> Self {
        let flag = format!("{}{}", name, SPECIFIED_SUFFIX);
        self.push(PropertyDescriptor {
            name: name.to_string(),
            kind,
            excluded: false,
            companion: Some(flag.clone()),
        })
        .excluded(&flag, PropertyKind::bool())
    }

    /// Declare a property the engine must never diff or transport
    pub fn excluded(self, name: &str, kind: PropertyKind) -> Self {
        self.push(PropertyDescriptor {
            name: name.to_string(),
            kind,
            excluded: true,
            companion: None,
        })
    }

    /// Append a ready-made descriptor
    pub fn push(mut self, descriptor: PropertyDescriptor) -> Self {
        match self
            .properties
            .iter_mut()
            .find(|p| p.name == descriptor.name)
        {
            Some(existing) => *existing = descriptor,
            None => self.properties.push(descriptor),
        }
        self
    }

    pub fn build(self) -> RecordType {
        let index = self
            .properties
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name.clone(), i))
            .collect();
        RecordType {
            name: self.name,
            properties: self.properties,
            index,
        }
    }
}

static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

fn next_revision() -> u64 {
    NEXT_REVISION.fetch_add(1, Ordering::Relaxed)
}

/// SchemaRegistry - every record type the engine can diff, by name
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    id_property: String,
    types: HashMap<String, Arc<RecordType>>,
    revision: u64,
}

impl SchemaRegistry {
    pub fn new(id_property: impl Into<String>) -> Self {
        Self {
            id_property: id_property.into(),
            types: HashMap::new(),
            revision: next_revision(),
        }
    }

    /// Register a type, replacing any earlier type of the same name
    pub fn register(&mut self, record_type: RecordType) {
        self.types
            .insert(record_type.name.clone(), Arc::new(record_type));
        self.revision = next_revision();
    }

    /// Process-unique identity of this registry's declarations
    ///
    /// Changes on every `register`; a clone shares it until either side
    /// registers a type. Caches derived from the registry key on it.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn with_type(mut self, record_type: RecordType) -> Self {
        self.register(record_type);
        self
    }

    /// Name of the identifier property shared by all types
    pub fn id_property(&self) -> &str {
        &self.id_property
    }

    /// Resolve a type by name
    ///
    /// # Errors
    ///
    /// Returns `UnknownRecordType` if the name is not registered.
    pub fn record_type(&self, name: &str) -> Result<Arc<RecordType>> {
        self.types
            .get(name)
            .cloned()
            .ok_or_else(|| DiffError::UnknownRecordType {
                record_type: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Check a record against its declared type
    ///
    /// The identifier lives in [`Record::id`]; a property-map entry under the
    /// identifier name is rejected, since nothing downstream carries it.
    ///
    /// # Errors
    ///
    /// Returns `UnknownRecordType` for an undeclared type,
    /// `IdentifierNotModifiable` for an identifier entry in the property map,
    /// otherwise as [`RecordType::check_record`].
    pub fn check_record(&self, record: &Record) -> Result<()> {
        let record_type = self.record_type(&record.record_type)?;
        if record.get(&self.id_property).is_some() {
            return Err(DiffError::IdentifierNotModifiable {
                record_type: record.record_type.clone(),
                record_id: record.id.clone(),
                property: self.id_property.clone(),
            });
        }
        record_type.check_record(record)
    }

    /// Registered type names, sorted
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
