//! Change entries produced by the diff generator
//!
//! A change entry pairs one forward change with an optional reverse payload
//! that undoes it. The payload set is closed: creation, deletion and
//! modification.

use cimdiff_core_types::ChangeId;
use serde::{Deserialize, Serialize};

use crate::model::{Record, TypedReference, UnitMultiplier, UnitSymbol};

/// Transport form of a property value
///
/// Scalars, quantity values and references travel as text. Collections
/// travel as lists of element texts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransportValue {
    Text(String),
    List(Vec<TransportValue>),
}

impl TransportValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TransportValue::Text(s) => Some(s),
            TransportValue::List(_) => None,
        }
    }

    /// Compact rendering for logs and error messages
    pub fn render(&self) -> String {
        match self {
            TransportValue::Text(s) => s.clone(),
            TransportValue::List(items) => format!(
                "[{}]",
                items
                    .iter()
                    .map(TransportValue::render)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
}

/// New (or old) transport value of a single property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyModification {
    pub name: String,

    /// `None` clears the property
    pub value: Option<TransportValue>,

    /// Unit of a quantity property
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<UnitSymbol>,

    /// Scale multiplier of a quantity property
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<UnitMultiplier>,
}

impl PropertyModification {
    pub fn new(name: impl Into<String>, value: Option<TransportValue>) -> Self {
        Self {
            name: name.into(),
            value,
            unit: None,
            multiplier: None,
        }
    }

    /// A modification carrying plain text
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, Some(TransportValue::Text(value.into())))
    }

    /// A modification clearing the property
    pub fn null(name: impl Into<String>) -> Self {
        Self::new(name, None)
    }
}

/// Forward payload of a change entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Change {
    ObjectCreation { object: Record },
    ObjectDeletion,
    ObjectModification {
        modifications: Vec<PropertyModification>,
    },
}

impl Change {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Change::ObjectCreation { .. } => "creation",
            Change::ObjectDeletion => "deletion",
            Change::ObjectModification { .. } => "modification",
        }
    }
}

/// Reverse payload of a change entry
///
/// For a deletion this is the full snapshot of the removed record. For a
/// modification it is the list of pre-change values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReverseChange {
    pub modifications: Vec<PropertyModification>,
}

/// ChangeEntry - one unit of change against a record set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEntry {
    /// Identity of the change itself, not of the record it targets
    pub id: ChangeId,

    pub target: TypedReference,

    pub change: Change,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reverse_change: Option<ReverseChange>,
}

impl ChangeEntry {
    pub fn creation(object: Record) -> Self {
        Self {
            id: ChangeId::new(),
            target: TypedReference::new(object.record_type.clone(), object.id.clone()),
            change: Change::ObjectCreation { object },
            reverse_change: None,
        }
    }

    pub fn deletion(target: TypedReference, snapshot: Vec<PropertyModification>) -> Self {
        Self {
            id: ChangeId::new(),
            target,
            change: Change::ObjectDeletion,
            reverse_change: Some(ReverseChange {
                modifications: snapshot,
            }),
        }
    }

    pub fn modification(
        target: TypedReference,
        forward: Vec<PropertyModification>,
        reverse: Vec<PropertyModification>,
    ) -> Self {
        Self {
            id: ChangeId::new(),
            target,
            change: Change::ObjectModification {
                modifications: forward,
            },
            reverse_change: Some(ReverseChange {
                modifications: reverse,
            }),
        }
    }

    /// Forward modification list, for modification entries
    pub fn modifications(&self) -> Option<&[PropertyModification]> {
        match &self.change {
            Change::ObjectModification { modifications } => Some(modifications),
            _ => None,
        }
    }

    /// Reverse modification list, if present
    pub fn reverse_modifications(&self) -> Option<&[PropertyModification]> {
        self.reverse_change
            .as_ref()
            .map(|r| r.modifications.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PropertyValue;
    use serde_json::json;

    #[test]
    fn test_change_kind_tag_in_json() {
        let entry = ChangeEntry::modification(
            TypedReference::new("Terminal", "t1"),
            vec![PropertyModification::text("description", "C")],
            vec![PropertyModification::text("description", "A")],
        );
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["change"]["kind"], json!("ObjectModification"));
        assert_eq!(value["target"]["referenceType"], json!("Terminal"));
        assert_eq!(value["target"]["ref"], json!("t1"));
        assert_eq!(
            value["reverse_change"]["modifications"][0]["value"],
            json!("A")
        );
    }

    #[test]
    fn test_null_value_and_list_value_serialize() {
        let cleared = PropertyModification::null("name");
        let value = serde_json::to_value(&cleared).unwrap();
        assert_eq!(value, json!({"name": "name", "value": null}));

        let list = PropertyModification::new(
            "Names",
            Some(TransportValue::List(vec![
                TransportValue::Text("Name/a".into()),
                TransportValue::Text("Name/b".into()),
            ])),
        );
        let back: PropertyModification =
            serde_json::from_value(serde_json::to_value(&list).unwrap()).unwrap();
        assert_eq!(back, list);
    }

    #[test]
    fn test_creation_targets_its_record() {
        let record = Record::new("Substation", "s1").with("name", PropertyValue::text("S"));
        let entry = ChangeEntry::creation(record);
        assert_eq!(entry.target, TypedReference::new("Substation", "s1"));
        assert!(entry.reverse_change.is_none());
        assert_eq!(entry.change.kind_name(), "creation");
    }

    #[test]
    fn test_render_list() {
        let v = TransportValue::List(vec![
            TransportValue::Text("1".into()),
            TransportValue::Text("2".into()),
        ]);
        assert_eq!(v.render(), "[1, 2]");
    }
}
