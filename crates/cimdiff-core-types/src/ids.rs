//! Identifier types for change entries
//!
//! A change entry carries its own identity, distinct from the id of the
//! record it targets, so that transports and undo logs can refer to it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of one change entry
///
/// Fresh ids are UUIDv7 text. Ids read back from a transport are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeId(String);

impl ChangeId {
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ChangeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ChangeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChangeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ChangeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_ids_are_distinct_uuids() {
        let a = ChangeId::new();
        let b = ChangeId::new();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn test_transported_id_is_kept_verbatim() {
        let id = ChangeId::from("change-1");
        assert_eq!(id.to_string(), "change-1");
        assert_eq!(id, ChangeId::from("change-1".to_string()));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = ChangeId::from("abc");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abc\"");
        assert_eq!(serde_json::from_str::<ChangeId>(&json).unwrap(), id);
    }
}
