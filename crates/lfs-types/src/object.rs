use std::fmt;

use serde::{Deserialize, Serialize};

/// Metadata for one tracked large object.
///
/// The `oid` is the content identifier the client computed for the payload;
/// `size` is the byte length it declared when the object was first
/// registered. Both are fixed once the record exists.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetaObject {
    /// Content identifier, unique within the objects partition.
    pub oid: String,
    /// Declared byte length.
    pub size: u64,
    /// Set only on records returned by a write that found the object
    /// already present. Never persisted.
    #[serde(default)]
    pub existing: bool,
}

impl MetaObject {
    /// Create a fresh (non-existing) record.
    pub fn new(oid: impl Into<String>, size: u64) -> Self {
        Self {
            oid: oid.into(),
            size,
            existing: false,
        }
    }

    /// Mark this record as found-not-created.
    pub fn into_existing(mut self) -> Self {
        self.existing = true;
        self
    }
}

impl fmt::Display for MetaObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bytes)", self.oid, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_not_existing() {
        let obj = MetaObject::new("abc123", 42);
        assert_eq!(obj.oid, "abc123");
        assert_eq!(obj.size, 42);
        assert!(!obj.existing);
    }

    #[test]
    fn into_existing_keeps_fields() {
        let obj = MetaObject::new("abc123", 42).into_existing();
        assert!(obj.existing);
        assert_eq!(obj.size, 42);
    }

    #[test]
    fn display_includes_size() {
        let obj = MetaObject::new("abc123", 42);
        assert_eq!(format!("{obj}"), "abc123 (42 bytes)");
    }

    #[test]
    fn json_without_existing_defaults_false() {
        let obj: MetaObject = serde_json::from_str(r#"{"oid":"x","size":7}"#).unwrap();
        assert_eq!(obj, MetaObject::new("x", 7));
    }
}
