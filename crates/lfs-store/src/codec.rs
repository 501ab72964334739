//! Value encoding for the objects partition.
//!
//! Records are bincode-encoded `{oid, size}`. The transient `existing`
//! flag of [`MetaObject`] is never written.

use lfs_types::MetaObject;
use serde::{Deserialize, Serialize};

use crate::error::{MetaError, MetaResult};

#[derive(Serialize)]
struct ObjectRecordRef<'a> {
    oid: &'a str,
    size: u64,
}

#[derive(Deserialize)]
struct ObjectRecord {
    oid: String,
    size: u64,
}

/// Encode an object record for storage.
pub fn encode_object(object: &MetaObject) -> MetaResult<Vec<u8>> {
    let record = ObjectRecordRef {
        oid: &object.oid,
        size: object.size,
    };
    bincode::serialize(&record).map_err(|e| MetaError::Encode(e.to_string()))
}

/// Decode a stored object record. The result always has `existing == false`.
pub fn decode_object(bytes: &[u8]) -> MetaResult<MetaObject> {
    let record: ObjectRecord =
        bincode::deserialize(bytes).map_err(|e| MetaError::Decode(e.to_string()))?;
    Ok(MetaObject::new(record.oid, record.size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_restores_fields() {
        let obj = MetaObject::new("abc123", 42);
        let decoded = decode_object(&encode_object(&obj).unwrap()).unwrap();
        assert_eq!(decoded, obj);
    }

    #[test]
    fn existing_flag_is_not_persisted() {
        let obj = MetaObject::new("abc123", 42).into_existing();
        let bytes = encode_object(&obj).unwrap();
        assert_eq!(bytes, encode_object(&MetaObject::new("abc123", 42)).unwrap());
        assert!(!decode_object(&bytes).unwrap().existing);
    }

    #[test]
    fn truncated_bytes_fail_to_decode() {
        let err = decode_object(&[0xff, 0xff, 0xff]).unwrap_err();
        assert!(matches!(err, MetaError::Decode(_)));
    }
}
