// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Structural-hash dispatch for messages of unknown static type.
//!
//! The table is assembled once at process startup from the entries a
//! generated `_deserialize` artifact exports, and is read-only afterwards:
//! lookups take `&self` and the table holds no interior mutability, so
//! concurrent unsynchronized reads from multiple threads are safe. Each
//! decode call borrows its own buffer and yields an independent view.

use std::collections::HashMap;

use crate::core::types::HASH_PREFIX_LEN;
use crate::error::{Error, Result};
use crate::view::MessageView;

/// Decode routine: binds a zero-copy view to a payload buffer.
///
/// The payload excludes the 8-byte hash prefix.
pub type DecodeFn = for<'p> fn(&'p [u8]) -> MessageView<'p>;

/// One dispatch table row, emitted per message type by the generator.
#[derive(Debug, Clone, Copy)]
pub struct DispatchEntry {
    pub type_hash: u64,
    pub type_name: &'static str,
    pub decode: DecodeFn,
}

/// Mapping from structural type hash to decode routine.
///
/// Entries keep their insertion (type-visitation) order; lookups go through
/// a hash index. The generator guarantees hash uniqueness, so table
/// construction treats a duplicate as misassembly and fails.
#[derive(Debug)]
pub struct DispatchTable {
    entries: Vec<DispatchEntry>,
    index: HashMap<u64, usize>,
}

impl DispatchTable {
    /// Build the table, rejecting duplicate hashes.
    pub fn from_entries(entries: &[DispatchEntry]) -> Result<Self> {
        let mut index = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            if let Some(&previous) = index.get(&entry.type_hash) {
                let first: &DispatchEntry = &entries[previous];
                return Err(Error::DuplicateHash {
                    hash: entry.type_hash,
                    first: first.type_name,
                    second: entry.type_name,
                });
            }
            index.insert(entry.type_hash, position);
        }
        Ok(Self {
            entries: entries.to_vec(),
            index,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[DispatchEntry] {
        &self.entries
    }

    pub fn lookup(&self, type_hash: u64) -> Option<&DispatchEntry> {
        self.index
            .get(&type_hash)
            .map(|&position| &self.entries[position])
    }

    /// Decode a full wire message: `[8-byte hash prefix][field payload]`.
    ///
    /// The returned view borrows `buffer`; the caller owns buffer lifetime.
    pub fn decode<'p>(&self, buffer: &'p [u8]) -> Result<MessageView<'p>> {
        if buffer.len() < HASH_PREFIX_LEN {
            return Err(Error::TruncatedHeader { len: buffer.len() });
        }
        let mut prefix = [0u8; HASH_PREFIX_LEN];
        prefix.copy_from_slice(&buffer[..HASH_PREFIX_LEN]);
        let type_hash = u64::from_le_bytes(prefix);

        match self.lookup(type_hash) {
            Some(entry) => Ok((entry.decode)(&buffer[HASH_PREFIX_LEN..])),
            None => {
                log::debug!("no dispatch entry for type hash {:#018X}", type_hash);
                Err(Error::UnknownType { hash: type_hash })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{
        FieldLayout, FieldType, PrimitiveKind, TypeDescriptor, VARIABLE_SIZE,
    };
    use crate::value::{encode_message, FieldValue};

    static POINT: TypeDescriptor = TypeDescriptor {
        type_hash: 0xA1A1_B2B2_C3C3_D4D4,
        type_name: "optimizer::PointMsg",
        size_bytes: 8,
        is_variable_size: false,
        fields: &[
            FieldLayout {
                name: "x",
                offset_bytes: 0,
                field_type: FieldType::Primitive(PrimitiveKind::I32),
                size_bytes: 4,
                element_type: None,
            },
            FieldLayout {
                name: "y",
                offset_bytes: 4,
                field_type: FieldType::Primitive(PrimitiveKind::I32),
                size_bytes: 4,
                element_type: None,
            },
        ],
    };

    static STRING_MSG: TypeDescriptor = TypeDescriptor {
        type_hash: 0xE5E5_F6F6_0707_1818,
        type_name: "optimizer::StringMsg",
        size_bytes: VARIABLE_SIZE,
        is_variable_size: true,
        fields: &[FieldLayout {
            name: "s",
            offset_bytes: 0,
            field_type: FieldType::String,
            size_bytes: VARIABLE_SIZE,
            element_type: None,
        }],
    };

    fn decode_point(payload: &[u8]) -> MessageView<'_> {
        MessageView::new(&POINT, payload)
    }

    fn decode_string_msg(payload: &[u8]) -> MessageView<'_> {
        MessageView::new(&STRING_MSG, payload)
    }

    fn table() -> DispatchTable {
        DispatchTable::from_entries(&[
            DispatchEntry {
                type_hash: POINT.type_hash,
                type_name: POINT.type_name,
                decode: decode_point,
            },
            DispatchEntry {
                type_hash: STRING_MSG.type_hash,
                type_name: STRING_MSG.type_name,
                decode: decode_string_msg,
            },
        ])
        .expect("table should build")
    }

    #[test]
    fn test_lookup_and_insertion_order() {
        let table = table();
        assert_eq!(table.len(), 2);
        assert_eq!(table.entries()[0].type_name, "optimizer::PointMsg");
        assert_eq!(table.entries()[1].type_name, "optimizer::StringMsg");
        assert!(table.lookup(POINT.type_hash).is_some());
        assert!(table.lookup(0xFFFF).is_none());
    }

    #[test]
    fn test_decode_routes_by_hash_prefix() {
        let table = table();
        let mut buf = [0u8; 32];
        let written = encode_message(
            &POINT,
            &[FieldValue::I32(3), FieldValue::I32(5)],
            &mut buf,
        )
        .expect("encode should succeed");

        let view = table.decode(&buf[..written]).expect("decode should succeed");
        assert_eq!(view.type_name(), "optimizer::PointMsg");
        assert_eq!(view.get_i32("x").expect("x should decode"), 3);
        assert_eq!(view.get_i32("y").expect("y should decode"), 5);
    }

    #[test]
    fn test_unknown_hash_is_recoverable() {
        let table = table();
        let mut buf = [0u8; 16];
        buf[..8].copy_from_slice(&0xDEAD_0000_0000_BEEFu64.to_le_bytes());
        match table.decode(&buf).unwrap_err() {
            Error::UnknownType { hash } => assert_eq!(hash, 0xDEAD_0000_0000_BEEF),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_truncated_header_is_rejected() {
        let table = table();
        match table.decode(&[1, 2, 3]).unwrap_err() {
            Error::TruncatedHeader { len } => assert_eq!(len, 3),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_hash_fails_table_construction() {
        let err = DispatchTable::from_entries(&[
            DispatchEntry {
                type_hash: 42,
                type_name: "optimizer::PointMsg",
                decode: decode_point,
            },
            DispatchEntry {
                type_hash: 42,
                type_name: "optimizer::StringMsg",
                decode: decode_string_msg,
            },
        ])
        .unwrap_err();
        match err {
            Error::DuplicateHash { hash, first, second } => {
                assert_eq!(hash, 42);
                assert_eq!(first, "optimizer::PointMsg");
                assert_eq!(second, "optimizer::StringMsg");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_concurrent_unsynchronized_reads() {
        let table = table();
        let mut point_buf = [0u8; 32];
        let point_len = encode_message(
            &POINT,
            &[FieldValue::I32(-7), FieldValue::I32(11)],
            &mut point_buf,
        )
        .expect("encode should succeed");
        let mut string_buf = [0u8; 32];
        let string_len = encode_message(
            &STRING_MSG,
            &[FieldValue::Str("async".to_string())],
            &mut string_buf,
        )
        .expect("encode should succeed");

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..100 {
                        let p = table
                            .decode(&point_buf[..point_len])
                            .expect("decode should succeed");
                        assert_eq!(p.get_i32("x").expect("x should decode"), -7);
                        let s = table
                            .decode(&string_buf[..string_len])
                            .expect("decode should succeed");
                        assert_eq!(s.get_str("s").expect("s should decode"), "async");
                    }
                });
            }
        });
    }
}
