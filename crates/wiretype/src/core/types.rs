// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors for wire-format field layout.
//!
//! Defines `TypeDescriptor` and `FieldLayout` for describing message types.
//! Generated artifacts embed these as statics; the dispatch and dynamic view
//! layers consume them at runtime.

/// Sentinel for `FieldLayout::size_bytes` of variable-length fields.
pub const VARIABLE_SIZE: u32 = 0xFFFF_FFFF;

/// Sentinel for `FieldLayout::offset_bytes` of fields positioned after a
/// variable-length field. Their start is recovered at read time by skipping
/// the length-prefixed encodings in between.
pub const DYNAMIC_OFFSET: u32 = 0xFFFF_FFFF;

/// Number of bytes in the structural-hash message prefix.
pub const HASH_PREFIX_LEN: usize = 8;

/// Field type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Primitive(PrimitiveKind),
    String,
    Bytes,
    Struct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Bool,
}

impl PrimitiveKind {
    /// Encoded size on the wire. The format carries no padding, so this is
    /// also the exact layout contribution of the field.
    pub const fn size_bytes(self) -> u32 {
        match self {
            PrimitiveKind::U8 | PrimitiveKind::I8 | PrimitiveKind::Bool => 1,
            PrimitiveKind::U16 | PrimitiveKind::I16 => 2,
            PrimitiveKind::U32 | PrimitiveKind::I32 | PrimitiveKind::F32 => 4,
            PrimitiveKind::U64 | PrimitiveKind::I64 | PrimitiveKind::F64 => 8,
        }
    }
}

/// Layout of a single field within its owning type's serialized form.
///
/// Offsets are derived from declaration order and size rules at generation
/// time and never change afterwards.
#[derive(Debug)]
pub struct FieldLayout {
    pub name: &'static str,
    pub offset_bytes: u32,
    pub field_type: FieldType,
    pub size_bytes: u32,
    pub element_type: Option<&'static TypeDescriptor>,
}

impl FieldLayout {
    /// True for string/bytes fields (length-prefixed encoding).
    pub const fn is_variable(&self) -> bool {
        self.size_bytes == VARIABLE_SIZE
    }
}

/// Type descriptor: serialization metadata for one message or embedded type.
#[derive(Debug)]
pub struct TypeDescriptor {
    /// 64-bit structural hash, the wire-level type tag.
    pub type_hash: u64,
    /// Fully qualified name, e.g. `"optimizer::PointMsg"`.
    pub type_name: &'static str,
    /// Total payload size, or `VARIABLE_SIZE` when any field is variable.
    pub size_bytes: u32,
    pub is_variable_size: bool,
    pub fields: &'static [FieldLayout],
}

impl TypeDescriptor {
    pub const fn new(
        type_hash: u64,
        type_name: &'static str,
        size_bytes: u32,
        is_variable_size: bool,
        fields: &'static [FieldLayout],
    ) -> Self {
        Self {
            type_hash,
            type_name,
            size_bytes,
            is_variable_size,
            fields,
        }
    }

    /// Look up a field by name, returning its ordinal position and layout.
    pub fn field(&self, name: &str) -> Option<(usize, &'static FieldLayout)> {
        self.fields.iter().enumerate().find(|(_, f)| f.name == name)
    }
}
