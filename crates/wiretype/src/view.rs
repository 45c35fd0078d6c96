// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type-erased zero-copy message views.
//!
//! A `MessageView` is the proxy instance produced by dispatch: a borrowed
//! payload buffer plus the static descriptor of its type. Accessors resolve
//! field positions from the descriptor: static offsets for the fixed
//! prefix of the layout, a skip-walk over length prefixes for fields that
//! follow a variable-length field. The view never copies payload bytes;
//! string and byte accessors borrow from the buffer.

use crate::core::ser::{Cursor, SerError, SerResult};
use crate::core::types::{FieldLayout, FieldType, PrimitiveKind, TypeDescriptor, DYNAMIC_OFFSET};
use crate::error::{Error, Result};

/// Generate typed accessors for primitive fields (eliminates duplication)
macro_rules! impl_get_primitive {
    ($name:ident, $type:ty, $kind:ident, $read:ident) => {
        pub fn $name(&self, field: &str) -> Result<$type> {
            let (index, layout) = self.lookup(field)?;
            if layout.field_type != FieldType::Primitive(PrimitiveKind::$kind) {
                return Err(Error::FieldMismatch {
                    field: layout.name,
                    expected: stringify!($type),
                });
            }
            let mut cursor = self.cursor_at(index)?;
            Ok(cursor.$read()?)
        }
    };
}

/// Read-only view over one message payload (hash prefix already stripped).
#[derive(Clone, Copy)]
pub struct MessageView<'p> {
    descriptor: &'static TypeDescriptor,
    payload: &'p [u8],
}

impl<'p> MessageView<'p> {
    pub fn new(descriptor: &'static TypeDescriptor, payload: &'p [u8]) -> Self {
        Self {
            descriptor,
            payload,
        }
    }

    pub fn descriptor(&self) -> &'static TypeDescriptor {
        self.descriptor
    }

    pub fn type_name(&self) -> &'static str {
        self.descriptor.type_name
    }

    pub fn payload(&self) -> &'p [u8] {
        self.payload
    }

    impl_get_primitive!(get_u8, u8, U8, read_u8);
    impl_get_primitive!(get_u16, u16, U16, read_u16_le);
    impl_get_primitive!(get_u32, u32, U32, read_u32_le);
    impl_get_primitive!(get_u64, u64, U64, read_u64_le);
    impl_get_primitive!(get_i8, i8, I8, read_i8);
    impl_get_primitive!(get_i16, i16, I16, read_i16_le);
    impl_get_primitive!(get_i32, i32, I32, read_i32_le);
    impl_get_primitive!(get_i64, i64, I64, read_i64_le);
    impl_get_primitive!(get_f32, f32, F32, read_f32_le);
    impl_get_primitive!(get_f64, f64, F64, read_f64_le);
    impl_get_primitive!(get_bool, bool, Bool, read_bool);

    pub fn get_str(&self, field: &str) -> Result<&'p str> {
        let (index, layout) = self.lookup(field)?;
        if layout.field_type != FieldType::String {
            return Err(Error::FieldMismatch {
                field: layout.name,
                expected: "string",
            });
        }
        let mut cursor = self.cursor_at(index)?;
        Ok(cursor.read_str()?)
    }

    pub fn get_bytes(&self, field: &str) -> Result<&'p [u8]> {
        let (index, layout) = self.lookup(field)?;
        if layout.field_type != FieldType::Bytes {
            return Err(Error::FieldMismatch {
                field: layout.name,
                expected: "bytes",
            });
        }
        let mut cursor = self.cursor_at(index)?;
        Ok(cursor.read_bytes_prefixed()?)
    }

    /// View over an embedded fixed-size struct field.
    pub fn get_struct(&self, field: &str) -> Result<MessageView<'p>> {
        let (index, layout) = self.lookup(field)?;
        let element = match (layout.field_type, layout.element_type) {
            (FieldType::Struct, Some(element)) => element,
            _ => {
                return Err(Error::FieldMismatch {
                    field: layout.name,
                    expected: "struct",
                })
            }
        };
        let start = self.field_start(index)?;
        let end = start + layout.size_bytes as usize;
        let slice = self
            .payload
            .get(start..end)
            .ok_or_else(|| SerError::ReadFailed {
                offset: start,
                reason: "unexpected end of buffer".into(),
            })?;
        Ok(MessageView::new(element, slice))
    }

    fn lookup(&self, field: &str) -> Result<(usize, &'static FieldLayout)> {
        self.descriptor
            .field(field)
            .ok_or_else(|| Error::FieldNotFound(field.to_string()))
    }

    fn cursor_at(&self, index: usize) -> Result<Cursor<'p>> {
        let start = self.field_start(index)?;
        let tail = self
            .payload
            .get(start..)
            .ok_or_else(|| SerError::ReadFailed {
                offset: start,
                reason: "unexpected end of buffer".into(),
            })?;
        Ok(Cursor::new(tail))
    }

    /// Byte position of a field within the payload.
    ///
    /// Fields up to and including the first variable-length field have
    /// static offsets; later fields carry the dynamic-offset sentinel and
    /// are located by skipping the encodings in between.
    fn field_start(&self, index: usize) -> SerResult<usize> {
        let fields = self.descriptor.fields;
        if fields[index].offset_bytes != DYNAMIC_OFFSET {
            return Ok(fields[index].offset_bytes as usize);
        }
        // Field 0 always has a static offset, so the walk terminates.
        let mut walk = index;
        while fields[walk].offset_bytes == DYNAMIC_OFFSET {
            walk -= 1;
        }
        let mut pos = fields[walk].offset_bytes as usize;
        while walk < index {
            pos += self.encoded_len(&fields[walk], pos)?;
            walk += 1;
        }
        Ok(pos)
    }

    /// Encoded length of a field starting at `pos`.
    fn encoded_len(&self, layout: &FieldLayout, pos: usize) -> SerResult<usize> {
        if !layout.is_variable() {
            return Ok(layout.size_bytes as usize);
        }
        let tail = self.payload.get(pos..).ok_or_else(|| SerError::ReadFailed {
            offset: pos,
            reason: "unexpected end of buffer".into(),
        })?;
        let mut cursor = Cursor::new(tail);
        let len = cursor.read_u32_le()? as usize;
        Ok(4 + len)
    }
}

impl std::fmt::Debug for MessageView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageView")
            .field("type_name", &self.descriptor.type_name)
            .field("payload_len", &self.payload.len())
            .finish()
    }
}
