// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Descriptor-driven message encoding for producers without generated code.
//!
//! `encode_message` writes the full wire form (8-byte structural hash
//! prefix followed by the field payload) from a value list matched
//! positionally against the descriptor's field layout. Generic tools and
//! tests use this; generated proxy consumers normally encode with their own
//! typed code.

use crate::core::ser::{CursorMut, SerError};
use crate::core::types::{FieldType, PrimitiveKind, TypeDescriptor};
use crate::error::{Error, Result};

/// One field value, matched positionally against `TypeDescriptor::fields`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Bool(bool),
    Str(String),
    Bytes(Vec<u8>),
    Struct(Vec<FieldValue>),
}

/// Encode `[hash prefix][field payload]` into `buf`, returning bytes written.
pub fn encode_message(
    descriptor: &TypeDescriptor,
    values: &[FieldValue],
    buf: &mut [u8],
) -> Result<usize> {
    let mut cursor = CursorMut::new(buf);
    cursor.write_u64_le(descriptor.type_hash)?;
    encode_fields(descriptor, values, &mut cursor)?;
    Ok(cursor.offset())
}

fn encode_fields(
    descriptor: &TypeDescriptor,
    values: &[FieldValue],
    cursor: &mut CursorMut<'_>,
) -> Result<()> {
    if values.len() != descriptor.fields.len() {
        return Err(SerError::InvalidData {
            reason: format!(
                "{} expects {} field values, got {}",
                descriptor.type_name,
                descriptor.fields.len(),
                values.len()
            ),
        }
        .into());
    }
    for (layout, value) in descriptor.fields.iter().zip(values) {
        match (layout.field_type, value) {
            (FieldType::Primitive(PrimitiveKind::U8), FieldValue::U8(v)) => cursor.write_u8(*v)?,
            (FieldType::Primitive(PrimitiveKind::U16), FieldValue::U16(v)) => {
                cursor.write_u16_le(*v)?
            }
            (FieldType::Primitive(PrimitiveKind::U32), FieldValue::U32(v)) => {
                cursor.write_u32_le(*v)?
            }
            (FieldType::Primitive(PrimitiveKind::U64), FieldValue::U64(v)) => {
                cursor.write_u64_le(*v)?
            }
            (FieldType::Primitive(PrimitiveKind::I8), FieldValue::I8(v)) => cursor.write_i8(*v)?,
            (FieldType::Primitive(PrimitiveKind::I16), FieldValue::I16(v)) => {
                cursor.write_i16_le(*v)?
            }
            (FieldType::Primitive(PrimitiveKind::I32), FieldValue::I32(v)) => {
                cursor.write_i32_le(*v)?
            }
            (FieldType::Primitive(PrimitiveKind::I64), FieldValue::I64(v)) => {
                cursor.write_i64_le(*v)?
            }
            (FieldType::Primitive(PrimitiveKind::F32), FieldValue::F32(v)) => {
                cursor.write_f32_le(*v)?
            }
            (FieldType::Primitive(PrimitiveKind::F64), FieldValue::F64(v)) => {
                cursor.write_f64_le(*v)?
            }
            (FieldType::Primitive(PrimitiveKind::Bool), FieldValue::Bool(v)) => {
                cursor.write_bool(*v)?
            }
            (FieldType::String, FieldValue::Str(v)) => cursor.write_str(v)?,
            (FieldType::Bytes, FieldValue::Bytes(v)) => cursor.write_bytes_prefixed(v)?,
            (FieldType::Struct, FieldValue::Struct(inner)) => {
                let element = layout.element_type.ok_or(Error::FieldMismatch {
                    field: layout.name,
                    expected: "struct",
                })?;
                encode_fields(element, inner, cursor)?;
            }
            _ => {
                return Err(Error::FieldMismatch {
                    field: layout.name,
                    expected: expected_name(layout.field_type),
                })
            }
        }
    }
    Ok(())
}

const fn expected_name(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Primitive(PrimitiveKind::U8) => "u8",
        FieldType::Primitive(PrimitiveKind::U16) => "u16",
        FieldType::Primitive(PrimitiveKind::U32) => "u32",
        FieldType::Primitive(PrimitiveKind::U64) => "u64",
        FieldType::Primitive(PrimitiveKind::I8) => "i8",
        FieldType::Primitive(PrimitiveKind::I16) => "i16",
        FieldType::Primitive(PrimitiveKind::I32) => "i32",
        FieldType::Primitive(PrimitiveKind::I64) => "i64",
        FieldType::Primitive(PrimitiveKind::F32) => "f32",
        FieldType::Primitive(PrimitiveKind::F64) => "f64",
        FieldType::Primitive(PrimitiveKind::Bool) => "bool",
        FieldType::String => "string",
        FieldType::Bytes => "bytes",
        FieldType::Struct => "struct",
    }
}
