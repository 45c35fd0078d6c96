// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type model: the ordered set of type specs one generator run works from.
//!
//! Built once from the schema document, immutable during writer traversals.
//! Building resolves every declared field type to a size/layout rule and
//! derives byte offsets from declaration order; a field with no known rule
//! fails the run. The wire format carries no padding, so an offset is just
//! the sum of the encoded sizes before it. Fields positioned after a
//! variable-length field get the dynamic-offset sentinel instead.

use wiretype::{DYNAMIC_OFFSET, VARIABLE_SIZE};

use crate::error::GenError;
use crate::hash::structural_hash;
use crate::schema::{SchemaDoc, TypeRole};

/// Fixed-size primitive field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
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

impl Primitive {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "u8" => Some(Primitive::U8),
            "u16" => Some(Primitive::U16),
            "u32" => Some(Primitive::U32),
            "u64" => Some(Primitive::U64),
            "i8" => Some(Primitive::I8),
            "i16" => Some(Primitive::I16),
            "i32" => Some(Primitive::I32),
            "i64" => Some(Primitive::I64),
            "f32" => Some(Primitive::F32),
            "f64" => Some(Primitive::F64),
            "bool" => Some(Primitive::Bool),
            _ => None,
        }
    }

    pub const fn size_bytes(self) -> u32 {
        match self {
            Primitive::U8 | Primitive::I8 | Primitive::Bool => 1,
            Primitive::U16 | Primitive::I16 => 2,
            Primitive::U32 | Primitive::I32 | Primitive::F32 => 4,
            Primitive::U64 | Primitive::I64 | Primitive::F64 => 8,
        }
    }

    /// Canonical declared name; also the Rust type the proxy accessor returns.
    pub const fn canonical_name(self) -> &'static str {
        match self {
            Primitive::U8 => "u8",
            Primitive::U16 => "u16",
            Primitive::U32 => "u32",
            Primitive::U64 => "u64",
            Primitive::I8 => "i8",
            Primitive::I16 => "i16",
            Primitive::I32 => "i32",
            Primitive::I64 => "i64",
            Primitive::F32 => "f32",
            Primitive::F64 => "f64",
            Primitive::Bool => "bool",
        }
    }

    /// `PrimitiveKind` variant path emitted into descriptor literals.
    pub const fn kind_expr(self) -> &'static str {
        match self {
            Primitive::U8 => "PrimitiveKind::U8",
            Primitive::U16 => "PrimitiveKind::U16",
            Primitive::U32 => "PrimitiveKind::U32",
            Primitive::U64 => "PrimitiveKind::U64",
            Primitive::I8 => "PrimitiveKind::I8",
            Primitive::I16 => "PrimitiveKind::I16",
            Primitive::I32 => "PrimitiveKind::I32",
            Primitive::I64 => "PrimitiveKind::I64",
            Primitive::F32 => "PrimitiveKind::F32",
            Primitive::F64 => "PrimitiveKind::F64",
            Primitive::Bool => "PrimitiveKind::Bool",
        }
    }
}

/// Resolved field kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Primitive(Primitive),
    /// u32-LE length prefix + UTF-8 bytes.
    Str,
    /// u32-LE length prefix + raw bytes.
    Bytes,
    /// Fixed-size reference to an earlier model type, by index.
    Struct { type_index: usize },
}

impl FieldKind {
    pub const fn is_variable(&self) -> bool {
        matches!(self, FieldKind::Str | FieldKind::Bytes)
    }
}

/// One resolved field: declared reference plus derived layout facts.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    /// Canonical declared type name, the hashing input (`i32`, `string`,
    /// `bytes`, or a fully qualified struct reference).
    pub declared: String,
    pub kind: FieldKind,
    /// Encoded size, or `VARIABLE_SIZE` for string/bytes.
    pub size_bytes: u32,
    /// Byte offset, or `DYNAMIC_OFFSET` after a variable-length field.
    pub offset_bytes: u32,
}

/// One resolved type: schema definition plus derived layout and hash.
#[derive(Debug, Clone)]
pub struct TypeSpec {
    pub name: String,
    pub namespace: String,
    pub role: TypeRole,
    pub fields: Vec<FieldSpec>,
    /// Total payload size, or `VARIABLE_SIZE` when any field is variable.
    pub size_bytes: u32,
    pub is_variable: bool,
    pub type_hash: u64,
    /// Accepted by at least one configured writer. Set at assembly time,
    /// before traversals start.
    pub eligible: bool,
}

impl TypeSpec {
    pub fn fqn(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}::{}", self.namespace, self.name)
        }
    }
}

/// The ordered model one generator run traverses.
#[derive(Debug)]
pub struct TypeModel {
    pub namespace: String,
    pub types: Vec<TypeSpec>,
}

/// Build the model from a parsed schema document.
pub fn build_model(doc: &SchemaDoc) -> Result<TypeModel, GenError> {
    if doc.types.is_empty() {
        return Err(GenError::EmptySchema);
    }
    check_ident("namespace", &doc.namespace)?;

    let mut types: Vec<TypeSpec> = Vec::with_capacity(doc.types.len());
    for def in &doc.types {
        check_ident("type", &def.name)?;
        if types.iter().any(|t| t.name == def.name) {
            return Err(GenError::DuplicateType {
                name: qualify(&doc.namespace, &def.name),
            });
        }

        let type_name = qualify(&doc.namespace, &def.name);
        let mut fields: Vec<FieldSpec> = Vec::with_capacity(def.fields.len());
        let mut offset: u32 = 0;
        let mut after_variable = false;

        for field in &def.fields {
            check_ident("field", &field.name)?;
            let (kind, declared) = resolve_field(&type_name, &field.name, &field.type_name, &types)?;
            let size_bytes = match &kind {
                FieldKind::Primitive(p) => p.size_bytes(),
                FieldKind::Str | FieldKind::Bytes => VARIABLE_SIZE,
                FieldKind::Struct { type_index } => types[*type_index].size_bytes,
            };
            let offset_bytes = if after_variable { DYNAMIC_OFFSET } else { offset };
            if size_bytes == VARIABLE_SIZE {
                after_variable = true;
            } else if !after_variable {
                offset += size_bytes;
            }
            fields.push(FieldSpec {
                name: field.name.clone(),
                declared,
                kind,
                size_bytes,
                offset_bytes,
            });
        }

        let is_variable = after_variable;
        let size_bytes = if is_variable { VARIABLE_SIZE } else { offset };
        let type_hash = structural_hash(
            &type_name,
            fields.iter().map(|f| (f.name.as_str(), f.declared.as_str())),
        );

        types.push(TypeSpec {
            name: def.name.clone(),
            namespace: doc.namespace.clone(),
            role: def.role,
            fields,
            size_bytes,
            is_variable,
            type_hash,
            eligible: false,
        });
    }

    Ok(TypeModel {
        namespace: doc.namespace.clone(),
        types,
    })
}

// Names land verbatim in generated source, so they must be plain idents.
fn check_ident(what: &'static str, name: &str) -> Result<(), GenError> {
    let mut chars = name.chars();
    let head_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if head_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(GenError::InvalidName {
            what,
            name: name.to_string(),
        })
    }
}

fn qualify(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{}::{}", namespace, name)
    }
}

fn resolve_field(
    type_name: &str,
    field: &str,
    declared: &str,
    earlier: &[TypeSpec],
) -> Result<(FieldKind, String), GenError> {
    if let Some(primitive) = Primitive::from_name(declared) {
        return Ok((
            FieldKind::Primitive(primitive),
            primitive.canonical_name().to_string(),
        ));
    }
    match declared {
        "string" => return Ok((FieldKind::Str, "string".to_string())),
        "bytes" => return Ok((FieldKind::Bytes, "bytes".to_string())),
        _ => {}
    }
    if let Some(type_index) = earlier.iter().position(|t| t.name == declared) {
        let target = &earlier[type_index];
        if target.is_variable {
            return Err(GenError::UnsupportedField {
                type_name: type_name.to_string(),
                field: field.to_string(),
                reason: format!(
                    "embedded struct `{}` is variable-size; only fixed-size struct references are supported",
                    target.fqn()
                ),
            });
        }
        return Ok((FieldKind::Struct { type_index }, target.fqn()));
    }
    if declared.contains('<') || declared.contains('[') {
        return Err(GenError::UnsupportedField {
            type_name: type_name.to_string(),
            field: field.to_string(),
            reason: format!("unsupported container shape `{}`", declared),
        });
    }
    Err(GenError::UnknownFieldType {
        type_name: type_name.to_string(),
        field: field.to_string(),
        declared: declared.to_string(),
    })
}
