// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema document loading.
//!
//! The schema is the generator's only external input: a YAML or JSON
//! document (selected by file extension) listing the message and embedded
//! types to generate code for. Field order in the document defines wire
//! layout.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level schema document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDoc {
    /// Namespace prefix for every type, e.g. `optimizer`.
    pub namespace: String,
    pub types: Vec<TypeDef>,
}

/// One annotated type definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDef {
    pub name: String,
    #[serde(default)]
    pub role: TypeRole,
    pub fields: Vec<FieldDef>,
}

/// Whether a type is a dispatchable message or only embedded in others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeRole {
    Message,
    Embedded,
}

impl Default for TypeRole {
    fn default() -> Self {
        TypeRole::Message
    }
}

/// One field: a name plus a declared type reference.
///
/// Declared types: primitives (`i8`..`u64`, `f32`, `f64`, `bool`),
/// `string`, `bytes`, or the name of a previously declared fixed-size type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

/// Load and parse a schema document, dispatching on file extension.
pub fn load_schema(path: &Path) -> Result<SchemaDoc> {
    let content = fs::read_to_string(path)
        .context(format!("Failed to read schema {}", path.display()))?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    match extension {
        "yaml" | "yml" => serde_yaml::from_str(&content)
            .context(format!("Failed to parse YAML schema {}", path.display())),
        "json" => serde_json::from_str(&content)
            .context(format!("Failed to parse JSON schema {}", path.display())),
        other => bail!(
            "unsupported schema extension `{}` (expected yaml, yml, or json)",
            other
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_schema_parses_with_default_role() {
        let doc: SchemaDoc = serde_yaml::from_str(
            r#"
namespace: optimizer
types:
  - name: PointMsg
    fields:
      - { name: x, type: i32 }
      - { name: y, type: i32 }
  - name: Bounds
    role: embedded
    fields:
      - { name: lo, type: f64 }
      - { name: hi, type: f64 }
"#,
        )
        .expect("schema should parse");
        assert_eq!(doc.namespace, "optimizer");
        assert_eq!(doc.types.len(), 2);
        assert_eq!(doc.types[0].role, TypeRole::Message);
        assert_eq!(doc.types[1].role, TypeRole::Embedded);
        assert_eq!(doc.types[0].fields[1].type_name, "i32");
    }

    #[test]
    fn test_json_schema_parses() {
        let doc: SchemaDoc = serde_json::from_str(
            r#"{
  "namespace": "optimizer",
  "types": [
    { "name": "StringMsg", "fields": [ { "name": "s", "type": "string" } ] }
  ]
}"#,
        )
        .expect("schema should parse");
        assert_eq!(doc.types[0].fields[0].name, "s");
    }
}
