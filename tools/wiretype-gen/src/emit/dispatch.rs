// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dispatch-table writer: emits `<namespace>_deserialize.rs`.
//!
//! Per accepted message type: a `pub static` `TypeDescriptor` (embedded
//! struct references are inlined as promoted descriptor literals) and a
//! decode routine binding a `MessageView` to the payload. The epilogue
//! closes the table: the `DISPATCH_ENTRIES` literal in visitation order and
//! a `dispatch_table()` constructor.

use wiretype::{DYNAMIC_OFFSET, VARIABLE_SIZE};

use crate::emit::{to_shout, to_snake, CodeSink, Writer};
use crate::model::{FieldKind, FieldSpec, TypeModel, TypeSpec};
use crate::schema::TypeRole;

pub struct DispatchTableWriter;

impl Writer for DispatchTableWriter {
    fn kind(&self) -> &'static str {
        "dispatch"
    }

    fn file_name(&self, namespace: &str) -> String {
        format!("{}_deserialize.rs", namespace)
    }

    fn accepts(&self, spec: &TypeSpec) -> bool {
        spec.role == TypeRole::Message
    }

    fn begin_file(&self, model: &TypeModel, sink: &mut CodeSink) {
        sink.line("// @generated by wiretype-gen. Do not edit.");
        sink.line("//");
        sink.line(&format!(
            "// Dispatch table and type descriptors for the `{}` schema.",
            model.namespace
        ));
        sink.line("// Wire message: [8-byte structural type hash, LE][field payload].");
        sink.blank();
        sink.line("use wiretype::{DispatchEntry, DispatchTable, MessageView, Result};");
        sink.line("use wiretype::{FieldLayout, FieldType, PrimitiveKind, TypeDescriptor};");
    }

    fn visit_type(&self, spec: &TypeSpec, model: &TypeModel, sink: &mut CodeSink) {
        sink.record(spec);
        let shout = to_shout(&spec.name);
        let snake = to_snake(&spec.name);

        sink.blank();
        sink.line(&format!(
            "pub static {}_DESCRIPTOR: TypeDescriptor = TypeDescriptor {{",
            shout
        ));
        sink.indent();
        emit_descriptor_body(spec, model, sink);
        sink.dedent();
        sink.line("};");
        sink.blank();
        sink.line(&format!(
            "fn decode_{}(payload: &[u8]) -> MessageView<'_> {{",
            snake
        ));
        sink.indent();
        sink.line(&format!("MessageView::new(&{}_DESCRIPTOR, payload)", shout));
        sink.dedent();
        sink.line("}");
    }

    fn end_file(&self, _model: &TypeModel, sink: &mut CodeSink) {
        sink.blank();
        sink.line("pub static DISPATCH_ENTRIES: &[DispatchEntry] = &[");
        sink.indent();
        let emitted: Vec<_> = sink.emitted().to_vec();
        for entry in &emitted {
            sink.line("DispatchEntry {");
            sink.indent();
            sink.line(&format!("type_hash: 0x{:016X},", entry.type_hash));
            sink.line(&format!("type_name: \"{}\",", entry.fqn));
            sink.line(&format!("decode: decode_{},", to_snake(&entry.name)));
            sink.dedent();
            sink.line("},");
        }
        sink.dedent();
        sink.line("];");
        sink.blank();
        sink.line("/// Build the dispatch table for this schema. Call once at startup;");
        sink.line("/// the table is read-only afterwards and safe for concurrent lookups.");
        sink.line("pub fn dispatch_table() -> Result<DispatchTable> {");
        sink.indent();
        sink.line("DispatchTable::from_entries(DISPATCH_ENTRIES)");
        sink.dedent();
        sink.line("}");
    }
}

/// Emit the `key: value,` body lines of a descriptor literal.
fn emit_descriptor_body(spec: &TypeSpec, model: &TypeModel, sink: &mut CodeSink) {
    sink.line(&format!("type_hash: 0x{:016X},", spec.type_hash));
    sink.line(&format!("type_name: \"{}\",", spec.fqn()));
    sink.line(&format!("size_bytes: {},", u32_literal(spec.size_bytes)));
    sink.line(&format!("is_variable_size: {},", spec.is_variable));
    if spec.fields.is_empty() {
        sink.line("fields: &[],");
        return;
    }
    sink.line("fields: &[");
    sink.indent();
    for field in &spec.fields {
        emit_field_layout(field, model, sink);
    }
    sink.dedent();
    sink.line("],");
}

fn emit_field_layout(field: &FieldSpec, model: &TypeModel, sink: &mut CodeSink) {
    sink.line("FieldLayout {");
    sink.indent();
    sink.line(&format!("name: \"{}\",", field.name));
    sink.line(&format!("offset_bytes: {},", u32_literal(field.offset_bytes)));
    sink.line(&format!("field_type: {},", field_type_expr(&field.kind)));
    sink.line(&format!("size_bytes: {},", u32_literal(field.size_bytes)));
    match &field.kind {
        FieldKind::Struct { type_index } => {
            // Promoted inline literal: embedded types are not dispatchable,
            // so their descriptors live inside the referencing field.
            sink.line("element_type: Some(&TypeDescriptor {");
            sink.indent();
            emit_descriptor_body(&model.types[*type_index], model, sink);
            sink.dedent();
            sink.line("}),");
        }
        _ => sink.line("element_type: None,"),
    }
    sink.dedent();
    sink.line("},");
}

fn field_type_expr(kind: &FieldKind) -> String {
    match kind {
        FieldKind::Primitive(p) => format!("FieldType::Primitive({})", p.kind_expr()),
        FieldKind::Str => "FieldType::String".to_string(),
        FieldKind::Bytes => "FieldType::Bytes".to_string(),
        FieldKind::Struct { .. } => "FieldType::Struct".to_string(),
    }
}

fn u32_literal(value: u32) -> String {
    if value == VARIABLE_SIZE || value == DYNAMIC_OFFSET {
        "0xFFFF_FFFF".to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::run_writers;
    use crate::model::build_model;
    use crate::schema::SchemaDoc;

    fn render(yaml: &str) -> String {
        let doc: SchemaDoc = serde_yaml::from_str(yaml).expect("schema should parse");
        let model = build_model(&doc).expect("model should build");
        let writers: Vec<Box<dyn Writer>> = vec![Box::new(DispatchTableWriter)];
        run_writers(&model, &writers).remove(0).contents
    }

    const TWO_TYPES: &str = r#"
namespace: optimizer
types:
  - name: PointMsg
    fields:
      - { name: x, type: i32 }
      - { name: y, type: i32 }
  - name: StringMsg
    fields:
      - { name: s, type: string }
"#;

    #[test]
    fn test_emits_descriptor_per_message_type() {
        let code = render(TWO_TYPES);
        assert!(code.contains("pub static POINT_MSG_DESCRIPTOR: TypeDescriptor"));
        assert!(code.contains("type_name: \"optimizer::PointMsg\","));
        assert!(code.contains("FieldType::Primitive(PrimitiveKind::I32)"));
        assert!(code.contains("pub static STRING_MSG_DESCRIPTOR: TypeDescriptor"));
        assert!(code.contains("size_bytes: 0xFFFF_FFFF,"));
        assert!(code.contains("is_variable_size: true,"));
    }

    #[test]
    fn test_table_epilogue_lists_entries_in_visitation_order() {
        let code = render(TWO_TYPES);
        let point = code
            .find("decode: decode_point_msg,")
            .expect("PointMsg entry expected");
        let string = code
            .find("decode: decode_string_msg,")
            .expect("StringMsg entry expected");
        assert!(point < string);
        assert!(code.contains("pub fn dispatch_table() -> Result<DispatchTable> {"));
    }

    #[test]
    fn test_embedded_type_gets_no_entry_but_an_inline_descriptor() {
        let code = render(
            r#"
namespace: optimizer
types:
  - name: Bounds
    role: embedded
    fields:
      - { name: lo, type: f64 }
      - { name: hi, type: f64 }
  - name: RangeMsg
    fields:
      - { name: axis, type: u32 }
      - { name: bounds, type: Bounds }
"#,
        );
        assert!(!code.contains("BOUNDS_DESCRIPTOR"));
        assert!(!code.contains("decode_bounds"));
        assert!(code.contains("element_type: Some(&TypeDescriptor {"));
        assert!(code.contains("type_name: \"optimizer::Bounds\","));
        assert!(code.contains("decode: decode_range_msg,"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        assert_eq!(render(TWO_TYPES), render(TWO_TYPES));
    }
}
