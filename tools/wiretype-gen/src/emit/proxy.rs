// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Proxy writer: emits `<namespace>_views.rs`.
//!
//! Per accepted type: a borrowed view struct with one accessor per field.
//! Accessors before the first variable-length field read at fixed offsets;
//! later ones re-derive their start by skipping the length-prefixed
//! encodings in between. No bounds checks are emitted: the view trusts the
//! producer's buffer, and a short buffer panics on the slice rather than
//! yielding fabricated values.

use crate::emit::{CodeSink, Writer};
use crate::model::{FieldKind, Primitive, TypeModel, TypeSpec};
use wiretype::DYNAMIC_OFFSET;

pub struct ProxyWriter;

impl Writer for ProxyWriter {
    fn kind(&self) -> &'static str {
        "proxy"
    }

    fn file_name(&self, namespace: &str) -> String {
        format!("{}_views.rs", namespace)
    }

    fn accepts(&self, _spec: &TypeSpec) -> bool {
        // Every schema type gets a view, embedded structs included.
        true
    }

    fn begin_file(&self, model: &TypeModel, sink: &mut CodeSink) {
        sink.line("// @generated by wiretype-gen. Do not edit.");
        sink.line("//");
        sink.line(&format!(
            "// Zero-copy read-only views for the `{}` schema. A view borrows the",
            model.namespace
        ));
        sink.line("// caller's payload buffer (hash prefix already stripped) and trusts it");
        sink.line("// to cover the declared layout: a short buffer panics on the slice");
        sink.line("// rather than yielding fabricated values.");

        let needs_len_at = model
            .types
            .iter()
            .filter(|t| self.accepts(t))
            .any(|t| t.fields.iter().any(|f| f.kind.is_variable()));
        if needs_len_at {
            sink.blank();
            sink.line("#[inline]");
            sink.line("fn len_at(payload: &[u8], pos: usize) -> usize {");
            sink.indent();
            sink.line("let mut len = [0u8; 4];");
            sink.line("len.copy_from_slice(&payload[pos..pos + 4]);");
            sink.line("u32::from_le_bytes(len) as usize");
            sink.dedent();
            sink.line("}");
        }
    }

    fn visit_type(&self, spec: &TypeSpec, model: &TypeModel, sink: &mut CodeSink) {
        sink.record(spec);

        sink.blank();
        sink.line(&format!(
            "/// Read-only view over `{}` payload bytes.",
            spec.fqn()
        ));
        sink.line("#[derive(Clone, Copy)]");
        sink.line(&format!("pub struct {}View<'p> {{", spec.name));
        sink.indent();
        sink.line("payload: &'p [u8],");
        sink.dedent();
        sink.line("}");
        sink.blank();
        sink.line(&format!("impl<'p> {}View<'p> {{", spec.name));
        sink.indent();
        sink.line(&format!(
            "pub const TYPE_HASH: u64 = 0x{:016X};",
            spec.type_hash
        ));
        sink.blank();
        sink.line("/// Bind to a payload buffer (hash prefix already stripped).");
        sink.line("pub fn bind(payload: &'p [u8]) -> Self {");
        sink.indent();
        sink.line("Self { payload }");
        sink.dedent();
        sink.line("}");

        for index in 0..spec.fields.len() {
            sink.blank();
            emit_accessor(spec, index, model, sink);
        }

        sink.dedent();
        sink.line("}");
    }

    fn end_file(&self, _model: &TypeModel, _sink: &mut CodeSink) {}
}

fn emit_accessor(spec: &TypeSpec, index: usize, model: &TypeModel, sink: &mut CodeSink) {
    let field = &spec.fields[index];
    let dynamic = field.offset_bytes == DYNAMIC_OFFSET;

    let return_type = match &field.kind {
        FieldKind::Primitive(p) => p.canonical_name().to_string(),
        FieldKind::Str => "&'p str".to_string(),
        FieldKind::Bytes => "&'p [u8]".to_string(),
        FieldKind::Struct { type_index } => {
            format!("{}View<'p>", model.types[*type_index].name)
        }
    };

    sink.line(&format!("pub fn {}(&self) -> {} {{", field.name, return_type));
    sink.indent();

    // Start position: a folded literal for the fixed prefix of the layout,
    // a skip-walk over earlier variable fields otherwise.
    let at = if dynamic {
        emit_skip_walk(spec, index, sink);
        None
    } else {
        Some(field.offset_bytes)
    };

    match &field.kind {
        FieldKind::Primitive(p) => emit_primitive_read(*p, at, sink),
        FieldKind::Str => {
            emit_prefixed_slice(at, sink);
            sink.line("std::str::from_utf8(data).expect(\"string field must be valid UTF-8\")");
        }
        FieldKind::Bytes => {
            emit_prefixed_slice(at, sink);
            sink.line("data");
        }
        FieldKind::Struct { type_index } => {
            let target = &model.types[*type_index];
            sink.line(&format!(
                "{}View::bind(&self.payload[{}..{}])",
                target.name,
                position(at, 0),
                position(at, field.size_bytes)
            ));
        }
    }

    sink.dedent();
    sink.line("}");
}

/// Render `start + extra` as either a folded literal or a `pos` expression.
fn position(at: Option<u32>, extra: u32) -> String {
    match (at, extra) {
        (Some(offset), extra) => (offset + extra).to_string(),
        (None, 0) => "pos".to_string(),
        (None, extra) => format!("pos + {}", extra),
    }
}

/// Emit `let mut pos = ...;` walking from the last fixed offset to `index`.
fn emit_skip_walk(spec: &TypeSpec, index: usize, sink: &mut CodeSink) {
    let mut anchor = index;
    while spec.fields[anchor].offset_bytes == DYNAMIC_OFFSET {
        anchor -= 1;
    }
    sink.line(&format!(
        "let mut pos = {}usize;",
        spec.fields[anchor].offset_bytes
    ));
    for skipped in &spec.fields[anchor..index] {
        if skipped.kind.is_variable() {
            sink.line(&format!(
                "pos += 4 + len_at(self.payload, pos); // skip `{}`",
                skipped.name
            ));
        } else {
            sink.line(&format!(
                "pos += {}; // skip `{}`",
                skipped.size_bytes, skipped.name
            ));
        }
    }
}

fn emit_primitive_read(p: Primitive, at: Option<u32>, sink: &mut CodeSink) {
    let size = p.size_bytes();
    match p {
        Primitive::U8 => sink.line(&format!("self.payload[{}]", position(at, 0))),
        Primitive::I8 => sink.line(&format!("self.payload[{}] as i8", position(at, 0))),
        Primitive::Bool => sink.line(&format!("self.payload[{}] != 0", position(at, 0))),
        _ => {
            sink.line(&format!("let mut bytes = [0u8; {}];", size));
            sink.line(&format!(
                "bytes.copy_from_slice(&self.payload[{}..{}]);",
                position(at, 0),
                position(at, size)
            ));
            sink.line(&format!("{}::from_le_bytes(bytes)", p.canonical_name()));
        }
    }
}

/// Emit `let len = ...; let data = ...;` for a length-prefixed field.
fn emit_prefixed_slice(at: Option<u32>, sink: &mut CodeSink) {
    sink.line(&format!(
        "let len = len_at(self.payload, {});",
        position(at, 0)
    ));
    let data_start = position(at, 4);
    sink.line(&format!(
        "let data = &self.payload[{}..{} + len];",
        data_start, data_start
    ));
}
