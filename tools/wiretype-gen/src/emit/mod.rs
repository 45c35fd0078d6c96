// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Code-writer framework: the visitor protocol every artifact writer
//! implements, plus the shared emission context.
//!
//! One writer produces one artifact per run. The framework drives the
//! open/visit/close bracket itself, so a half-written artifact cannot be
//! observed: writers only render into an in-memory [`CodeSink`], and the
//! generator writes files after every writer has finished.

pub mod dispatch;
pub mod proxy;

use crate::model::{TypeModel, TypeSpec};

const INDENT: &str = "    ";

/// One rendered output artifact.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub file_name: String,
    pub contents: String,
    pub types_emitted: usize,
}

/// Record of one type a writer has emitted, kept for epilogue emission
/// (the dispatch writer closes its table literal from this list).
#[derive(Debug, Clone)]
pub struct EmittedType {
    pub name: String,
    pub fqn: String,
    pub type_hash: u64,
}

/// Per-artifact accumulation state: output buffer, current indentation,
/// emitted-type list. Passed explicitly through every writer call and
/// discarded when the artifact is finalized.
#[derive(Debug, Default)]
pub struct CodeSink {
    buf: String,
    depth: usize,
    emitted: Vec<EmittedType>,
}

impl CodeSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit one line at the current indentation.
    pub fn line(&mut self, text: &str) {
        if text.is_empty() {
            self.buf.push('\n');
            return;
        }
        for _ in 0..self.depth {
            self.buf.push_str(INDENT);
        }
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    pub fn indent(&mut self) {
        self.depth += 1;
    }

    pub fn dedent(&mut self) {
        debug_assert!(self.depth > 0, "dedent below column zero");
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn record(&mut self, spec: &TypeSpec) {
        self.emitted.push(EmittedType {
            name: spec.name.clone(),
            fqn: spec.fqn(),
            type_hash: spec.type_hash,
        });
    }

    pub fn emitted(&self) -> &[EmittedType] {
        &self.emitted
    }

    pub fn types_emitted(&self) -> usize {
        self.emitted.len()
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

/// The visitor protocol. Concrete writers specialize the filter and the
/// per-type emission; the framework owns the traversal.
pub trait Writer {
    /// Short writer-kind label for logs and the generation report.
    fn kind(&self) -> &'static str;

    /// Artifact file name, derived from the writer kind and namespace.
    fn file_name(&self, namespace: &str) -> String;

    /// Which types this writer processes. Rejection is not an error:
    /// distinct writers legitimately cover disjoint subsets.
    fn accepts(&self, spec: &TypeSpec) -> bool;

    /// File preamble and any table prologue.
    fn begin_file(&self, model: &TypeModel, sink: &mut CodeSink);

    /// Emit one accepted type's contribution.
    fn visit_type(&self, spec: &TypeSpec, model: &TypeModel, sink: &mut CodeSink);

    /// Epilogue (closing table literals etc.).
    fn end_file(&self, model: &TypeModel, sink: &mut CodeSink);
}

/// Flag each model type that at least one writer accepts; log the rest.
pub fn mark_eligibility(model: &mut TypeModel, writers: &[Box<dyn Writer>]) {
    for spec in &mut model.types {
        spec.eligible = writers.iter().any(|w| w.accepts(spec));
        if !spec.eligible {
            tracing::debug!("type {} not accepted by any writer", spec.fqn());
        }
    }
}

/// Run every writer over the model in order, one artifact per writer.
pub fn run_writers(model: &TypeModel, writers: &[Box<dyn Writer>]) -> Vec<Artifact> {
    let mut artifacts = Vec::with_capacity(writers.len());
    for writer in writers {
        let mut sink = CodeSink::new();
        writer.begin_file(model, &mut sink);
        for spec in model.types.iter().filter(|t| writer.accepts(t)) {
            writer.visit_type(spec, model, &mut sink);
        }
        writer.end_file(model, &mut sink);
        let types_emitted = sink.types_emitted();
        tracing::debug!(
            "writer {} emitted {} types",
            writer.kind(),
            types_emitted
        );
        artifacts.push(Artifact {
            file_name: writer.file_name(&model.namespace),
            contents: sink.finish(),
            types_emitted,
        });
    }
    artifacts
}

/// `PointMsg` -> `point_msg`
pub fn to_snake(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// `PointMsg` -> `POINT_MSG`
pub fn to_shout(name: &str) -> String {
    to_snake(name).to_ascii_uppercase()
}
