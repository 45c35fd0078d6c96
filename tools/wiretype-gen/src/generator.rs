// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Generator pipeline: schema -> model -> hash check -> writers -> files.
//!
//! Emission is all-or-nothing per run: every artifact is rendered in memory
//! first, and nothing touches the output directory until the whole model
//! has passed the collision check and every writer has finished.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::emit::{self, Artifact, Writer};
use crate::emit::dispatch::DispatchTableWriter;
use crate::emit::proxy::ProxyWriter;
use crate::hash;
use crate::model::{self, TypeModel};
use crate::schema;

/// Generator state for one run.
pub struct Generator {
    model: TypeModel,
    out_dir: PathBuf,
    writers: Vec<Box<dyn Writer>>,
}

impl Generator {
    /// Load the schema and build the type model.
    pub fn new(schema_path: &Path, out_dir: PathBuf) -> Result<Self> {
        tracing::info!("Loading schema from: {:?}", schema_path);
        let doc = schema::load_schema(schema_path)?;
        let model = model::build_model(&doc)?;
        tracing::info!(
            "Model built: {} types in namespace `{}`",
            model.types.len(),
            model.namespace
        );

        // Explicit writer registry; one artifact per writer kind.
        let writers: Vec<Box<dyn Writer>> =
            vec![Box::new(DispatchTableWriter), Box::new(ProxyWriter)];

        Ok(Self {
            model,
            out_dir,
            writers,
        })
    }

    /// Render every artifact in memory. Fails before rendering anything if
    /// two types share a structural hash.
    pub fn render(&mut self) -> Result<Vec<Artifact>> {
        tracing::info!("Stage 1: structural hash uniqueness check");
        hash::check_collisions(&self.model.types)?;

        tracing::info!("Stage 2: rendering artifacts");
        emit::mark_eligibility(&mut self.model, &self.writers);
        Ok(emit::run_writers(&self.model, &self.writers))
    }

    /// Render and write all artifacts, returning the run report.
    pub fn generate(&mut self) -> Result<GenerationReport> {
        let artifacts = self.render()?;

        tracing::info!("Stage 3: writing {} artifacts", artifacts.len());
        fs::create_dir_all(&self.out_dir).context("Failed to create output directory")?;

        let mut report = GenerationReport::new(self.model.types.len());
        for artifact in &artifacts {
            let path = self.out_dir.join(&artifact.file_name);
            fs::write(&path, &artifact.contents)
                .context(format!("Failed to write {}", artifact.file_name))?;
            tracing::info!(
                "[OK] {} ({} types)",
                artifact.file_name,
                artifact.types_emitted
            );
            report
                .artifacts
                .push((artifact.file_name.clone(), artifact.types_emitted));
        }

        tracing::info!("[OK] Generation complete");
        Ok(report)
    }
}

/// Generation report
pub struct GenerationReport {
    pub types_total: usize,
    /// (artifact file name, types emitted into it)
    pub artifacts: Vec<(String, usize)>,
}

impl GenerationReport {
    pub fn new(types_total: usize) -> Self {
        Self {
            types_total,
            artifacts: Vec::new(),
        }
    }

    pub fn summary(&self) {
        println!("\n{}", "=".repeat(60));
        println!("  wiretype Generation Report");
        println!("{}", "=".repeat(60));
        println!();
        println!("  Schema types:   {}", self.types_total);
        for (name, count) in &self.artifacts {
            println!("  [OK] {:<28} {} types", name, count);
        }
        println!();
        println!("{}", "=".repeat(60));
    }
}
