//! Immutable graph snapshots and the orchestration that builds them

pub mod git;
pub mod provider;

pub use git::GitProvider;
pub use provider::{SnapshotProvider, Workspace};

use anyhow::{Context as _, Result};
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::core::FactCache;
use crate::extraction::FactExtractor;
use crate::graph::{BuildOptions, DependencyGraph, GraphBuilder};
use crate::resolver::ModuleResolver;

/// One point-in-time analysis result. Immutable once built; diffing takes
/// two of these and nothing else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// Opaque identifier of the analyzed state (git ref, label, ...)
    pub reference: String,
    pub timestamp: DateTime<Utc>,
    pub graph: DependencyGraph,
    pub file_set: Vec<PathBuf>,
}

/// Builds snapshots against a provider. Pure orchestration: list files,
/// materialize, extract, build, measure. Two calls for different refs share
/// no state beyond the explicitly passed cache, which is keyed by content
/// hash and therefore cannot leak one ref's results into another's.
pub struct SnapshotManager<'a> {
    extractor: &'a dyn FactExtractor,
    provider: &'a dyn SnapshotProvider,
    resolver: ModuleResolver,
    options: BuildOptions,
    extensions: Vec<String>,
}

impl<'a> SnapshotManager<'a> {
    pub fn new(
        extractor: &'a dyn FactExtractor,
        provider: &'a dyn SnapshotProvider,
        resolver: ModuleResolver,
        options: BuildOptions,
        extensions: Vec<String>,
    ) -> Self {
        Self {
            extractor,
            provider,
            resolver,
            options,
            extensions,
        }
    }

    /// Analyze the file set at `reference` into an immutable snapshot.
    /// The materialized workspace is deleted on every exit path, including
    /// extraction and build failures, via the workspace guard's drop.
    pub fn snapshot(&self, reference: &str, cache: &mut FactCache) -> Result<GraphSnapshot> {
        let listed = self
            .provider
            .list_files(reference)
            .with_context(|| format!("listing files at '{}'", reference))?;
        let file_set: Vec<PathBuf> = listed
            .into_iter()
            .filter(|p| self.is_source_file(p))
            .collect();
        info!("{}: {} source files", reference, file_set.len());

        let workspace = self
            .provider
            .materialize(reference)
            .with_context(|| format!("materializing workspace for '{}'", reference))?;

        let absolute: Vec<PathBuf> = file_set.iter().map(|p| workspace.root().join(p)).collect();

        let facts: Vec<Result<crate::core::ModuleFacts>> = absolute
            .iter()
            .map(|path| {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                cache.get_or_compute(path, &content, || self.extractor.extract(path, &content))
            })
            .collect();

        let builder = GraphBuilder::new(self.resolver.clone(), self.options.clone());
        let mut graph = builder.build(&absolute, &facts)?;
        // node ids must not depend on where the workspace happened to land,
        // or diffing two snapshots would see every module as renamed
        graph.rebase(workspace.root());
        debug!(
            "{}: {} nodes, {} edges, health {:.0}",
            reference,
            graph.node_count(),
            graph.edge_count(),
            graph.metrics.health_score
        );

        Ok(GraphSnapshot {
            reference: reference.to_string(),
            timestamp: Utc::now(),
            graph,
            file_set,
        })
    }

    fn is_source_file(&self, path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.extensions.iter().any(|e| e == ext))
            .unwrap_or(false)
    }
}
