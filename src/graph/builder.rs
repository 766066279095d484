//! Builds a `DependencyGraph` from per-file import/export facts.
//!
//! Edges are binding-granular: `import {a, b} from './m'` yields two edges,
//! because dead-reference and coupling analysis both care about individual
//! bindings. Side-effect imports yield exactly one edge.

use anyhow::Result;
use log::warn;
use std::path::{Path, PathBuf};

use crate::core::{DependencyEdge, DriftmapError, EdgeKind, ImportFact, ModuleFacts};
use crate::graph::{cycles, metrics, DependencyGraph};
use crate::resolver::ModuleResolver;

#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Materialize a node per distinct external target
    pub include_external: bool,
    /// Abort on the first per-file extraction error instead of skipping
    pub fail_fast: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            include_external: true,
            fail_fast: false,
        }
    }
}

pub struct GraphBuilder {
    resolver: ModuleResolver,
    options: BuildOptions,
}

impl GraphBuilder {
    pub fn new(resolver: ModuleResolver, options: BuildOptions) -> Self {
        Self { resolver, options }
    }

    /// Build the graph for `files`, where `facts` holds each file's
    /// extraction outcome in the same order. An `Err` entry is a per-file
    /// extraction failure; batch mode skips the file, fail-fast mode aborts.
    /// Metrics (including cycles) are computed before returning.
    pub fn build(
        &self,
        files: &[PathBuf],
        facts: &[Result<ModuleFacts>],
    ) -> Result<DependencyGraph> {
        debug_assert_eq!(files.len(), facts.len());
        let mut graph = DependencyGraph::new();

        for file in files {
            graph.add_node(file.to_string_lossy().into_owned(), false);
        }

        for (file, outcome) in files.iter().zip(facts) {
            let module_facts = match outcome {
                Ok(f) => f,
                Err(e) if self.options.fail_fast => {
                    return Err(DriftmapError::Analysis(format!(
                        "extraction failed for {}: {}",
                        file.display(),
                        e
                    ))
                    .into());
                }
                Err(e) => {
                    warn!("skipping {}: {}", file.display(), e);
                    continue;
                }
            };
            for import in &module_facts.imports {
                self.add_import_edge(&mut graph, file, import);
            }
        }

        let cycle_list = cycles::find_cycles(&graph);
        graph.metrics = metrics::compute_metrics(&graph.nodes, &graph.edges, cycle_list);
        Ok(graph)
    }

    fn add_import_edge(&self, graph: &mut DependencyGraph, file: &Path, import: &ImportFact) {
        let resolution = self.resolver.resolve(file, &import.source);

        if resolution.is_external && self.options.include_external {
            graph.add_node(resolution.id.clone(), true);
        }

        let kind = if import.type_only {
            EdgeKind::TypeOnly
        } else if import.re_export {
            EdgeKind::Export
        } else {
            EdgeKind::Import
        };

        graph.add_edge(DependencyEdge {
            from: file.to_string_lossy().into_owned(),
            to: resolution.id,
            kind,
            is_external: resolution.is_external,
            binding: import.binding,
        });
    }
}
